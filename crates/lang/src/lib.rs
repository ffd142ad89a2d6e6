pub mod analyzer;
pub mod dates;
pub(crate) mod stopwords;

pub use analyzer::RuleAnalyzer;
pub use dates::RegexDateParser;

/// Phrases that mark the end of the purchasable-item region of a receipt.
/// Compared via normalized containment, so casing, spacing, and inflection
/// differences on the printed receipt still match.
pub const DEFAULT_TERMINATORS: &[&str] = &[
    "subtotal",
    "sub total",
    "tax",
    "total",
    "balance due",
    "amount due",
    "change due",
];

pub fn default_terminators() -> Vec<String> {
    DEFAULT_TERMINATORS.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use recibo_core::{BoundingPolygon, LayoutPipeline, Point, TextFragment};

    fn frag(text: &str, x: f64, y: f64, w: f64, h: f64) -> TextFragment {
        let polygon = BoundingPolygon::new(vec![
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ])
        .unwrap();
        TextFragment::new(text, polygon)
    }

    /// End-to-end run with the rule-based backends: a small grocery receipt,
    /// page annotation first, terminator section at the bottom.
    #[test]
    fn rule_backends_drive_the_full_pipeline() {
        let pipeline = LayoutPipeline::new(
            RuleAnalyzer::new(),
            RegexDateParser::new(),
            default_terminators(),
        );

        let fragments = vec![
            frag("GROCERY MART 01/02/2023 ...", 0.0, 0.0, 400.0, 600.0),
            frag("GROCERY", 50.0, 20.0, 120.0, 30.0),
            frag("MART", 190.0, 20.0, 80.0, 30.0),
            frag("01/02/2023", 50.0, 80.0, 140.0, 20.0),
            frag("Whole", 50.0, 140.0, 50.0, 20.0),
            frag("Milk", 110.0, 140.0, 40.0, 20.0),
            frag("3.50", 300.0, 140.0, 50.0, 20.0),
            frag("Eggs", 50.0, 200.0, 60.0, 20.0),
            frag("Subtotal", 50.0, 260.0, 90.0, 20.0),
            frag("$5.49", 300.0, 260.0, 60.0, 20.0),
            frag("Candy", 50.0, 320.0, 60.0, 20.0),
            frag("0.99", 300.0, 320.0, 50.0, 20.0),
        ];

        let receipt = pipeline.process(fragments, "scan-01.jpg").unwrap();

        assert_eq!(receipt.name(), Some("Grocery Mart"));
        assert_eq!(receipt.date_string().as_deref(), Some("01/02/2023"));

        // "Whole Milk" merged into one cell by the noun chunker; the row
        // after the Subtotal terminator never becomes an item.
        let names: Vec<_> = receipt.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Whole Milk", "Eggs"]);
        assert_eq!(receipt.items()[0].cost.as_deref(), Some("3.50"));
        assert_eq!(receipt.items()[1].cost, None);
    }
}
