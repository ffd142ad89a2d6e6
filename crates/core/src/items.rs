use serde::{Deserialize, Serialize};

use crate::lang::{EntityLabel, LinguisticAnalyzer};
use crate::merge::MergedRow;
use crate::util::{parses_as_float, title_case};

/// One purchased line item. `cost` is the raw matched token — never
/// normalized to a number, since OCR output is kept verbatim for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub cost: Option<String>,
}

/// Walks merged rows top to bottom and emits (name, cost) items.
///
/// Extraction stops permanently at the first row whose normalized text
/// contains any normalized terminator phrase ("subtotal", "total", …) —
/// everything below that is register bookkeeping, not purchases.
pub struct ItemExtractor<'a> {
    analyzer: &'a dyn LinguisticAnalyzer,
    terminators: &'a [String],
}

impl<'a> ItemExtractor<'a> {
    pub fn new(analyzer: &'a dyn LinguisticAnalyzer, terminators: &'a [String]) -> Self {
        Self { analyzer, terminators }
    }

    pub fn extract(&self, rows: &[MergedRow]) -> Vec<Item> {
        let mut items = Vec::new();
        let mut items_started = false;

        for row in rows {
            if self.hits_terminator(row) {
                tracing::debug!(row = %row.joined(), "terminator row — stopping item extraction");
                break;
            }

            let cost = self.pick_cost(row);
            let (cost, name) = Self::split_name(row, cost);

            // A row needs a price to count as the first item; once the list
            // is underway, priceless rows (multi-line descriptions) still
            // count.
            if let Some(name) = name {
                if name.chars().count() > 1 && (items_started || cost.is_some()) {
                    items.push(Item { name: title_case(&name), cost });
                    items_started = true;
                }
            }
        }

        items
    }

    fn hits_terminator(&self, row: &MergedRow) -> bool {
        let normalized_row = self.analyzer.normalize(&row.joined());
        self.terminators.iter().any(|phrase| {
            let normalized = self.analyzer.normalize(phrase);
            !normalized.is_empty() && normalized_row.contains(&normalized)
        })
    }

    /// First pass of cost selection: the longest entity text the analyzer
    /// labels as a number or amount, across all cells.
    fn pick_cost(&self, row: &MergedRow) -> Option<String> {
        let mut cost: Option<String> = None;
        for cell in &row.cells {
            for entity in self.analyzer.entities(cell) {
                if matches!(entity.label, EntityLabel::Cardinal | EntityLabel::Money)
                    && cost.as_ref().is_none_or(|c| c.len() < entity.text.len())
                {
                    cost = Some(entity.text);
                }
            }
        }
        cost
    }

    /// Second pass: a float-parseable cell longer than the current candidate
    /// replaces it. Every other cell that does not contain the chosen cost
    /// text is appended to the item name.
    fn split_name(row: &MergedRow, mut cost: Option<String>) -> (Option<String>, Option<String>) {
        let mut name: Option<String> = None;
        for cell in &row.cells {
            if parses_as_float(cell) {
                if cost.as_ref().is_none_or(|c| c.len() < cell.len()) {
                    cost = Some(cell.clone());
                }
            } else if cost.as_ref().is_none_or(|c| !cell.contains(c.as_str())) {
                name = Some(match name {
                    None => cell.clone(),
                    Some(n) => format!("{n} {cell}"),
                });
            }
        }
        (cost, name)
    }
}
