use thiserror::Error;

use crate::fragment::TextFragment;

/// Fraction of a fragment's height used as its vertical band half-width.
const BAND_RATIO: f64 = 0.25;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Cannot cluster an empty fragment list")]
    NoFragments,
}

/// A cluster of fragments judged to occupy the same horizontal text line,
/// ordered left to right by center x.
#[derive(Debug, Clone)]
pub struct Row {
    fragments: Vec<TextFragment>,
}

impl Row {
    fn new(mut fragments: Vec<TextFragment>) -> Self {
        fragments.sort_by(|a, b| a.center().x.total_cmp(&b.center().x));
        Self { fragments }
    }

    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    pub fn texts(&self) -> Vec<String> {
        self.fragments.iter().map(|f| f.text().to_string()).collect()
    }

    pub fn mean_center_y(&self) -> f64 {
        mean(self.fragments.iter().map(|f| f.center().y))
    }

    fn mean_tolerance(&self) -> f64 {
        mean(self.fragments.iter().map(|f| f.height() * BAND_RATIO))
    }
}

/// Group fragments into reading-order rows.
///
/// Fragments are sorted by center y (stable, so ties keep input order) and
/// assigned in a single forward pass: each fragment either joins the row
/// currently being built or opens a new one. Closed rows are never revisited,
/// so a fragment cannot join an earlier row even if it is geometrically
/// closer to it.
///
/// Membership is a mutual band-overlap test, not a one-sided distance
/// threshold: the fragment's band `[c − h·¼, c + h·¼]` must intersect the
/// row's band built from the mean center and mean tolerance of the members
/// accepted so far. This keeps rows of mixed glyph height (header text next
/// to totals) together.
pub fn cluster_rows(fragments: Vec<TextFragment>) -> Result<Vec<Row>, ClusterError> {
    if fragments.is_empty() {
        return Err(ClusterError::NoFragments);
    }

    let mut sorted = fragments;
    sorted.sort_by(|a, b| a.center().y.total_cmp(&b.center().y));

    let mut rows: Vec<Row> = Vec::new();
    let mut current: Vec<TextFragment> = Vec::new();
    for frag in sorted {
        if current.is_empty() {
            current.push(frag);
            continue;
        }
        let row_center = mean(current.iter().map(|f| f.center().y));
        let row_tolerance = mean(current.iter().map(|f| f.height() * BAND_RATIO));
        if shares_band(&frag, row_center, row_tolerance) {
            current.push(frag);
        } else {
            rows.push(Row::new(current));
            current = vec![frag];
        }
    }
    rows.push(Row::new(current));

    Ok(rows)
}

fn shares_band(frag: &TextFragment, row_center: f64, row_tolerance: f64) -> bool {
    let tolerance = frag.height() * BAND_RATIO;
    let (self_min, self_max) = (frag.center().y - tolerance, frag.center().y + tolerance);
    let (row_min, row_max) = (row_center - row_tolerance, row_center + row_tolerance);

    (self_min >= row_min && self_min <= row_max)
        || (self_max >= row_min && self_max <= row_max)
        || (row_min >= self_min && row_min <= self_max)
        || (row_max >= self_min && row_max <= self_max)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    sum / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::test_support::frag;

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(cluster_rows(vec![]), Err(ClusterError::NoFragments)));
    }

    #[test]
    fn single_fragment_yields_one_row() {
        let rows = cluster_rows(vec![frag("ONLY", 0.0, 0.0, 10.0, 10.0)]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].texts(), vec!["ONLY"]);
    }

    #[test]
    fn same_line_fragments_share_a_row() {
        let rows = cluster_rows(vec![
            frag("MILK", 0.0, 100.0, 40.0, 10.0),
            frag("3.50", 200.0, 101.0, 30.0, 10.0),
        ])
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].texts(), vec!["MILK", "3.50"]);
    }

    #[test]
    fn distant_lines_split_into_rows() {
        let rows = cluster_rows(vec![
            frag("MILK", 0.0, 100.0, 40.0, 10.0),
            frag("EGGS", 0.0, 200.0, 40.0, 10.0),
            frag("BREAD", 0.0, 300.0, 50.0, 10.0),
        ])
        .unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn rows_are_ordered_top_to_bottom() {
        // Input deliberately shuffled.
        let rows = cluster_rows(vec![
            frag("THIRD", 0.0, 300.0, 40.0, 10.0),
            frag("FIRST", 0.0, 100.0, 40.0, 10.0),
            frag("SECOND", 0.0, 200.0, 40.0, 10.0),
        ])
        .unwrap();
        let texts: Vec<_> = rows.iter().flat_map(|r| r.texts()).collect();
        assert_eq!(texts, vec!["FIRST", "SECOND", "THIRD"]);
        for pair in rows.windows(2) {
            assert!(pair[0].mean_center_y() <= pair[1].mean_center_y());
        }
    }

    #[test]
    fn columns_sorted_left_to_right_within_row() {
        let rows = cluster_rows(vec![
            frag("2.99", 300.0, 50.0, 30.0, 10.0),
            frag("APPLE", 10.0, 50.0, 50.0, 10.0),
            frag("QTY", 150.0, 50.0, 30.0, 10.0),
        ])
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].texts(), vec!["APPLE", "QTY", "2.99"]);
        let xs: Vec<_> = rows[0].fragments().iter().map(|f| f.center().x).collect();
        assert!(xs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn mixed_height_fragments_can_share_a_row() {
        // A tall header glyph next to a short one on the same baseline: the
        // mutual overlap test admits both even though a one-sided threshold
        // derived from the short fragment would not.
        let rows = cluster_rows(vec![
            frag("GROCERY", 0.0, 100.0, 80.0, 40.0),
            frag("MART", 100.0, 110.0, 40.0, 16.0),
        ])
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn every_fragment_lands_in_exactly_one_row() {
        let input = vec![
            frag("A", 0.0, 10.0, 10.0, 8.0),
            frag("B", 20.0, 11.0, 10.0, 8.0),
            frag("C", 0.0, 60.0, 10.0, 8.0),
            frag("D", 20.0, 61.0, 10.0, 8.0),
            frag("E", 0.0, 120.0, 10.0, 8.0),
        ];
        let rows = cluster_rows(input).unwrap();
        let total: usize = rows.iter().map(|r| r.fragments().len()).sum();
        assert_eq!(total, 5);
        assert!(rows.iter().all(|r| !r.fragments().is_empty()));
    }

    #[test]
    fn forward_pass_never_revisits_closed_rows() {
        // Three fragments sorted by center y: A (y≈10), B (y≈30) opens a new
        // row, C (y≈12) would overlap A's row but must join B's current row
        // or open a new one — it can never go back to A.
        let a = frag("A", 0.0, 6.0, 10.0, 8.0); // center y = 10
        let b = frag("B", 0.0, 26.0, 10.0, 8.0); // center y = 30
        let c = frag("C", 20.0, 0.0, 10.0, 24.0); // center y = 12, tall
        let rows = cluster_rows(vec![a, b, c]).unwrap();
        let first_row = rows[0].texts();
        // C sorts between A and B, so it joins A's still-open row; B then
        // opens the second row alone.
        assert_eq!(first_row, vec!["A", "C"]);
        assert_eq!(rows[1].texts(), vec!["B"]);
    }
}
