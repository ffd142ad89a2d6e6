use crate::lang::LinguisticAnalyzer;

/// One reading-order row after noun-phrase merging.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub cells: Vec<String>,
    /// Fraction of the analyzer's noun-phrase spans that were actually
    /// emitted. Below 1.0 the raw tokens and spans desynchronized — the
    /// merge is best-effort, so callers get a signal instead of silence.
    pub alignment: f64,
}

impl MergedRow {
    pub fn joined(&self) -> String {
        self.cells.join(" ")
    }
}

/// Collapse multi-word noun phrases in a row into single cells.
///
/// Walks the raw cells with a pointer into the noun-phrase span list for the
/// row's concatenated text. While a cell's text is contained in the current
/// span, the span is emitted once and the cells it covers are swallowed. The
/// first cell that falls outside the current span advances the pointer and is
/// emitted verbatim; once spans are exhausted every remaining cell passes
/// through unchanged. Numbers, prices, and units therefore stay distinct
/// cells while phrase words merge.
///
/// Irregular OCR segmentation can desynchronize cells and spans; that is
/// reported through [`MergedRow::alignment`] rather than repaired.
pub fn merge_row(cells: &[String], analyzer: &dyn LinguisticAnalyzer) -> MergedRow {
    let chunks = analyzer.noun_chunks(&cells.join(" "));

    let mut merged = Vec::with_capacity(cells.len());
    let mut current = 0usize;
    let mut chunk_added = false;
    let mut chunks_emitted = 0usize;

    for cell in cells {
        if current < chunks.len() && chunks[current].contains(cell.as_str()) {
            if !chunk_added {
                merged.push(chunks[current].clone());
                chunk_added = true;
                chunks_emitted += 1;
            }
        } else if current < chunks.len() {
            current += 1;
            chunk_added = false;
            merged.push(cell.clone());
        } else {
            merged.push(cell.clone());
        }
    }

    let alignment = if chunks.is_empty() {
        1.0
    } else {
        chunks_emitted as f64 / chunks.len() as f64
    };
    if alignment < 1.0 {
        tracing::debug!(
            emitted = chunks_emitted,
            total = chunks.len(),
            row = %cells.join(" "),
            "noun-phrase spans desynchronized from raw cells"
        );
    }

    MergedRow { cells: merged, alignment }
}
