use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::cluster::{cluster_rows, ClusterError, Row};
use crate::fragment::TextFragment;
use crate::items::{Item, ItemExtractor};
use crate::lang::{DateParser, LinguisticAnalyzer};
use crate::merge::{merge_row, MergedRow};
use crate::util::title_case;

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("Document contains no text fragments")]
    EmptyDocument,
    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

/// Builds [`Receipt`]s from raw fragment lists. Owns the injected linguistic
/// and date services plus the terminator-phrase list, so one pipeline can be
/// reused across a whole batch of documents.
pub struct LayoutPipeline<A: LinguisticAnalyzer, D: DateParser> {
    analyzer: A,
    dates: D,
    terminators: Vec<String>,
}

impl<A: LinguisticAnalyzer, D: DateParser> LayoutPipeline<A, D> {
    pub fn new(analyzer: A, dates: D, terminators: Vec<String>) -> Self {
        Self { analyzer, dates, terminators }
    }

    /// Reconstruct the layout of one document and extract its line items.
    ///
    /// The fragment with the highest top edge is dropped first: OCR services
    /// emit a whole-image summary annotation in the first result position,
    /// and it would otherwise swallow every row into one giant band.
    pub fn process(
        &self,
        fragments: Vec<TextFragment>,
        image_ref: impl Into<String>,
    ) -> Result<Receipt, ReceiptError> {
        if fragments.is_empty() {
            return Err(ReceiptError::EmptyDocument);
        }

        let cleaned = remove_page_annotation(fragments);
        let rows = cluster_rows(cleaned)?;
        let merged_rows: Vec<MergedRow> =
            rows.iter().map(|row| merge_row(&row.texts(), &self.analyzer)).collect();

        let items = ItemExtractor::new(&self.analyzer, &self.terminators).extract(&merged_rows);
        let name = derive_name(&merged_rows);
        let date = derive_date(&merged_rows, &self.dates);
        let export_table = build_export_table(name.as_deref(), date, &items);

        Ok(Receipt { image_ref: image_ref.into(), rows, merged_rows, items, name, date, export_table })
    }
}

/// The fully reconstructed layout of one document image.
///
/// Every view here is a pure function of the input fragment list, computed
/// once by [`LayoutPipeline::process`] and stored read-only.
#[derive(Debug)]
pub struct Receipt {
    image_ref: String,
    rows: Vec<Row>,
    merged_rows: Vec<MergedRow>,
    items: Vec<Item>,
    name: Option<String>,
    date: Option<NaiveDate>,
    export_table: Vec<Vec<String>>,
}

impl Receipt {
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn merged_rows(&self) -> &[MergedRow] {
        &self.merged_rows
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// The date formatted for the export table.
    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format("%m/%d/%Y").to_string())
    }

    /// Ordered rows ready for the sheet sink: optional name, optional date,
    /// a blank separator if either is present, then one row per item.
    pub fn export_table(&self) -> &[Vec<String>] {
        &self.export_table
    }

    /// Name to key the export sheet by: the receipt name when one was found,
    /// otherwise the file stem of the source image.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        Path::new(&self.image_ref)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image_ref.clone())
    }
}

/// Drop exactly one fragment: the one with the minimal top edge. The first
/// fragment wins ties, which is where OCR services put the whole-image
/// summary annotation.
pub fn remove_page_annotation(fragments: Vec<TextFragment>) -> Vec<TextFragment> {
    let mut outlier = 0;
    for (i, fragment) in fragments.iter().enumerate().skip(1) {
        if fragment.top_y() < fragments[outlier].top_y() {
            outlier = i;
        }
    }
    fragments
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != outlier)
        .map(|(_, f)| f)
        .collect()
}

/// First merged row with any cell longer than two characters, space-joined
/// and title-cased. Receipts open with the store name in large type, so this
/// is nearly always the header line.
fn derive_name(rows: &[MergedRow]) -> Option<String> {
    rows.iter()
        .find(|row| row.cells.iter().any(|cell| cell.chars().count() > 2))
        .map(|row| title_case(&row.joined()))
}

/// First cell (top-to-bottom, left-to-right) the date service accepts.
fn derive_date(rows: &[MergedRow], dates: &dyn DateParser) -> Option<NaiveDate> {
    rows.iter()
        .flat_map(|row| row.cells.iter())
        .find_map(|cell| dates.parse(cell))
}

fn build_export_table(
    name: Option<&str>,
    date: Option<NaiveDate>,
    items: &[Item],
) -> Vec<Vec<String>> {
    let mut table: Vec<Vec<String>> = Vec::new();
    if let Some(name) = name {
        table.push(vec![name.to_string()]);
    }
    if let Some(date) = date {
        table.push(vec![date.format("%m/%d/%Y").to_string()]);
    }
    if !table.is_empty() {
        table.push(vec![]);
    }
    for item in items {
        table.push(match &item.cost {
            Some(cost) => vec![item.name.clone(), cost.clone()],
            None => vec![item.name.clone()],
        });
    }
    table
}
