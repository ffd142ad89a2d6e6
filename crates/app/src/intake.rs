use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::mpsc;

use recibo_core::{DateParser, LayoutPipeline, LinguisticAnalyzer, ReceiptError};
use recibo_export::{SheetSink, SinkError};
use recibo_import::{DocumentError, ParsedDocument};

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Written { sheet: String },
    /// Same content already processed this run.
    Duplicate,
}

/// Drives parsed OCR documents through the layout pipeline and into the
/// sheet sink, skipping byte-identical inputs.
pub struct Intake<A: LinguisticAnalyzer, D: DateParser, S: SheetSink> {
    pipeline: LayoutPipeline<A, D>,
    sink: S,
    seen: HashSet<String>,
    dump_grid: bool,
}

impl<A: LinguisticAnalyzer, D: DateParser, S: SheetSink> Intake<A, D, S> {
    pub fn new(pipeline: LayoutPipeline<A, D>, sink: S, dump_grid: bool) -> Self {
        Self { pipeline, sink, seen: HashSet::new(), dump_grid }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Process one parsed-document JSON file.
    pub async fn process_path(&mut self, path: &Path) -> Result<Outcome, IntakeError> {
        let bytes = tokio::fs::read(path).await?;
        let hash_hex = recibo_import::to_hex(&recibo_import::sha256_bytes(&bytes));
        if self.seen.contains(&hash_hex) {
            tracing::info!(path = %path.display(), hash = %hash_hex, "duplicate document skipped");
            return Ok(Outcome::Duplicate);
        }

        let doc = ParsedDocument::from_slice(&bytes)?;
        let image_ref = doc.image_filepath.clone();
        let receipt = self.pipeline.process(doc.into_fragments()?, image_ref)?;

        if self.dump_grid {
            for row in receipt.merged_rows() {
                tracing::info!(image = %receipt.image_ref(), row = %row.joined(), "grid row");
            }
        }

        let sheet = self
            .sink
            .write_sheet(&receipt.display_name(), receipt.export_table())?;
        self.seen.insert(hash_hex);
        Ok(Outcome::Written { sheet })
    }

    /// Process one path and log the outcome. Returns true when a sheet was
    /// written — failures are reported, never fatal to the batch.
    pub async fn process_and_log(&mut self, path: &Path) -> bool {
        match self.process_path(path).await {
            Ok(Outcome::Written { sheet }) => {
                tracing::info!(path = %path.display(), sheet = %sheet, "document exported");
                true
            }
            Ok(Outcome::Duplicate) => false,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "document failed");
                false
            }
        }
    }

    /// Process every JSON document in `dir` (sorted, for stable sheet
    /// numbering across runs). Returns how many sheets were written.
    pub async fn process_dir(&mut self, dir: &Path) -> Result<usize, IntakeError> {
        let mut paths = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_json(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut written = 0;
        for path in paths {
            if self.process_and_log(&path).await {
                written += 1;
            }
        }
        Ok(written)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Spawn a notify watcher on `watch_dir` that sends newly created JSON paths
/// to `tx`. Returns the watcher — it must be kept alive for watching to
/// continue.
pub fn spawn_document_watcher(
    watch_dir: &Path,
    tx: mpsc::Sender<PathBuf>,
) -> notify::Result<impl notify::Watcher> {
    use notify::{EventKind, RecursiveMode, Watcher};

    let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
        if let Ok(ev) = event {
            if matches!(ev.kind, EventKind::Create(_)) {
                for path in ev.paths {
                    if is_json(&path) {
                        let _ = tx.try_send(path);
                    }
                }
            }
        }
    })?;

    watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
