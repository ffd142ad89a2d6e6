use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Destination for one receipt's export table.
///
/// Sheet names are display names (receipt header or image stem) and collide
/// across a batch; implementations de-duplicate by suffixing a counter and
/// report the name actually used.
pub trait SheetSink {
    fn write_sheet(&mut self, name: &str, rows: &[Vec<String>]) -> Result<String, SinkError>;
}

/// Suffix a counter until `taken` clears the candidate.
fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ── CSV directory sink ────────────────────────────────────────────────────────

/// Writes each sheet as `<dir>/<name>.csv`.
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn sheet_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }
}

/// Strip path separators and control characters so a receipt header can't
/// escape the output directory or produce an unopenable file name.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "receipt".to_string()
    } else {
        trimmed.to_string()
    }
}

impl SheetSink for CsvSink {
    fn write_sheet(&mut self, name: &str, rows: &[Vec<String>]) -> Result<String, SinkError> {
        std::fs::create_dir_all(&self.dir)?;

        let base = sanitize_file_name(name);
        let unique = unique_name(&base, |candidate| self.sheet_path(candidate).exists());
        let path = self.sheet_path(&unique);

        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(&path)?;
        for row in rows {
            if row.is_empty() {
                // A record needs at least one field; a single empty field
                // becomes the separator row.
                writer.write_record([""])?;
            } else {
                writer.write_record(row)?;
            }
        }
        writer.flush()?;

        tracing::info!(sheet = %unique, path = %path.display(), "wrote export sheet");
        Ok(unique)
    }
}

// ── In-memory sink (used for tests) ──────────────────────────────────────────

/// Collects sheets in memory with the same unique-naming behavior as the
/// real sinks.
#[derive(Debug, Default)]
pub struct MemorySink {
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[(String, Vec<Vec<String>>)] {
        &self.sheets
    }
}

impl SheetSink for MemorySink {
    fn write_sheet(&mut self, name: &str, rows: &[Vec<String>]) -> Result<String, SinkError> {
        let unique = unique_name(name, |candidate| {
            self.sheets.iter().any(|(n, _)| n == candidate)
        });
        self.sheets.push((unique.clone(), rows.to_vec()));
        Ok(unique)
    }
}
