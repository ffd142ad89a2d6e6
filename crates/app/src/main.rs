use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;

use recibo_core::LayoutPipeline;
use recibo_export::CsvSink;
use recibo_lang::{RegexDateParser, RuleAnalyzer};

mod config;
mod intake;

use config::Config;
use intake::Intake;

/// Reconstruct receipt layouts from parsed OCR fragments and export the
/// line items as sheets.
#[derive(Debug, Parser)]
#[command(name = "recibo", version, about)]
struct Args {
    /// Directory of parsed OCR JSON documents.
    #[arg(long, default_value = "./parsed_image_jsons")]
    input_dir: PathBuf,

    /// Directory the export sheets are written to.
    #[arg(long, default_value = "./sheets")]
    out_dir: PathBuf,

    /// TOML config file overriding the terminator phrase list.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep running and process JSON documents as they are dropped into the
    /// input directory.
    #[arg(long)]
    watch: bool,

    /// Log every reconstructed row of each receipt.
    #[arg(long)]
    dump_grid: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref()).context("Failed to load config")?;

    let pipeline = LayoutPipeline::new(
        RuleAnalyzer::new(),
        RegexDateParser::new(),
        config.terminators,
    );
    let mut intake = Intake::new(pipeline, CsvSink::new(&args.out_dir), args.dump_grid);

    let written = intake
        .process_dir(&args.input_dir)
        .await
        .with_context(|| format!("Failed to process {}", args.input_dir.display()))?;
    tracing::info!(written, input = %args.input_dir.display(), "batch complete");

    if args.watch {
        // The channel bridges the notify watcher thread and the async loop.
        // The watcher must be kept alive for the duration of the run.
        let (tx, mut rx) = mpsc::channel::<PathBuf>(64);
        let _watcher = intake::spawn_document_watcher(&args.input_dir, tx)
            .context("Failed to start input directory watcher")?;
        tracing::info!(input = %args.input_dir.display(), "watching for new documents");

        while let Some(path) = rx.recv().await {
            intake.process_and_log(&path).await;
        }
    }

    Ok(())
}
