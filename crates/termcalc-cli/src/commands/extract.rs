//! Extract command - print the text of a contract document.

use std::path::PathBuf;

use clap::Args;
use console::style;

use termcalc_core::DocumentExtractor;

use super::{emit, load_config, read_document};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF, DOCX or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the detected format and encoding
    #[arg(long)]
    show_details: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let extractor = DocumentExtractor::from_config(&config.extraction);

    let extracted = read_document(&args.input, &extractor).await?;

    if let Some(reason) = &extracted.degraded {
        eprintln!("{} {}", style("⚠").yellow(), reason);
    }
    if args.show_details {
        eprintln!(
            "{} Format: {}, encoding: {}",
            style("ℹ").blue(),
            extracted.format,
            extracted.encoding.as_deref().unwrap_or("n/a")
        );
    }

    emit(&extracted.text, args.output.as_deref())
}
