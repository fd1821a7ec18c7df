//! Batch command - parse many contract documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use termcalc_core::{
    ContractParser, DocumentExtractor, ExtractedText, HeuristicContractParser, ParsedContractFields,
};

use super::parse::format_fields;
use super::{load_config, read_document, OutputFormat};

/// Extensions picked up from the glob.
const SUPPORTED_EXTENSIONS: [&str; 4] = ["pdf", "docx", "txt", "csv"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files
    #[arg(required = true)]
    input: String,

    /// Directory for per-file output
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write a summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    extracted: Option<ExtractedText>,
    fields: Option<ParsedContractFields>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = DocumentExtractor::from_config(&config.extraction);
    let parser = HeuristicContractParser::from_config(&config.extraction);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = read_document(&path, &extractor).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(extracted) => {
                let fields = parser.parse(&extracted.text).fields;
                if let Some(output_dir) = &args.output_dir {
                    write_output(output_dir, &path, &fields, args.format)?;
                }
                results.push(FileResult {
                    path,
                    extracted: Some(extracted),
                    fields: Some(fields),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                results.push(FileResult {
                    path,
                    extracted: None,
                    fields: None,
                    error: Some(error_msg),
                    processing_time_ms,
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    let degraded = results
        .iter()
        .filter(|r| r.extracted.as_ref().is_some_and(ExtractedText::is_degraded))
        .count();

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} degraded",
        style(results.len() - failed).green(),
        style(failed).red(),
        style(degraded).yellow()
    );

    if failed > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for result in results.iter().filter(|r| r.error.is_some()) {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn write_output(
    output_dir: &Path,
    input: &Path,
    fields: &ParsedContractFields,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("contract");
    let extension = match format {
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
        OutputFormat::Text => "txt",
    };

    let output_path = output_dir.join(format!("{}.{}", stem, extension));
    fs::write(&output_path, format_fields(fields, format)?)?;
    debug!("Wrote output to {}", output_path.display());
    Ok(())
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "format",
        "degraded",
        "contract_days",
        "packages",
        "dates",
        "mod_under_12_months",
        "mod_under_24_months",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        match (&result.extracted, &result.fields) {
            (Some(extracted), Some(fields)) => {
                let packages = fields
                    .package_amounts
                    .as_ref()
                    .map(|p| {
                        p.iter()
                            .map(|(name, amount)| format!("{}={}", name, amount))
                            .collect::<Vec<_>>()
                            .join(";")
                    })
                    .unwrap_or_default();
                let dates = fields
                    .dates
                    .as_ref()
                    .map(|d| d.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(";"))
                    .unwrap_or_default();
                let mod_penalties = fields.mod_specific.clone().unwrap_or_default();
                let optional = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();

                wtr.write_record([
                    filename,
                    "success",
                    &extracted.format.to_string(),
                    if extracted.is_degraded() { "yes" } else { "no" },
                    &optional(fields.contract_days),
                    &packages,
                    &dates,
                    &optional(mod_penalties.under_12_months),
                    &optional(mod_penalties.under_24_months),
                    &result.processing_time_ms.to_string(),
                    "",
                ])?;
            }
            _ => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    &result.processing_time_ms.to_string(),
                    result.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
