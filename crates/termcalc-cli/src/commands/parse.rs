//! Parse command - extract billing fields from a single contract.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use termcalc_core::models::contract::ParsedContractFields;
use termcalc_core::{ClauseGroup, ContractParser, DocumentExtractor, HeuristicContractParser};

use super::{emit, load_config, read_document, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF, DOCX or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show parser warnings and timing
    #[arg(long)]
    show_warnings: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let extractor = DocumentExtractor::from_config(&config.extraction);
    let extracted = read_document(&args.input, &extractor).await?;
    if let Some(reason) = &extracted.degraded {
        eprintln!("{} {}", style("⚠").yellow(), reason);
    }

    let parser = HeuristicContractParser::from_config(&config.extraction);
    let result = parser.parse(&extracted.text);

    let output = format_fields(&result.fields, args.format)?;
    emit(&output, args.output.as_deref())?;

    if args.show_warnings {
        for warning in &result.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
        eprintln!(
            "{} {} clauses parsed in {}ms",
            style("ℹ").blue(),
            result.clause_count,
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

pub fn format_fields(fields: &ParsedContractFields, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => format_csv(fields),
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

/// One row per clause hit.
fn format_csv(fields: &ParsedContractFields) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["group", "text", "amount", "pct"])?;
    for (group, hits) in &fields.clauses {
        for hit in hits {
            wtr.write_record([
                group.as_str(),
                &hit.text,
                &hit.amount.map(|a| a.to_string()).unwrap_or_default(),
                &hit.pct.map(|p| p.to_string()).unwrap_or_default(),
            ])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(fields: &ParsedContractFields) -> String {
    let mut output = String::new();

    match fields.contract_days {
        Some(days) => output.push_str(&format!("Contract days: {}\n", days)),
        None => output.push_str("Contract days: not stated\n"),
    }

    if let Some(dates) = &fields.dates {
        let dates: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
        output.push_str(&format!("Dates: {}\n", dates.join(", ")));
    }

    if let Some(packages) = &fields.package_amounts {
        output.push_str("\nPackages:\n");
        for (name, amount) in packages {
            output.push_str(&format!("  {}: {} 元\n", name, amount));
        }
    }

    if let Some(daily) = &fields.daily_amounts {
        output.push_str("\nDaily subsidy:\n");
        for (tier, amount) in daily {
            output.push_str(&format!("  {}: {} 元\n", tier, amount));
        }
    }

    if let Some(mod_penalties) = &fields.mod_specific {
        output.push_str("\nMOD penalties:\n");
        if let Some(amount) = mod_penalties.under_12_months {
            output.push_str(&format!("  under 12 months: {} 元\n", amount));
        }
        if let Some(amount) = mod_penalties.under_24_months {
            output.push_str(&format!("  under 24 months: {} 元\n", amount));
        }
    }

    output.push_str("\nClauses:\n");
    for group in ClauseGroup::ALL {
        output.push_str(&format!("  {}: {}\n", group, fields.hits(group).len()));
    }

    output
}
