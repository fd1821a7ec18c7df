//! Calc command - compute fees for a usage window against a parsed contract.

use std::path::PathBuf;

use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::info;

use termcalc_core::models::fees::{FeeResult, PackageStrategy};
use termcalc_core::{
    ContractParser, DocumentExtractor, FeeCalculator, FeeRequest, HeuristicContractParser,
    ParsedContractFields,
};

use super::{emit, load_config, read_document, OutputFormat};

/// Arguments for the calc command.
#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["contract", "fields"]),
))]
pub struct CalcArgs {
    /// Contract document to parse
    #[arg(long)]
    contract: Option<PathBuf>,

    /// Parsed fields JSON written by `termcalc parse`
    #[arg(long)]
    fields: Option<PathBuf>,

    /// Usage start date (YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// Usage end date (YYYY-MM-DD)
    #[arg(long)]
    end: String,

    /// Billing cycle id (1-6)
    #[arg(long)]
    cycle: u32,

    /// New monthly rent
    #[arg(long)]
    new_rent: Decimal,

    /// Old monthly rent
    #[arg(long)]
    old_rent: Decimal,

    /// Package name to match against parsed prices
    #[arg(long)]
    package: Option<String>,

    /// Subsidy tier label, e.g. 100M/40M
    #[arg(long)]
    tier: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: CalcArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let fields = match (&args.fields, &args.contract) {
        (Some(path), _) => {
            let json = tokio::fs::read_to_string(path).await?;
            ParsedContractFields::from_json(&json)
                .map_err(|e| anyhow::anyhow!("Invalid fields file {}: {}", path.display(), e))?
        }
        (None, Some(path)) => {
            let extractor = DocumentExtractor::from_config(&config.extraction);
            let extracted = read_document(path, &extractor).await?;
            if let Some(reason) = &extracted.degraded {
                eprintln!("{} {}", style("⚠").yellow(), reason);
            }
            HeuristicContractParser::from_config(&config.extraction)
                .parse(&extracted.text)
                .fields
        }
        (None, None) => anyhow::bail!("Either --contract or --fields is required"),
    };

    let request = FeeRequest {
        start_date: args.start,
        end_date: args.end,
        cycle: args.cycle,
        new_rent: args.new_rent,
        old_rent: args.old_rent,
        package_name: args.package,
        subsidy_tier: args.tier,
    };

    let calculator = FeeCalculator::new(config.calculation);
    let result = calculator.calculate(&request, &fields)?;
    info!("Total fee: {}", result.total_fee);

    if let Some(package) = &result.channel_penalty.package {
        if package.strategy == PackageStrategy::FirstAvailable {
            eprintln!(
                "{} No package matched {:?}; used {} ({} 元)",
                style("⚠").yellow(),
                package.requested,
                package.name,
                package.price
            );
        }
    }

    let output = format_result(&result, args.format)?;
    emit(&output, args.output.as_deref())
}

fn format_result(result: &FeeResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// One row per rent period, then one per penalty and the total.
fn format_csv(result: &FeeResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["component", "label", "days", "amount"])?;
    for charge in &result.rent_adjustment.per_period {
        wtr.write_record([
            "rent_adjustment",
            &charge.label,
            &charge.days.to_string(),
            &charge.amount.to_string(),
        ])?;
    }

    let package = result
        .channel_penalty
        .package
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_default();
    wtr.write_record([
        "channel_penalty",
        &package,
        &result.usage_days.to_string(),
        &result.channel_penalty.amount.to_string(),
    ])?;
    wtr.write_record([
        "mod_penalty",
        "",
        &result.usage_days.to_string(),
        &result.mod_penalty.amount.to_string(),
    ])?;

    let tier = result
        .subsidy_clawback
        .tier
        .as_ref()
        .map(|t| t.tier.clone())
        .unwrap_or_default();
    wtr.write_record([
        "subsidy_clawback",
        &tier,
        &result.subsidy_clawback.remaining_days.to_string(),
        &result.subsidy_clawback.amount.to_string(),
    ])?;
    wtr.write_record(["total", "", "", &result.total_fee.to_string()])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &FeeResult) -> String {
    let mut output = String::new();

    let cycle_end = result
        .billing_cycle_end
        .map(|d| d.to_string())
        .unwrap_or_else(|| "month end".to_string());
    output.push_str(&format!(
        "Billing cycle {}: day {} to {}\n",
        result.billing_cycle, result.billing_cycle_start, cycle_end
    ));
    output.push_str(&format!(
        "Usage: {} of {} contract days\n",
        result.usage_days, result.contract_days
    ));
    output.push('\n');

    output.push_str(&format!("Rent adjustment ({} / month):\n", result.monthly_rent_diff));
    for charge in &result.rent_adjustment.per_period {
        output.push_str(&format!(
            "  {}  {:>3} days  {:>8}\n",
            charge.label, charge.days, charge.amount
        ));
    }
    output.push_str(&format!("  Total: {}\n", result.rent_adjustment.total_amount));
    output.push('\n');

    match &result.channel_penalty.package {
        Some(package) => output.push_str(&format!(
            "Channel penalty: {} ({}, {:?})\n",
            result.channel_penalty.amount, package.name, package.strategy
        )),
        None => output.push_str("Channel penalty: 0 (no package prices)\n"),
    }
    output.push_str(&format!("MOD penalty: {}\n", result.mod_penalty.amount));
    match &result.subsidy_clawback.tier {
        Some(tier) => output.push_str(&format!(
            "Subsidy clawback: {} ({} x {} days, {:?})\n",
            result.subsidy_clawback.amount,
            tier.daily_rate,
            result.subsidy_clawback.remaining_days,
            tier.strategy
        )),
        None => output.push_str("Subsidy clawback: 0 (no daily rates)\n"),
    }
    output.push('\n');

    output.push_str(&format!("Total fee: {}\n", result.total_fee));
    output
}
