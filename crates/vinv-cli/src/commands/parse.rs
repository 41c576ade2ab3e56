//! Parse command - extract a purchase draft from a single invoice file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{debug, info};

use vinv_core::models::config::ParseConfig;
use vinv_core::models::invoice::{ParseResult, Vendor};
use vinv_core::vendor;

use crate::source;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (.txt or .pdf)
    #[arg(required = true)]
    input: PathBuf,

    /// Vendor template (default: auto-detect)
    #[arg(short = 'V', long, value_enum)]
    vendor: Option<VendorArg>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print warnings to stderr
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum VendorArg {
    Amazon,
    Wayfair,
}

impl From<VendorArg> for Vendor {
    fn from(arg: VendorArg) -> Self {
        match arg {
            VendorArg::Amazon => Vendor::Amazon,
            VendorArg::Wayfair => Vendor::Wayfair,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON draft
    Json,
    /// One CSV row per line item
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());
    let text = source::read_text(&args.input)?;

    let vendor = match args.vendor {
        Some(arg) => Vendor::from(arg),
        None => vendor::detect(&text).ok_or_else(|| {
            anyhow::anyhow!("could not detect a supported vendor; pass --vendor")
        })?,
    };
    debug!(vendor = vendor.label(), "parsing");

    let result = vendor::parse_invoice_with(vendor, &text, config);

    let output = format_result(&result, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    Ok(())
}

pub fn load_config(path: Option<&str>) -> anyhow::Result<ParseConfig> {
    match path {
        Some(p) => Ok(ParseConfig::from_file(std::path::Path::new(p))?),
        None => Ok(ParseConfig::default()),
    }
}

pub fn format_result(result: &ParseResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ParseResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "order_number",
        "order_date",
        "description",
        "sku",
        "quantity",
        "unit_price",
        "total",
        "section",
        "shipped_on",
    ])?;

    for item in &result.line_items {
        wtr.write_record([
            result.header.order_number.clone().unwrap_or_default(),
            result
                .header
                .order_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            item.description.clone(),
            item.sku.clone().unwrap_or_default(),
            item.quantity.to_string(),
            item.unit_price.to_string(),
            item.total.to_string(),
            item.section.as_str().to_string(),
            item.shipped_on.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ParseResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Vendor: {}\n", result.header.vendor.label()));
    if let Some(number) = &result.header.order_number {
        output.push_str(&format!("Order: {}\n", number));
    }
    if let Some(date) = result.header.order_date {
        output.push_str(&format!("Placed: {}\n", date));
    }
    output.push('\n');

    output.push_str("Items:\n");
    for item in &result.line_items {
        output.push_str(&format!(
            "  {} x {} @ {} = {}\n",
            item.quantity, item.description, item.unit_price, item.total
        ));
        if let Some(sku) = &item.sku {
            output.push_str(&format!("      SKU: {}\n", sku));
        }
    }

    output.push('\n');
    if let Some(total) = result.header.order_total {
        output.push_str(&format!("Order total: {}\n", total));
    }

    if !result.warnings.is_empty() {
        output.push_str(&format!("\nWarnings ({}):\n", result.warnings.len()));
        for warning in &result.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
