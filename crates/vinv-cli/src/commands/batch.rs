//! Batch command - parse multiple invoice files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use vinv_core::models::config::ParseConfig;
use vinv_core::models::invoice::ParseResult;
use vinv_core::vendor;

use super::parse::{self, OutputFormat};
use crate::source;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Stop at the first file that fails
    #[arg(long)]
    fail_fast: bool,
}

/// Result of parsing a single file.
struct FileResult {
    path: PathBuf,
    result: Option<ParseResult>,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = parse::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to parse",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        match parse_file(&path, &config) {
            Ok(result) => results.push(FileResult {
                path,
                result: Some(result),
                error: None,
            }),
            Err(e) => {
                if args.fail_fast {
                    anyhow::bail!("failed to parse {}: {}", path.display(), e);
                }
                warn!("failed to parse {}: {}", path.display(), e);
                results.push(FileResult {
                    path,
                    result: None,
                    error: Some(e.to_string()),
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    // Write per-file outputs
    for file_result in &results {
        if let (Some(result), Some(output_dir)) = (&file_result.result, &args.output_dir) {
            let stem = file_result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoice");
            let extension = match args.format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };
            let output_path = output_dir.join(format!("{}.{}", stem, extension));
            fs::write(&output_path, parse::format_result(result, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.result.is_some()).count();
    let failed = results.len() - successful;

    println!();
    println!(
        "{} Parsed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed).red()
    );

    if failed > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for file_result in results.iter().filter(|r| r.error.is_some()) {
            println!(
                "  - {}: {}",
                file_result.path.display(),
                file_result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn parse_file(path: &PathBuf, config: &ParseConfig) -> anyhow::Result<ParseResult> {
    let text = source::read_text(path)?;
    let vendor = vendor::detect(&text)
        .ok_or_else(|| anyhow::anyhow!("no supported vendor signature found"))?;
    Ok(vendor::parse_invoice_with(vendor, &text, config.clone()))
}

fn write_summary(path: &PathBuf, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "vendor",
        "order_number",
        "order_date",
        "order_total",
        "line_items",
        "warnings",
        "error",
    ])?;

    for file_result in results {
        let filename = file_result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(result) = &file_result.result {
            wtr.write_record([
                filename.to_string(),
                "success".to_string(),
                result.header.vendor.label().to_string(),
                result.header.order_number.clone().unwrap_or_default(),
                result
                    .header
                    .order_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                result
                    .header
                    .order_total
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
                result.line_items.len().to_string(),
                result.warnings.len().to_string(),
                String::new(),
            ])?;
        } else {
            wtr.write_record([
                filename.to_string(),
                "error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                file_result.error.clone().unwrap_or_default(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
