use anyhow::{Context, Result};
use clap::Parser;
use ndc_compare::compare::compare_reports;
use ndc_compare::export::{to_xlsx_bytes, REPORT_FILENAME, XLSX_MIME};
use ndc_compare::report::{Report, ReportKind};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ndc-compare")]
#[command(about = "Compare pharmacy dispense and purchase reports by NDC")]
struct Args {
    /// Path to the dispense report CSV
    #[arg(short, long)]
    dispense: PathBuf,

    /// Path to the purchase report CSV
    #[arg(short, long)]
    purchase: PathBuf,

    /// Where to write the xlsx report (default: NDC_Comparison_Report.xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show only the first N rows of the comparison table
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print a JSON coverage summary instead of the table
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let dispense_bytes = fs::read(&args.dispense)
        .with_context(|| format!("Failed to read dispense report {}", args.dispense.display()))?;
    let purchase_bytes = fs::read(&args.purchase)
        .with_context(|| format!("Failed to read purchase report {}", args.purchase.display()))?;

    let dispense = Report::from_csv_bytes(ReportKind::Dispense, &dispense_bytes)?;
    let purchase = Report::from_csv_bytes(ReportKind::Purchase, &purchase_bytes)?;

    let comparison = compare_reports(&dispense, &purchase)?;

    if args.summary {
        println!("{}", serde_json::to_string_pretty(&comparison.summary)?);
    } else {
        println!("{}", comparison.preview(args.limit));
    }

    let bytes = to_xlsx_bytes(&comparison.df)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(REPORT_FILENAME));
    fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write report {}", output.display()))?;

    info!(
        "Wrote {} ({} bytes, {})",
        output.display(),
        bytes.len(),
        XLSX_MIME
    );

    Ok(())
}
