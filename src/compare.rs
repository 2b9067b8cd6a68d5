//! Report merger - outer-joins the two prepared reports on the normalized
//! NDC key and derives the quantity difference.

use crate::error::Result;
use crate::report::{Report, ReportKind};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Distinct-key coverage tallies for a completed comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Rows in the merged table (includes duplicate-key expansion).
    pub rows: usize,
    /// Distinct NDCs present in both reports.
    pub matched: usize,
    /// Distinct NDCs present only in the dispense report.
    pub dispense_only: usize,
    /// Distinct NDCs present only in the purchase report.
    pub purchase_only: usize,
}

/// The merged comparison table plus its coverage summary.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub df: DataFrame,
    pub summary: ComparisonSummary,
}

impl Comparison {
    /// Bounded view of the merged table: the first `limit` rows, or the
    /// whole table when no limit is given.
    pub fn preview(&self, limit: Option<usize>) -> DataFrame {
        match limit {
            Some(n) => self.df.head(Some(n)),
            None => self.df.clone(),
        }
    }
}

/// Result of [`compare_when_ready`]: either both inputs were supplied and the
/// comparison ran, or the caller is still waiting for one or both files.
#[derive(Debug)]
pub enum ComparisonState {
    AwaitingInput {
        have_dispense: bool,
        have_purchase: bool,
    },
    Complete(Comparison),
}

/// Compare the two reports once both byte streams are available.
///
/// Inputs are explicit parameters rather than ambient session state; until
/// both are present this returns `AwaitingInput` naming what is still
/// missing, which is a status, not an error.
pub fn compare_when_ready(
    dispense: Option<&[u8]>,
    purchase: Option<&[u8]>,
) -> Result<ComparisonState> {
    match (dispense, purchase) {
        (Some(dispense_bytes), Some(purchase_bytes)) => {
            let dispense = Report::from_csv_bytes(ReportKind::Dispense, dispense_bytes)?;
            let purchase = Report::from_csv_bytes(ReportKind::Purchase, purchase_bytes)?;
            Ok(ComparisonState::Complete(compare_reports(
                &dispense, &purchase,
            )?))
        }
        (dispense, purchase) => Ok(ComparisonState::AwaitingInput {
            have_dispense: dispense.is_some(),
            have_purchase: purchase.is_some(),
        }),
    }
}

/// Full outer join on `NDC` plus the derived `Difference` column.
///
/// Every NDC present in either report appears in the output (duplicate keys
/// expand per ordinary outer-join multiplicity). `Difference` treats a null
/// quantity as zero; the per-side quantity columns keep their nulls.
pub fn compare_reports(dispense: &Report, purchase: &Report) -> Result<Comparison> {
    let dispense_keys = ndc_keys(&dispense.df)?;
    let purchase_keys = ndc_keys(&purchase.df)?;

    let merged = dispense
        .df
        .clone()
        .lazy()
        .join(
            purchase.df.clone().lazy(),
            [col("NDC")],
            [col("NDC")],
            JoinArgs::new(JoinType::Outer).with_coalesce(JoinCoalesce::CoalesceColumns),
        )
        .with_column(
            (col("Purchased_Qty").fill_null(lit(0.0)) - col("Dispensed_Qty").fill_null(lit(0.0)))
                .alias("Difference"),
        )
        .collect()?;

    let summary = ComparisonSummary {
        rows: merged.height(),
        matched: dispense_keys.intersection(&purchase_keys).count(),
        dispense_only: dispense_keys.difference(&purchase_keys).count(),
        purchase_only: purchase_keys.difference(&dispense_keys).count(),
    };

    info!(
        "Comparison complete: {} rows ({} matched, {} dispense-only, {} purchase-only NDCs)",
        summary.rows, summary.matched, summary.dispense_only, summary.purchase_only
    );

    Ok(Comparison { df: merged, summary })
}

/// Distinct non-null NDC keys of a prepared report.
fn ndc_keys(df: &DataFrame) -> Result<HashSet<String>> {
    let mut keys = HashSet::new();
    for value in df.column("NDC")?.str()?.into_iter().flatten() {
        keys.insert(value.to_string());
    }
    Ok(keys)
}
