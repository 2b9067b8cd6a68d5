//! Report ingestion - parses the dispense and purchase CSVs into DataFrames
//! with trimmed headers, validated schemas and a normalized NDC key column.

use crate::error::{CompareError, Result};
use crate::ndc::normalize_ndc_column;
use polars::prelude::*;
use std::io::Cursor;
use tracing::info;

/// Which side of the comparison a report belongs to. The side determines the
/// required input columns and how they are renamed for the merged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Dispense,
    Purchase,
}

impl ReportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Dispense => "dispense",
            ReportKind::Purchase => "purchase",
        }
    }

    /// Columns that must be present after header trimming.
    pub fn required_columns(&self) -> [&'static str; 3] {
        match self {
            ReportKind::Dispense => ["NDC", "Rx Quantity Filled", "Drug Name"],
            ReportKind::Purchase => ["NDC", "TOTAL", "Product Description"],
        }
    }

    /// Input-name to output-name renames for this side.
    pub fn renames(&self) -> [(&'static str, &'static str); 2] {
        match self {
            ReportKind::Dispense => [
                ("Rx Quantity Filled", "Dispensed_Qty"),
                ("Drug Name", "Drug_Name"),
            ],
            ReportKind::Purchase => [
                ("TOTAL", "Purchased_Qty"),
                ("Product Description", "Product_Description"),
            ],
        }
    }

    /// Output name of this side's quantity column.
    pub fn quantity_column(&self) -> &'static str {
        match self {
            ReportKind::Dispense => "Dispensed_Qty",
            ReportKind::Purchase => "Purchased_Qty",
        }
    }
}

/// A parsed, validated and key-normalized report, ready to merge.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    pub df: DataFrame,
}

impl Report {
    /// Parse raw CSV bytes (header row expected) and prepare the report.
    pub fn from_csv_bytes(kind: ReportKind, bytes: &[u8]) -> Result<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(1000))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(|e| CompareError::Csv(format!("{} report: {}", kind.label(), e)))?;

        Self::from_dataframe(kind, df)
    }

    /// Prepare an already-parsed table: trim headers, validate the required
    /// columns, rename them, cast the quantity column to Float64 and
    /// normalize the NDC key.
    ///
    /// Validation happens here, at load time, so a malformed report fails
    /// with a [`CompareError::MissingColumn`] before any merge work starts.
    pub fn from_dataframe(kind: ReportKind, mut df: DataFrame) -> Result<Self> {
        trim_headers(&mut df)?;
        validate_columns(kind, &df)?;

        for (old, new) in kind.renames() {
            df.rename(old, new)?;
        }

        let quantities = df
            .column(kind.quantity_column())?
            .cast(&DataType::Float64)?;
        df.with_column(quantities)?;

        normalize_ndc_column(&mut df)?;

        info!(
            "Loaded {} report: {} rows, {} columns",
            kind.label(),
            df.height(),
            df.width()
        );

        Ok(Self { kind, df })
    }
}

/// Trim leading/trailing whitespace from every column header in place.
pub fn trim_headers(df: &mut DataFrame) -> Result<()> {
    let trimmed: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    df.set_column_names(&trimmed)?;
    Ok(())
}

fn validate_columns(kind: ReportKind, df: &DataFrame) -> Result<()> {
    let names = df.get_column_names();
    for required in kind.required_columns() {
        if !names.contains(&required) {
            return Err(CompareError::MissingColumn {
                column: required.to_string(),
                report: kind.label().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_dispense_csv_with_padded_headers() {
        let csv = b" NDC ,Drug Name, Rx Quantity Filled \n123-45-6789,Aspirin,100\n";
        let report = Report::from_csv_bytes(ReportKind::Dispense, csv).unwrap();

        let names = report.df.get_column_names();
        assert!(names.contains(&"NDC"));
        assert!(names.contains(&"Drug_Name"));
        assert!(names.contains(&"Dispensed_Qty"));

        let ndc = report.df.column("NDC").unwrap().str().unwrap();
        assert_eq!(ndc.get(0), Some("0123456789"));

        let qty = report.df.column("Dispensed_Qty").unwrap().f64().unwrap();
        assert_eq!(qty.get(0), Some(100.0));
    }

    #[test]
    fn test_missing_column_names_column_and_report() {
        let csv = b"NDC,Drug Name\n123,Aspirin\n";
        let err = Report::from_csv_bytes(ReportKind::Dispense, csv).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Rx Quantity Filled"));
        assert!(message.contains("dispense"));
    }

    #[test]
    fn test_unparseable_input_is_a_csv_error() {
        // Row carries more fields than the header defines.
        let csv = b"NDC,TOTAL,Product Description\n1,2,3,4,5\n";
        let err = Report::from_csv_bytes(ReportKind::Purchase, csv).unwrap_err();
        assert!(matches!(err, CompareError::Csv(_)));
    }

    #[test]
    fn test_passthrough_columns_survive() {
        let csv = b"NDC,TOTAL,Product Description,Vendor\n0012345678,120,Aspirin 100mg,Acme\n";
        let report = Report::from_csv_bytes(ReportKind::Purchase, csv).unwrap();
        assert!(report.df.get_column_names().contains(&"Vendor"));
    }

    #[test]
    fn test_missing_quantities_stay_null() {
        let df = df! [
            "NDC" => ["0012345678", "0000000001"],
            "TOTAL" => [Some(120i64), None],
            "Product Description" => ["Aspirin 100mg", "Ibuprofen"]
        ]
        .unwrap();

        let report = Report::from_dataframe(ReportKind::Purchase, df).unwrap();
        let qty = report.df.column("Purchased_Qty").unwrap().f64().unwrap();
        assert_eq!(qty.get(0), Some(120.0));
        assert_eq!(qty.get(1), None);
    }
}
