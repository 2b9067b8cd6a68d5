//! Excel export - serializes the merged comparison table to an in-memory
//! `.xlsx` workbook for download.

use crate::error::{CompareError, Result};
use polars::prelude::*;
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::info;

/// Default filename for the downloadable report artifact.
pub const REPORT_FILENAME: &str = "NDC_Comparison_Report.xlsx";

/// MIME type of the report artifact.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Serialize every row and column of `df` to xlsx bytes.
///
/// The header row carries the column names; null cells are left empty.
pub fn to_xlsx_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col_idx, name) in df.get_column_names().iter().enumerate() {
        sheet
            .write_string(0, col_idx as u16, *name)
            .map_err(|e| CompareError::Export(e.to_string()))?;
    }

    for (col_idx, series) in df.get_columns().iter().enumerate() {
        for row_idx in 0..series.len() {
            let value = series.get(row_idx)?;
            write_cell(sheet, (row_idx + 1) as u32, col_idx as u16, value)?;
        }
    }

    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| CompareError::Export(e.to_string()))?;

    info!(
        "Exported {} rows x {} columns to xlsx ({} bytes)",
        df.height(),
        df.width(),
        bytes.len()
    );

    Ok(bytes)
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: AnyValue) -> Result<()> {
    let result = match value {
        AnyValue::Null => return Ok(()),
        AnyValue::String(v) => sheet.write_string(row, col, v),
        AnyValue::StringOwned(v) => sheet.write_string(row, col, v.as_str()),
        AnyValue::Boolean(v) => sheet.write_boolean(row, col, v),
        AnyValue::Float64(v) => sheet.write_number(row, col, v),
        AnyValue::Float32(v) => sheet.write_number(row, col, v as f64),
        AnyValue::Int64(v) => sheet.write_number(row, col, v as f64),
        AnyValue::Int32(v) => sheet.write_number(row, col, v as f64),
        AnyValue::Int16(v) => sheet.write_number(row, col, v as f64),
        AnyValue::Int8(v) => sheet.write_number(row, col, v as f64),
        AnyValue::UInt64(v) => sheet.write_number(row, col, v as f64),
        AnyValue::UInt32(v) => sheet.write_number(row, col, v as f64),
        AnyValue::UInt16(v) => sheet.write_number(row, col, v as f64),
        AnyValue::UInt8(v) => sheet.write_number(row, col, v as f64),
        other => sheet.write_string(row, col, &other.to_string()),
    };
    result.map_err(|e| CompareError::Export(e.to_string()))?;
    Ok(())
}
