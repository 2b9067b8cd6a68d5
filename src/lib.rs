//! Compare a pharmacy dispense report against a purchase report by
//! normalized NDC: parse both CSVs, outer-join on the cleaned 10-digit key,
//! derive the quantity difference and export the result as an xlsx workbook.

pub mod compare;
pub mod error;
pub mod export;
pub mod ndc;
pub mod report;
