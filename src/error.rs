use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Missing required column '{column}' in {report} report")]
    MissingColumn { column: String, report: String },

    #[error("CSV parse error: {0}")]
    Csv(String),

    #[error("Polars error: {0}")]
    Polars(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PolarsError> for CompareError {
    fn from(e: PolarsError) -> Self {
        CompareError::Polars(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;
