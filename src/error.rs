//! Application error kinds.
//! Every failure in the fetch/compute/render pipeline maps onto one of these
//! variants and is surfaced through the same modal dialog.

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("invalid start date '{0}': expected YYYY-MM-DD")]
    Parse(String),
    #[error("failed to fetch stock data: {0}")]
    Fetch(String),
    #[error("indicator computation failed: {0}")]
    Compute(String),
    #[error("chart rendering failed: {0}")]
    Render(String),
    #[error("failed to write chart file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PolarsError> for ChartError {
    fn from(e: PolarsError) -> Self {
        ChartError::Compute(e.to_string())
    }
}
