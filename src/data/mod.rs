//! Data module - market data retrieval and the OHLCV series table

mod fetcher;
mod series;

pub use fetcher::{DataFetcher, DATE_FORMAT};
pub use series::StockSeries;
