//! Market Data Fetcher
//! Downloads daily OHLCV history from Yahoo Finance (blocking client).

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use yahoo_finance_api::{Quote, YahooConnector};

use crate::data::StockSeries;
use crate::error::ChartError;

/// Date format used for both the start-date input and the series index.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub struct DataFetcher;

impl DataFetcher {
    /// Parse a start date, strictly `YYYY-MM-DD`.
    pub fn parse_start_date(input: &str) -> Result<OffsetDateTime, ChartError> {
        let trimmed = input.trim();
        let date = Date::parse(trimmed, DATE_FORMAT)
            .map_err(|_| ChartError::Parse(trimmed.to_string()))?;
        Ok(date.midnight().assume_utc())
    }

    /// Download daily history for `ticker` from `start` through now.
    ///
    /// The ticker is not validated up front; unknown symbols, network
    /// failures and malformed responses all surface as a fetch error.
    pub fn fetch(ticker: &str, start: OffsetDateTime) -> Result<StockSeries, ChartError> {
        let end = OffsetDateTime::now_utc();
        tracing::info!(ticker, start = %start.date(), "downloading daily history");

        let provider = YahooConnector::new().map_err(|e| ChartError::Fetch(e.to_string()))?;
        let response = provider
            .get_quote_history(ticker, start, end)
            .map_err(|e| ChartError::Fetch(e.to_string()))?;
        let quotes = response
            .quotes()
            .map_err(|e| ChartError::Fetch(e.to_string()))?;

        if quotes.is_empty() {
            return Err(ChartError::Fetch(format!(
                "no price data returned for '{ticker}'"
            )));
        }

        let series = Self::series_from_quotes(&quotes)?;
        tracing::info!(ticker, rows = series.len(), "download complete");
        Ok(series)
    }

    /// Build the date-indexed table, formatting each trading day as
    /// YYYY-MM-DD the way the charts label it.
    pub fn series_from_quotes(quotes: &[Quote]) -> Result<StockSeries, ChartError> {
        let mut dates = Vec::with_capacity(quotes.len());
        let mut open = Vec::with_capacity(quotes.len());
        let mut high = Vec::with_capacity(quotes.len());
        let mut low = Vec::with_capacity(quotes.len());
        let mut close = Vec::with_capacity(quotes.len());
        let mut volume = Vec::with_capacity(quotes.len());

        for quote in quotes {
            let day = OffsetDateTime::from_unix_timestamp(quote.timestamp as i64)
                .map_err(|e| ChartError::Fetch(format!("bad timestamp in response: {e}")))?;
            let formatted = day
                .date()
                .format(DATE_FORMAT)
                .map_err(|e| ChartError::Fetch(format!("bad timestamp in response: {e}")))?;

            dates.push(formatted);
            open.push(quote.open);
            high.push(quote.high);
            low.push(quote.low);
            close.push(quote.close);
            volume.push(quote.volume);
        }

        StockSeries::new(dates, open, high, low, close, volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_date() {
        let parsed = DataFetcher::parse_start_date("2020-09-01").unwrap();
        assert_eq!(parsed.date().to_string(), "2020-09-01");
        assert_eq!(parsed.time().as_hms(), (0, 0, 0));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(DataFetcher::parse_start_date(" 2020-09-01 ").is_ok());
    }

    #[test]
    fn test_parse_rejects_wrong_field_order() {
        let err = DataFetcher::parse_start_date("09-01-2020").unwrap_err();
        assert!(matches!(err, ChartError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DataFetcher::parse_start_date("not a date").is_err());
        assert!(DataFetcher::parse_start_date("").is_err());
        assert!(DataFetcher::parse_start_date("2020/09/01").is_err());
    }

    fn quote(timestamp: u64, price: f64, volume: u64) -> Quote {
        Quote {
            timestamp,
            open: price - 0.5,
            high: price + 1.0,
            low: price - 1.0,
            volume,
            close: price,
            adjclose: price,
        }
    }

    #[test]
    fn test_series_from_quotes_formats_dates() {
        // 2021-02-01 00:00:00 UTC and the following day.
        let quotes = vec![
            quote(1_612_137_600, 100.0, 1_000),
            quote(1_612_224_000, 101.0, 2_000),
        ];
        let series = DataFetcher::series_from_quotes(&quotes).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date().as_deref(), Some("2021-02-01"));
        assert_eq!(series.last_date().as_deref(), Some("2021-02-02"));
        assert_eq!(series.close().unwrap(), vec![100.0, 101.0]);
        assert_eq!(series.volume().unwrap(), vec![1_000, 2_000]);
    }
}
