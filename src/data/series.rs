//! Date-indexed OHLCV table backed by a Polars DataFrame.
//! One row per trading day; populated once by the fetcher, then extended
//! with the derived %K/%D columns.

use polars::prelude::*;

use crate::error::ChartError;
use crate::indicators::StochasticPair;

pub struct StockSeries {
    df: DataFrame,
}

impl StockSeries {
    /// Build the table from column vectors. Column lengths must match;
    /// a mismatch surfaces as a compute error.
    pub fn new(
        dates: Vec<String>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<u64>,
    ) -> Result<Self, ChartError> {
        let df = DataFrame::new(vec![
            Column::new("date".into(), dates),
            Column::new("open".into(), open),
            Column::new("high".into(), high),
            Column::new("low".into(), low),
            Column::new("close".into(), close),
            Column::new("volume".into(), volume),
        ])?;
        Ok(Self { df })
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// The date index, formatted as YYYY-MM-DD strings.
    pub fn dates(&self) -> Result<Vec<String>, ChartError> {
        let ca = self.df.column("date")?.str()?;
        Ok(ca
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect())
    }

    pub fn first_date(&self) -> Option<String> {
        self.dates().ok()?.first().cloned()
    }

    pub fn last_date(&self) -> Option<String> {
        self.dates().ok()?.last().cloned()
    }

    fn f64_column(&self, name: &str) -> Result<Vec<f64>, ChartError> {
        let ca = self.df.column(name)?.f64()?;
        Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    pub fn open(&self) -> Result<Vec<f64>, ChartError> {
        self.f64_column("open")
    }

    pub fn high(&self) -> Result<Vec<f64>, ChartError> {
        self.f64_column("high")
    }

    pub fn low(&self) -> Result<Vec<f64>, ChartError> {
        self.f64_column("low")
    }

    pub fn close(&self) -> Result<Vec<f64>, ChartError> {
        self.f64_column("close")
    }

    pub fn volume(&self) -> Result<Vec<u64>, ChartError> {
        let ca = self.df.column("volume")?.u64()?;
        Ok(ca.into_iter().map(|v| v.unwrap_or(0)).collect())
    }

    /// Append the oscillator output as the `k` and `d` columns.
    pub fn attach_stochastic(&mut self, pair: &StochasticPair) -> Result<(), ChartError> {
        self.df.with_column(Column::new("k".into(), pair.k.clone()))?;
        self.df.with_column(Column::new("d".into(), pair.d.clone()))?;
        Ok(())
    }

    pub fn k(&self) -> Result<Vec<f64>, ChartError> {
        self.f64_column("k")
    }

    pub fn d(&self) -> Result<Vec<f64>, ChartError> {
        self.f64_column("d")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::stochastic;

    fn sample() -> StockSeries {
        let n = 20usize;
        let dates: Vec<String> = (1..=n).map(|i| format!("2024-01-{i:02}")).collect();
        let close: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        let open: Vec<f64> = close.iter().map(|c| c - 0.5).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        let volume: Vec<u64> = (0..n).map(|i| 1_000 + i as u64).collect();
        StockSeries::new(dates, open, high, low, close, volume).unwrap()
    }

    #[test]
    fn test_build_and_accessors() {
        let series = sample();
        assert_eq!(series.len(), 20);
        assert!(!series.is_empty());
        assert_eq!(series.first_date().as_deref(), Some("2024-01-01"));
        assert_eq!(series.last_date().as_deref(), Some("2024-01-20"));
        assert_eq!(series.close().unwrap()[0], 100.0);
        assert_eq!(series.volume().unwrap()[19], 1_019);
    }

    #[test]
    fn test_length_mismatch_is_compute_error() {
        let err = StockSeries::new(
            vec!["2024-01-01".into()],
            vec![1.0, 2.0],
            vec![1.0],
            vec![1.0],
            vec![1.0],
            vec![10],
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::Compute(_)));
    }

    #[test]
    fn test_attach_stochastic_appends_columns() {
        let mut series = sample();
        let pair = stochastic(
            &series.high().unwrap(),
            &series.low().unwrap(),
            &series.close().unwrap(),
        )
        .zero_filled();

        series.attach_stochastic(&pair).unwrap();

        let k = series.k().unwrap();
        let d = series.d().unwrap();
        assert_eq!(k.len(), series.len());
        assert!(k.iter().all(|v| !v.is_nan()));
        assert!(d.iter().all(|v| !v.is_nan()));
    }
}
