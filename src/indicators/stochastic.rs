//! Stochastic Oscillator (%K and %D)
//!
//! %K = (Close - Lowest Low) / (Highest High - Lowest Low) * 100
//! %D = SMA(%K, d_period)
//!
//! This is the slow variant: raw %K is smoothed before %D is taken.
//! Flat windows (highest == lowest) produce %K = 50.

/// Lookback for the raw %K line.
pub const K_PERIOD: usize = 14;
/// Smoothing applied to raw %K (slow stochastic).
pub const K_SMOOTH: usize = 3;
/// Smoothing applied to %K to produce %D.
pub const D_PERIOD: usize = 3;

/// The two oscillator lines, aligned to the input series.
#[derive(Debug, Clone)]
pub struct StochasticPair {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

impl StochasticPair {
    /// Replace undefined entries with zero. The chart pipeline expects
    /// fully populated %K/%D columns.
    pub fn zero_filled(mut self) -> Self {
        for v in self.k.iter_mut().chain(self.d.iter_mut()) {
            if v.is_nan() {
                *v = 0.0;
            }
        }
        self
    }
}

/// Slow stochastic with the standard 14/3/3 parameters.
pub fn stochastic(high: &[f64], low: &[f64], close: &[f64]) -> StochasticPair {
    stochastic_with(high, low, close, K_PERIOD, K_SMOOTH, D_PERIOD)
}

/// Slow stochastic with explicit lookback and smoothing periods.
pub fn stochastic_with(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    k_period: usize,
    k_smooth: usize,
    d_period: usize,
) -> StochasticPair {
    assert!(
        k_period > 0 && k_smooth > 0 && d_period > 0,
        "stochastic periods must be > 0"
    );

    let n = close.len();
    let mut raw_k = vec![f64::NAN; n];

    if n >= k_period {
        for i in (k_period - 1)..n {
            let window = (i + 1 - k_period)..=i;
            let lowest = low[window.clone()]
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            let highest = high[window].iter().copied().fold(f64::NEG_INFINITY, f64::max);

            let range = highest - lowest;
            raw_k[i] = if range == 0.0 {
                50.0
            } else {
                (close[i] - lowest) / range * 100.0
            };
        }
    }

    let k = smoothed(&raw_k, k_smooth);
    let d = smoothed(&k, d_period);

    StochasticPair { k, d }
}

/// SMA over a series with a NaN head: any window touching a NaN stays NaN.
fn smoothed(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if n < window {
        return out;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = slice.iter().sum::<f64>() / window as f64;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 10.0 + i as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 0.5).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 0.5).collect();
        (high, low, close)
    }

    #[test]
    fn test_zero_filled_has_no_nan() {
        let (high, low, close) = rising(40);
        let pair = stochastic(&high, &low, &close).zero_filled();
        assert!(pair.k.iter().all(|v| !v.is_nan()));
        assert!(pair.d.iter().all(|v| !v.is_nan()));
        assert_eq!(pair.k.len(), 40);
        assert_eq!(pair.d.len(), 40);
    }

    #[test]
    fn test_head_is_zero_after_fill() {
        let (high, low, close) = rising(40);
        let pair = stochastic(&high, &low, &close).zero_filled();
        // Raw %K starts at index 13, smoothed %K at 15, %D at 17.
        assert_eq!(pair.k[14], 0.0);
        assert!(pair.k[15] != 0.0);
        assert_eq!(pair.d[16], 0.0);
        assert!(pair.d[17] != 0.0);
    }

    #[test]
    fn test_flat_range_pins_k_at_midpoint() {
        let high = vec![10.0; 20];
        let low = vec![10.0; 20];
        let close = vec![10.0; 20];
        let pair = stochastic(&high, &low, &close);
        assert_eq!(pair.k[19], 50.0);
        assert_eq!(pair.d[19], 50.0);
    }

    #[test]
    fn test_rising_close_saturates_k() {
        // Close sits on the window high every day, so %K stays pinned
        // near 100 and the smoothing changes nothing.
        let close: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let pair = stochastic_with(&close, &close, &close, 14, 3, 3);
        // close == high == low makes every window span (high - low) of the
        // lookback range, with close at its top.
        assert!((pair.k[29] - 100.0).abs() < 1e-9);
        assert!((pair.d[29] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_d_is_mean_of_recent_k() {
        let (high, low, close) = rising(40);
        let pair = stochastic(&high, &low, &close);
        let expect = (pair.k[37] + pair.k[38] + pair.k[39]) / 3.0;
        assert!((pair.d[39] - expect).abs() < 1e-9);
    }

    #[test]
    fn test_short_series_is_all_zero_after_fill() {
        let (high, low, close) = rising(5);
        let pair = stochastic(&high, &low, &close).zero_filled();
        assert!(pair.k.iter().all(|&v| v == 0.0));
        assert!(pair.d.iter().all(|&v| v == 0.0));
    }
}
