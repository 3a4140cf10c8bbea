//! Simple Moving Average (SMA)
//! Unweighted mean of the last `window` closing prices, aligned to the
//! input series.

use rayon::prelude::*;

/// Windows applied to the close series: 10/30 feed the panel figure,
/// 50/200 feed the overlay figure.
pub const SMA_WINDOWS: [usize; 4] = [10, 30, 50, 200];

/// A moving-average line aligned to the series index.
///
/// The first `window - 1` entries are NaN; defined values start at index
/// `window - 1`. A series shorter than the window yields all NaN.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    pub window: usize,
    pub values: Vec<f64>,
}

impl MovingAverage {
    pub fn of(values: &[f64], window: usize) -> Self {
        assert!(window > 0, "SMA window must be > 0");

        let n = values.len();
        let mut out = vec![f64::NAN; n];

        if n >= window {
            let mut sum: f64 = values[..window].iter().sum();
            out[window - 1] = sum / window as f64;
            for i in window..n {
                sum += values[i] - values[i - window];
                out[i] = sum / window as f64;
            }
        }

        Self {
            window,
            values: out,
        }
    }

    /// Compute one average per window in parallel, preserving input order.
    pub fn set(values: &[f64], windows: &[usize]) -> Vec<MovingAverage> {
        windows
            .par_iter()
            .map(|&w| MovingAverage::of(values, w))
            .collect()
    }

    /// Legend label, e.g. "50 day average".
    pub fn label(&self) -> String {
        format!("{} day average", self.window)
    }

    /// Defined points as `(index, value)`, skipping the NaN head.
    pub fn defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .map(|(i, v)| (i, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_basic() {
        let ma = MovingAverage::of(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(ma.values[0].is_nan());
        assert!(ma.values[1].is_nan());
        assert_eq!(&ma.values[2..], &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sma_defined_count() {
        // A window of w over n points has max(n - w + 1, 0) defined values,
        // starting at index w - 1.
        for (n, w) in [(10usize, 3usize), (10, 10), (250, 200), (5, 1)] {
            let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
            let ma = MovingAverage::of(&values, w);
            assert_eq!(ma.values.len(), n);
            assert_eq!(ma.defined().count(), n - w + 1);
            assert_eq!(ma.defined().next().map(|(i, _)| i), Some(w - 1));
        }
    }

    #[test]
    fn test_sma_insufficient_data() {
        let ma = MovingAverage::of(&[1.0, 2.0, 3.0], 200);
        assert_eq!(ma.values.len(), 3);
        assert_eq!(ma.defined().count(), 0);
    }

    #[test]
    fn test_sma_empty_input() {
        let ma = MovingAverage::of(&[], 10);
        assert!(ma.values.is_empty());
    }

    #[test]
    fn test_sma_set_order() {
        let values: Vec<f64> = (0..300).map(|i| i as f64).collect();
        let set = MovingAverage::set(&values, &SMA_WINDOWS);
        let windows: Vec<usize> = set.iter().map(|ma| ma.window).collect();
        assert_eq!(windows, SMA_WINDOWS);
    }

    #[test]
    fn test_label() {
        let ma = MovingAverage::of(&[1.0], 50);
        assert_eq!(ma.label(), "50 day average");
    }
}
