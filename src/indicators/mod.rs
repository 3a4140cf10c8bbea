//! Indicators module - moving averages and the stochastic oscillator

mod sma;
mod stochastic;

pub use sma::{MovingAverage, SMA_WINDOWS};
pub use stochastic::{stochastic, StochasticPair};
