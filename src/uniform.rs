use crate::error::{Error, Result};
use crate::kde::Density;

/// Continuous uniform distribution on [low, high].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniform {
    low: f64,
    high: f64,
}

impl Uniform {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(Error::InvalidBounds {
                minimum: low,
                maximum: high,
            });
        }
        Ok(Uniform { low, high })
    }

    /// U(0, 1), the distribution of calibrated p-values.
    pub fn standard() -> Self {
        Uniform {
            low: 0.0,
            high: 1.0,
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Inverse CDF. `p` is not clamped.
    pub fn quantile(&self, p: f64) -> f64 {
        self.low + p * (self.high - self.low)
    }

    /// CDF, clamped to [0, 1].
    pub fn cdf(&self, x: f64) -> f64 {
        ((x - self.low) / (self.high - self.low)).clamp(0.0, 1.0)
    }

    /// Pairs of (theoretical quantile, sorted sample value) for a Q-Q plot,
    /// using plotting positions (i - 0.5) / n.
    pub fn qq_pairs(&self, sample: &[f64]) -> Vec<(f64, f64)> {
        let mut sorted = sample.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        sorted
            .into_iter()
            .enumerate()
            .map(|(i, value)| (self.quantile((i as f64 + 0.5) / n), value))
            .collect()
    }
}

impl Density for Uniform {
    fn pdf(&self, x: f64) -> f64 {
        if x < self.low || x > self.high {
            0.0
        } else {
            1.0 / (self.high - self.low)
        }
    }
}
