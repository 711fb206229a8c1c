use crate::uniform::Uniform;

/// Pre-computed statistics over a sorted sample.
/// Data is kept sorted for quantile lookups and the ECDF walk.
pub struct Stats {
    pub data: Vec<f64>,
    pub n: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl Stats {
    pub fn new(mut data: Vec<f64>) -> Self {
        data.sort_by(f64::total_cmp);

        let n = data.len();
        let mean = data.iter().sum::<f64>() / n as f64;
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        let std_dev = variance.sqrt();

        Stats {
            data,
            n,
            mean,
            variance,
            std_dev,
        }
    }

    /// Calculate quantile (0.0 = min, 0.5 = median, 1.0 = max)
    pub fn quantile(&self, q: f64) -> f64 {
        if self.data.is_empty() {
            return f64::NAN;
        }
        if q <= 0.0 {
            return self.data[0];
        }
        if q >= 1.0 {
            return self.data[self.n - 1];
        }

        // Linear interpolation between closest ranks
        let rank = q * (self.n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        let fraction = rank - lower as f64;

        self.data[lower] * (1.0 - fraction) + self.data[upper] * fraction
    }

    /// Share of values at or below `alpha`. Close to `alpha` for calibrated p-values.
    pub fn fraction_below(&self, alpha: f64) -> f64 {
        if self.data.is_empty() {
            return f64::NAN;
        }
        let count = self.data.partition_point(|&x| x <= alpha);
        count as f64 / self.n as f64
    }

    /// Kolmogorov-Smirnov distance between the empirical CDF and U(0, 1).
    pub fn ks_statistic(&self) -> f64 {
        if self.data.is_empty() {
            return f64::NAN;
        }
        let uniform = Uniform::standard();
        let n = self.n as f64;

        self.data
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let f = uniform.cdf(x);
                let above = (i + 1) as f64 / n - f;
                let below = f - i as f64 / n;
                above.max(below)
            })
            .fold(0.0, f64::max)
    }
}
