use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};

/// Anything that can be evaluated as a probability density.
pub trait Density: Sync {
    /// Density at a single point.
    fn pdf(&self, x: f64) -> f64;

    /// Element-wise density over `xs`, same length and order as the input.
    fn pdf_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.par_iter().map(|&x| self.pdf(x)).collect()
    }
}

/// Unbounded Gaussian kernel density estimator.
///
/// Owns a sorted copy of the sample so that `pdf` can restrict the kernel sum
/// to nearby points with a binary search.
#[derive(Clone, Debug)]
pub struct GaussianKde {
    data: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit a KDE using Scott's rule for the bandwidth.
    pub fn new(sample: &[f64]) -> Result<Self> {
        if sample.is_empty() {
            return Err(Error::EmptySample);
        }

        let mut data = sample.to_vec();
        data.sort_by(f64::total_cmp);

        let bandwidth = scotts_rule(&data);
        debug!(n = data.len(), bandwidth, "fitted gaussian kde");

        Ok(GaussianKde { data, bandwidth })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Density for GaussianKde {
    /// Kernel sum over sample points within 4 bandwidths of `x`. Differs from
    /// the full sum by at most K(4) / h ≈ 1.34e-4 / h.
    fn pdf(&self, x: f64) -> f64 {
        let n = self.data.len() as f64;
        let h = self.bandwidth;

        // Beyond 4 bandwidths a kernel contributes < 0.00034 of its peak
        let cutoff = 4.0 * h;
        let lower = x - cutoff;
        let upper = x + cutoff;

        let start_idx = self.data.partition_point(|&xi| xi < lower);
        let end_idx = self.data.partition_point(|&xi| xi <= upper);

        let sum: f64 = self.data[start_idx..end_idx]
            .iter()
            .map(|&xi| gaussian_kernel((x - xi) / h))
            .sum();

        sum / (n * h)
    }
}

/// Scott's rule of thumb: h = σ * n^(-1/5), σ being the n-1 standard deviation.
/// Falls back to 1.0 when the spread is zero or undefined.
fn scotts_rule(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    if data.len() < 2 {
        return 1.0;
    }

    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    if !std_dev.is_finite() || std_dev < f64::EPSILON {
        return 1.0;
    }

    std_dev * n.powf(-0.2)
}

/// Standard Gaussian kernel: K(u) = (1/√(2π)) * e^(-u²/2)
pub(crate) fn gaussian_kernel(u: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.3989422804014327;
    INV_SQRT_2PI * (-0.5 * u * u).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_kernel_at_zero() {
        assert_relative_eq!(gaussian_kernel(0.0), 0.3989422804014327, epsilon = 1e-12);
    }

    #[test]
    fn test_gaussian_kernel_symmetric() {
        assert_eq!(gaussian_kernel(1.5), gaussian_kernel(-1.5));
    }

    #[test]
    fn test_gaussian_kernel_vanishes_at_infinity() {
        assert_eq!(gaussian_kernel(f64::INFINITY), 0.0);
        assert_eq!(gaussian_kernel(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_kde_empty_sample() {
        assert!(matches!(GaussianKde::new(&[]), Err(Error::EmptySample)));
    }

    #[test]
    fn test_kde_sorts_its_copy() {
        let kde = GaussianKde::new(&[5.0, 1.0, 3.0]).unwrap();
        assert_eq!(kde.data, vec![1.0, 3.0, 5.0]);
        assert_eq!(kde.len(), 3);
    }

    #[test]
    fn test_kde_bandwidth_scott() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        // n-1 variance of 1..=5 is 2.5
        let expected = 2.5_f64.sqrt() * 5.0_f64.powf(-0.2);

        let kde = GaussianKde::new(&data).unwrap();
        assert_relative_eq!(kde.bandwidth(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_kde_bandwidth_degenerate() {
        assert_eq!(GaussianKde::new(&[0.5]).unwrap().bandwidth(), 1.0);
        assert_eq!(GaussianKde::new(&[2.0, 2.0, 2.0]).unwrap().bandwidth(), 1.0);
    }

    #[test]
    fn test_kde_pdf_peak_near_data() {
        let kde = GaussianKde::new(&[1.8, 1.9, 2.0, 2.1, 2.2]).unwrap();
        assert!(kde.pdf(2.0) > kde.pdf(2.5));
        assert_eq!(kde.pdf(50.0), 0.0);
    }

    #[test]
    fn test_kde_pdf_bimodal() {
        let kde = GaussianKde::new(&[1.0, 1.1, 1.2, 5.0, 5.1, 5.2]).unwrap();
        let middle = kde.pdf(3.0);
        assert!(kde.pdf(1.1) > middle);
        assert!(kde.pdf(5.1) > middle);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let kde = GaussianKde::new(&[0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();

        let steps = 10_000;
        let (low, high) = (-10.0, 15.0);
        let dx = (high - low) / steps as f64;
        let integral: f64 = (0..steps)
            .map(|i| kde.pdf(low + (i as f64 + 0.5) * dx) * dx)
            .sum();

        assert_relative_eq!(integral, 1.0, epsilon = 0.01);
    }

    #[test]
    fn test_kde_cutoff_error_bound() {
        let data = [0.05, 0.3, 0.31, 0.7, 0.95];
        let kde = GaussianKde::new(&data).unwrap();
        let h = kde.bandwidth();
        let bound = gaussian_kernel(4.0) / h;

        for i in 0..=300 {
            let x = -1.0 + 3.0 * i as f64 / 300.0;
            let full: f64 = data
                .iter()
                .map(|&xi| gaussian_kernel((x - xi) / h))
                .sum::<f64>()
                / (data.len() as f64 * h);
            assert!((kde.pdf(x) - full).abs() <= bound, "x = {x}");
        }
    }

    #[test]
    fn test_pdf_many_matches_pdf() {
        let kde = GaussianKde::new(&[0.1, 0.4, 0.45, 0.9]).unwrap();
        let xs = [-0.5, 0.0, 0.3, 0.7, 1.2];
        let many = kde.pdf_many(&xs);

        assert_eq!(many.len(), xs.len());
        for (x, y) in xs.iter().zip(&many) {
            assert_eq!(kde.pdf(*x), *y);
        }
    }
}
