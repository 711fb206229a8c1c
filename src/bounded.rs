//! Boundary-corrected kernel density estimators.
//!
//! A plain Gaussian KDE leaks probability mass across the edges of a bounded
//! support. Two corrections are offered:
//!
//! - [`ReflectingKde`] works on [0, 1] and folds the leaked mass back by
//!   adding the kernel sum mirrored across each boundary.
//! - [`TransformingKde`] maps (minimum, maximum) onto the real line with a
//!   logit transform, fits there, and maps the estimate back with the
//!   change-of-variables Jacobian.
//!
//! [`BoundedKde`] wraps both behind one tagged interface.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::kde::{Density, GaussianKde};

pub const DEFAULT_MINIMUM: f64 = 0.0;
pub const DEFAULT_MAXIMUM: f64 = 2.0;

/// Unbounded density above this level at -1 or 2 means a single reflection
/// per boundary under-corrects noticeably.
const MARGIN_WARN_DENSITY: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Mirror kernels across 0 and 1
    #[value(name = "reflect")]
    Reflect,
    /// Fit in logit space and transform back
    #[value(name = "logit")]
    Logit,
}

/// Gaussian KDE on [0, 1] with one reflection across each boundary.
///
/// Assumes the unbounded estimate has negligible mass outside [-1, 2]; only
/// the first mirror image on each side is added.
#[derive(Clone, Debug)]
pub struct ReflectingKde {
    kde: GaussianKde,
}

impl ReflectingKde {
    pub fn new(sample: &[f64]) -> Result<Self> {
        let kde = GaussianKde::new(sample)?;

        if exceeds_margin(&kde) {
            warn!(
                density_at_minus_one = kde.pdf(-1.0),
                density_at_two = kde.pdf(2.0),
                "kde extends past the reflection margin, estimate under-corrects"
            );
        }

        Ok(ReflectingKde { kde })
    }

    pub fn bandwidth(&self) -> f64 {
        self.kde.bandwidth()
    }
}

/// True when the unbounded estimate still has noticeable density at -1 or 2.
fn exceeds_margin(kde: &GaussianKde) -> bool {
    kde.pdf(-1.0) > MARGIN_WARN_DENSITY || kde.pdf(2.0) > MARGIN_WARN_DENSITY
}

impl Density for ReflectingKde {
    fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 || x > 1.0 {
            return 0.0;
        }
        self.kde.pdf(x) + self.kde.pdf(-x) + self.kde.pdf(2.0 - x)
    }
}

/// Gaussian KDE fitted on `logit((x - minimum) / (maximum - minimum))`.
///
/// Exact change of variables inside the open interval. At the bounds the
/// Jacobian denominator is zero and `pdf` returns a non-finite value.
#[derive(Clone, Debug)]
pub struct TransformingKde {
    kde: GaussianKde,
    minimum: f64,
    maximum: f64,
}

impl TransformingKde {
    /// Estimator on the default interval (0, 2).
    pub fn new(sample: &[f64]) -> Result<Self> {
        Self::with_bounds(sample, DEFAULT_MINIMUM, DEFAULT_MAXIMUM)
    }

    pub fn with_bounds(sample: &[f64], minimum: f64, maximum: f64) -> Result<Self> {
        if !(minimum.is_finite() && maximum.is_finite() && minimum < maximum) {
            return Err(Error::InvalidBounds { minimum, maximum });
        }
        if let Some((index, &value)) = sample
            .iter()
            .enumerate()
            .find(|&(_, &v)| !(v > minimum && v < maximum))
        {
            return Err(Error::InvalidDomain {
                index,
                value,
                minimum,
                maximum,
            });
        }

        let diff = maximum - minimum;
        let transformed: Vec<f64> = sample
            .iter()
            .map(|&v| logit((v - minimum) / diff))
            .collect();
        let kde = GaussianKde::new(&transformed)?;
        debug!(minimum, maximum, "fitted logit-space kde");

        Ok(TransformingKde {
            kde,
            minimum,
            maximum,
        })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.minimum, self.maximum)
    }

    pub fn bandwidth(&self) -> f64 {
        self.kde.bandwidth()
    }
}

impl Density for TransformingKde {
    fn pdf(&self, x: f64) -> f64 {
        let diff = self.maximum - self.minimum;
        let u = (x - self.minimum) / diff;
        self.kde.pdf(logit(u)) / (u * (1.0 - u)) / diff
    }
}

/// ln(u / (1 - u)), mapping (0, 1) onto the real line.
pub fn logit(u: f64) -> f64 {
    (u / (1.0 - u)).ln()
}

/// Either boundary-corrected estimator.
#[derive(Clone, Debug)]
pub enum BoundedKde {
    Reflecting(ReflectingKde),
    Transforming(TransformingKde),
}

impl BoundedKde {
    /// Build the estimator for `strategy`. Reflection is fixed to [0, 1] and
    /// ignores `minimum` and `maximum`.
    pub fn build(strategy: Strategy, sample: &[f64], minimum: f64, maximum: f64) -> Result<Self> {
        match strategy {
            Strategy::Reflect => build_reflecting_estimator(sample).map(Self::Reflecting),
            Strategy::Logit => {
                build_transforming_estimator(sample, minimum, maximum).map(Self::Transforming)
            }
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Reflecting(_) => Strategy::Reflect,
            Self::Transforming(_) => Strategy::Logit,
        }
    }

    /// Interval the density is defined on.
    pub fn support(&self) -> (f64, f64) {
        match self {
            Self::Reflecting(_) => (0.0, 1.0),
            Self::Transforming(kde) => kde.bounds(),
        }
    }
}

impl Density for BoundedKde {
    fn pdf(&self, x: f64) -> f64 {
        match self {
            Self::Reflecting(kde) => kde.pdf(x),
            Self::Transforming(kde) => kde.pdf(x),
        }
    }
}

pub fn build_reflecting_estimator(sample: &[f64]) -> Result<ReflectingKde> {
    ReflectingKde::new(sample)
}

pub fn build_transforming_estimator(
    sample: &[f64],
    minimum: f64,
    maximum: f64,
) -> Result<TransformingKde> {
    TransformingKde::with_bounds(sample, minimum, maximum)
}
