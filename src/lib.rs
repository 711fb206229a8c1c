//! Visual checks of p-value calibration: boundary-corrected kernel density
//! estimates and Q-Q comparisons against the uniform distribution.

pub mod bounded;
pub mod error;
pub mod kde;
pub mod parsing;
pub mod plot;
pub mod stats;
pub mod uniform;

pub use bounded::{
    BoundedKde, ReflectingKde, Strategy, TransformingKde, build_reflecting_estimator,
    build_transforming_estimator,
};
pub use error::{Error, Result};
pub use kde::{Density, GaussianKde};
pub use uniform::Uniform;
