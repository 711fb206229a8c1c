use thiserror::Error;

/// Errors raised while building estimators or reading samples.
#[derive(Error, Debug)]
pub enum Error {
    /// Estimators need at least one value.
    #[error("sample is empty")]
    EmptySample,

    /// A sample value lies on or outside the open interval (minimum, maximum).
    #[error("value {value} at index {index} is outside the open interval ({minimum}, {maximum})")]
    InvalidDomain {
        index: usize,
        value: f64,
        minimum: f64,
        maximum: f64,
    },

    /// The interval is empty, inverted or not finite.
    #[error("invalid bounds: minimum ({minimum}) must be less than maximum ({maximum})")]
    InvalidBounds { minimum: f64, maximum: f64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
