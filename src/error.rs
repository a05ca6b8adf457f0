//! Error taxonomy
//!
//! Every failure is synchronous and leaves the previous snapshot untouched.

/// Errors raised by configuration, planning and the engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpinError {
    #[error("at least one segment is required")]
    EmptySegments,

    #[error("duration must be a finite value >= 0 (got {0})")]
    InvalidDuration(f64),

    #[error("invalid rotation bounds: min {min} > max {max}")]
    InvalidRotations { min: u32, max: u32 },

    #[error("jitter factor must be within [0, 1] (got {0})")]
    InvalidJitter(f64),

    #[error("{0} must be finite (got {1})")]
    InvalidAngle(&'static str, f64),

    #[error("target index {index} out of bounds for {len} segments")]
    TargetIndexOutOfBounds { index: usize, len: usize },

    #[error("engine has been disposed")]
    Disposed,

    #[error("spin was reset or disposed before completing")]
    Abandoned,

    #[error("config parse error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SpinError {
    fn from(err: serde_json::Error) -> Self {
        SpinError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpinError>;
