//! Driver errors.

use brickwork_kernel::RealError;
use brickwork_search::SearchError;

/// Error during a driver run.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Reading input or writing the report failed.
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// Input ended before a required value.
    #[error("input ended while reading {expected}")]
    UnexpectedEof { expected: &'static str },
    /// A token did not parse as the expected kind of number.
    #[error("expected {expected}, got {token:?}")]
    Parse {
        expected: &'static str,
        token: String,
    },
    /// A coefficient is NaN or infinite.
    #[error("coefficient of x^{exponent} must be finite, got {value}")]
    InvalidCoefficient { exponent: u32, value: f64 },
    /// The requested starting interval is too large to represent.
    #[error("starting interval [-2^{n},2^{n}] is out of range")]
    InvalidInterval { n: i32 },
    #[error(transparent)]
    Real(#[from] RealError),
    #[error(transparent)]
    Search(#[from] SearchError),
}
