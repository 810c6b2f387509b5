use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("grid size must be >= 1 and N * N must fit in memory, got {0}")]
    InvalidGridSize(usize),

    #[error("{name} must be > 0, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    #[error("{name} must be finite")]
    NonFiniteParameter { name: &'static str },

    /// Explicit scheme would diverge: dt > h^2 / (4 alpha).
    #[error("time step {time_step} exceeds stability limit {limit} (dt <= h^2 / (4 * alpha))")]
    Unstable { time_step: f64, limit: f64 },

    #[error("field dimension mismatch: expected {expected}x{expected}, found {found}x{found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("initial field contains non-finite values")]
    NonFiniteField,

    #[error("{len} values cannot form a square field")]
    NotSquare { len: usize },

    #[error("thread count must be >= 1")]
    InvalidThreadCount,
}
