use thiserror::Error;

/// Top-level error type for path fitting.
#[derive(Debug, Error)]
pub enum PathfitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to the geometric content of the input.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite coordinate at index {index}")]
    NonFinite { index: usize },
}

/// Errors related to fitting operations and their parameters.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),

    #[error("invalid fit parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`PathfitError`].
pub type Result<T> = std::result::Result<T, PathfitError>;
