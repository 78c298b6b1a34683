use thiserror::Error;

/// Failure vocabulary shared by the dispatcher and every resizing algorithm,
/// including user-supplied implementations of [`crate::resize::Resizer`].
/// The first three kinds are raised by validation before any algorithm runs;
/// UnsupportedOperation is raised by an algorithm before it starts computing;
/// ComputationError is raised mid-computation and is never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResizeError {

    #[error("Invalid matrix: {0}")]
    InvalidMatrixType(String),

    #[error("Invalid size: {0} (target size must be a positive integer)")]
    InvalidSize(i64),

    #[error("Invalid method: '{0}'")]
    InvalidMethod(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Computation error: {0}")]
    ComputationError(String)

}

impl ResizeError {

    pub fn invalid_matrix<S : Into<String>>(msg : S) -> Self {
        ResizeError::InvalidMatrixType(msg.into())
    }

    pub fn unsupported<S : Into<String>>(msg : S) -> Self {
        ResizeError::UnsupportedOperation(msg.into())
    }

    pub fn computation<S : Into<String>>(msg : S) -> Self {
        ResizeError::ComputationError(msg.into())
    }

}

/// Errors raised while reading or writing matrices and configuration
/// files from the filesystem.
#[derive(Debug, Error)]
pub enum IoError {

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {msg}")]
    Parse { line : usize, msg : String },

    #[error("Unsupported Matrix Market format: {0}")]
    Unsupported(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Matrix(#[from] ResizeError)

}

impl IoError {

    pub(crate) fn parse<S : Into<String>>(line : usize, msg : S) -> Self {
        IoError::Parse { line, msg : msg.into() }
    }

}
