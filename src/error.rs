use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be read as a formula, no search was started.
    #[error("malformed input (line {line}): {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(String),

    /// The search reached a state that correct code never produces.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Error {
        Error::MalformedInput { line, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
