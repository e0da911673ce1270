use std::fmt;

/// Errors surfaced by maze generation and run coordination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Grid size is too small or not odd. Generation does not start.
    InvalidGridSize(u16),
    /// A run (or compare batch) is already active; the request is rejected,
    /// not queued.
    RunInProgress,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidGridSize(size) => {
                write!(f, "invalid grid size {size}: must be an odd number >= 5")
            }
            Error::RunInProgress => write!(f, "a run is already in progress"),
        }
    }
}

impl std::error::Error for Error {}
