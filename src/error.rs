use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordCountError {
    /// Rejected before any work was started.
    InvalidArgument(String),
    /// A segment could not be counted; the whole run is void.
    WorkerFailure { segment: usize, reason: String },
}

impl WordCountError {
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        WordCountError::InvalidArgument(msg.into())
    }

    pub fn worker_failure<S: Into<String>>(segment: usize, reason: S) -> Self {
        WordCountError::WorkerFailure {
            segment,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for WordCountError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            WordCountError::InvalidArgument(ref msg) => write!(f, "invalid argument: {}", msg),
            WordCountError::WorkerFailure {
                segment,
                ref reason,
            } => write!(f, "worker for segment {} failed: {}", segment, reason),
        }
    }
}

impl Error for WordCountError {}
