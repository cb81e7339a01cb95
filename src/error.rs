//! Error types for the carousel coordinator
//!
//! Only configuration and programmer-misuse errors ever reach the caller.
//! Prefetch failures are reported to the `ErrorReporter` and dropped.

use thiserror::Error;

/// Errors surfaced by the coordinator API
#[derive(Debug, Error)]
pub enum CarouselError {
    /// A compound sub-part was built without its parent carousel context
    #[error("{part} must be constructed inside a carousel context")]
    MissingContext { part: &'static str },
    /// Configuration rejected by validation
    #[error("invalid carousel configuration: {0}")]
    InvalidConfig(String),
    /// Reading or writing a configuration file failed
    #[error("carousel config io error: {0}")]
    Io(#[from] std::io::Error),
    /// A configuration file could not be parsed
    #[error("carousel config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The coordinator task is gone (unmounted or dropped)
    #[error("carousel coordinator has shut down")]
    Closed,
}

/// Failure reported by the external image service for a single prefetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PrefetchError(pub String);

impl PrefetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type Result<T, E = CarouselError> = std::result::Result<T, E>;
