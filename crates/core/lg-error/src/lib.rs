//! Error types for loggrep.
//!
//! This crate provides:
//! - [`LgError`] - Top-level error enum for every failure a run can hit
//! - Domain-specific errors ([`ListError`], [`FetchError`], [`DecodeError`], [`SinkError`])
//! - [`ProcessingStage`] for attaching pipeline context to log events
//!
//! Every error is fatal to the run. Nothing here is retried.

use thiserror::Error;

/// Top-level error type for loggrep.
#[derive(Error, Debug)]
pub enum LgError {
    /// Object listing failed
    #[error("List error: {0}")]
    List(#[from] ListError),

    /// Object retrieval failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Payload decompression failed
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Writing a matched line failed
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A per-object scan task panicked or could not be joined
    #[error("Scan task failed: {0}")]
    Task(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LgError {
    /// The pipeline stage this error originated from, if it has one.
    pub fn stage(&self) -> Option<ProcessingStage> {
        match self {
            Self::List(_) => Some(ProcessingStage::List),
            Self::Fetch(_) => Some(ProcessingStage::Fetch),
            Self::Decode(_) => Some(ProcessingStage::Decode),
            Self::Sink(_) => Some(ProcessingStage::Emit),
            Self::Config(_) | Self::Task(_) | Self::Other(_) => None,
        }
    }
}

/// Listing errors.
#[derive(Error, Debug)]
pub enum ListError {
    /// The bucket does not exist
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    /// Credentials were rejected or lack list permission
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Any other failure of the list request
    #[error("List request failed: {0}")]
    Request(String),
}

/// Object retrieval errors.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Object key does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Access denied
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The get request failed
    #[error("Get request failed: {0}")]
    Request(String),

    /// The response body could not be read to completion
    #[error("Failed to read object body: {0}")]
    Body(String),
}

/// Decompression errors.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Payload is not a valid stream in the expected format
    #[error("Malformed compressed stream: {0}")]
    Malformed(String),

    /// Payload ended before the compressed stream was complete
    #[error("Truncated compressed stream: {0}")]
    Truncated(String),
}

/// Output errors.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Writing to stdout failed
    #[error("Console write failed: {0}")]
    Console(String),

    /// Appending to the output file failed
    #[error("Append failed: {0}")]
    Append(String),

    /// Creating the output file failed
    #[error("Create failed: {0}")]
    Create(String),
}

/// Processing stage for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Enumerating keys under the prefix
    List,

    /// Downloading an object
    Fetch,

    /// Decompressing an object payload
    Decode,

    /// Writing a matched line to console or file
    Emit,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List => write!(f, "List"),
            Self::Fetch => write!(f, "Fetch"),
            Self::Decode => write!(f, "Decode"),
            Self::Emit => write!(f, "Emit"),
        }
    }
}

/// Result type alias using LgError.
pub type Result<T> = std::result::Result<T, LgError>;
