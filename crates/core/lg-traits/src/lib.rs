//! Capability traits for loggrep.
//!
//! The scan pipeline never talks to S3 or the filesystem directly. It calls
//! these traits, which lets the orchestrator run against in-memory fakes in
//! tests and against S3 in production:
//!
//! - [`ObjectLister`] - enumerates the keys under a bucket/prefix
//! - [`ObjectFetcher`] - downloads the raw bytes of one object
//! - [`MatchSink`] - receives each matched line

use async_trait::async_trait;
use bytes::Bytes;
use lg_error::Result;
use lg_types::ObjectKey;

/// Enumerates the objects a run should scan.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// List the keys under `prefix` in `bucket`.
    ///
    /// Implementations issue a single listing request and return keys in the
    /// order the backend reported them.
    async fn list(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<ObjectKey>>;
}

/// Retrieves the raw, still-compressed bytes of an object.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Fetch the full body of `key` in `bucket`.
    async fn fetch(&self, bucket: &str, key: &ObjectKey) -> Result<Bytes>;
}

/// Destination for matched lines.
///
/// `emit` is called concurrently from every in-flight scan unit, so
/// implementations must make each call's output land as one complete line.
#[async_trait]
pub trait MatchSink: Send + Sync {
    /// Write one matched line (without its terminator).
    async fn emit(&self, line: &str) -> Result<()>;

    /// Flush any buffered output.
    ///
    /// Called once after every scan unit has completed successfully.
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
