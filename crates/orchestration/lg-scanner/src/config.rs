//! Configuration types for a scan run.

use lg_error::{LgError, Result};
use lg_types::ScanTarget;
use serde::{Deserialize, Serialize};

use crate::decode::Compression;

/// Configuration for a scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Bucket and prefix to enumerate
    pub target: ScanTarget,

    /// Identifier searched for; combined with the match marker
    pub token: String,

    /// Compression of stored objects
    pub compression: Compression,

    /// Upper bound on concurrently scanned objects (`None` = one task per
    /// object, all in flight at once)
    pub max_concurrency: Option<usize>,
}

impl ScanConfig {
    /// Create a configuration scanning `target` for `token`.
    pub fn new(target: ScanTarget, token: impl Into<String>) -> Self {
        Self {
            target,
            token: token.into(),
            compression: Compression::default(),
            max_concurrency: None,
        }
    }

    /// Set the compression of stored objects.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Bound the number of concurrently scanned objects.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency);
        self
    }

    /// Validate the configuration.
    ///
    /// An empty token is valid: it matches every line carrying the marker.
    pub fn validate(&self) -> Result<()> {
        if self.target.bucket.is_empty() {
            return Err(LgError::Config("bucket must not be empty".to_string()));
        }

        if self.max_concurrency == Some(0) {
            return Err(LgError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
