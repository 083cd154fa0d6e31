//! Scan pipeline for loggrep.
//!
//! Lists every object under a bucket prefix, then fetches, decompresses and
//! scans each one concurrently, emitting the lines that carry
//! `<token>\thttp` to stdout and optionally to a `<stem>.log` file.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────────────────────────────┐
//! │ ObjectLister │───►│ Scanner (one ScanUnit per key)           │
//! └──────────────┘    │  fetch ─► decode ─► match ─► MatchSink   │
//!                     └──────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lg_scanner::{LineSink, S3Config, S3Fetcher, S3Lister, ScanConfig, Scanner, create_s3_client};
//! use lg_types::ScanTarget;
//! use std::sync::Arc;
//!
//! let client = create_s3_client(&S3Config::new().with_region("us-east-1")).await?;
//! let config = ScanConfig::new(ScanTarget::new("cdn-logs").with_prefix("2021/"), "user42");
//!
//! let scanner = Scanner::new(
//!     config,
//!     Arc::new(S3Lister::new(client.clone())),
//!     Arc::new(S3Fetcher::new(client)),
//!     Arc::new(LineSink::stdout(None)),
//! );
//! let stats = scanner.run().await?;
//! ```

mod config;
mod decode;
mod matcher;
mod output;
mod s3;
mod scanner;
mod stats;

pub use config::ScanConfig;
pub use decode::{Compression, Decoder};
pub use matcher::{LineMatcher, MATCH_MARKER, matches};
pub use output::{LineSink, OutputTarget};
pub use s3::{S3Config, S3Fetcher, S3Lister, create_s3_client, keys_from_listing};
pub use scanner::Scanner;
pub use stats::{ScanStats, StatsSnapshot};
