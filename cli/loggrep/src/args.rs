//! CLI argument definitions for loggrep.

use clap::{Parser, ValueEnum};
use lg_cli_common::parse_positive_usize;
use lg_scanner::Compression;
use std::path::PathBuf;

pub use lg_cli_common::LogLevel;

/// Search CDN access logs stored in S3 for a user token.
///
/// Every object under the prefix is fetched and decompressed concurrently.
/// Lines containing `<TOKEN>\thttp` are printed to stdout and, when an
/// output stem is given, appended to `<STEM>.log` (replaced on each run).
///
/// ## Examples
///
/// Print matches:
///   loggrep user42 -b cdn-logs -p 2021/01/
///
/// Also persist them to ./user42.log, assuming a role first:
///   loggrep user42 user42 -b cdn-logs --role-arn arn:aws:iam::123456789012:role/logs
///
/// Against LocalStack:
///   loggrep user42 -b cdn-logs --s3-endpoint http://localhost:4566
#[derive(Parser, Debug)]
#[command(name = "loggrep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// User token to search for
    pub token: String,

    /// Output file stem; matches are appended to `<STEM>.log`
    #[arg(value_name = "STEM")]
    pub output: Option<PathBuf>,

    // === S3 Configuration ===
    /// S3 bucket name
    #[arg(short, long, env = "LOGGREP_BUCKET")]
    pub bucket: String,

    /// S3 key prefix to scan
    #[arg(short, long, env = "LOGGREP_PREFIX")]
    pub prefix: Option<String>,

    /// IAM role to assume (ignored unless it starts with "arn")
    #[arg(long, env = "LOGGREP_ROLE_ARN")]
    pub role_arn: Option<String>,

    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "LOGGREP_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Per-operation timeout in seconds
    #[arg(long, env = "LOGGREP_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    // === Scan Options ===
    /// Compression of stored objects
    #[arg(long, value_enum, env = "LOGGREP_COMPRESSION", default_value = "gzip")]
    pub compression: CompressionArg,

    /// Maximum objects scanned at once (default: all at once)
    #[arg(long, env = "LOGGREP_MAX_CONCURRENCY", value_parser = parse_positive_usize)]
    pub max_concurrency: Option<usize>,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Suppress the run summary on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

/// Compression argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    /// Gzip, possibly multi-member
    Gzip,
    /// Zstandard
    Zstd,
    /// Plain text
    None,
    /// Chosen per object from the key extension
    Auto,
}

impl From<CompressionArg> for Compression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Gzip => Compression::Gzip,
            CompressionArg::Zstd => Compression::Zstd,
            CompressionArg::None => Compression::None,
            CompressionArg::Auto => Compression::Auto,
        }
    }
}
