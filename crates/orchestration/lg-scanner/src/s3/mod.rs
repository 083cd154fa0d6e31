//! S3 implementations of the lister and fetcher capabilities.
//!
//! - Client configuration with LocalStack and assume-role support
//! - Single-page object listing
//! - Whole-object retrieval

mod client;
mod fetch;
mod list;

pub use client::{S3Config, create_s3_client};
pub use fetch::S3Fetcher;
pub use list::{S3Lister, keys_from_listing};
