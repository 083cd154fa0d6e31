//! Common utilities for integration tests.

pub mod localstack;

pub use localstack::{LocalStackTestContext, gzip_lines};
