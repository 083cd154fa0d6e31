//! Destinations for matched lines.
//!
//! - [`OutputTarget`] - the optional `<stem>.log` file matches are appended to
//! - [`LineSink`] - the [`MatchSink`](lg_traits::MatchSink) that writes each
//!   match to the console and, when configured, to the target file

mod sink;
mod target;

pub use sink::LineSink;
pub use target::OutputTarget;
