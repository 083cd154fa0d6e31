//! Console + file sink for matched lines.

use async_trait::async_trait;
use lg_error::{Result, SinkError};
use lg_traits::MatchSink;
use parking_lot::Mutex;
use std::io::{self, Write};

use super::OutputTarget;

/// Writes every matched line to the console and, if configured, appends it
/// to an [`OutputTarget`].
///
/// The console writer is held behind a lock for the duration of one line so
/// concurrent units never split each other's output.
pub struct LineSink {
    console: Mutex<Box<dyn Write + Send>>,
    target: Option<OutputTarget>,
}

impl LineSink {
    /// Sink writing to stdout.
    pub fn stdout(target: Option<OutputTarget>) -> Self {
        Self::with_console(Box::new(io::stdout()), target)
    }

    /// Sink writing to an arbitrary console writer.
    pub fn with_console(console: Box<dyn Write + Send>, target: Option<OutputTarget>) -> Self {
        Self {
            console: Mutex::new(console),
            target,
        }
    }

    fn write_console(&self, line: &str) -> Result<()> {
        let mut console = self.console.lock();
        writeln!(console, "{line}").map_err(|e| SinkError::Console(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Debug for LineSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSink")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MatchSink for LineSink {
    async fn emit(&self, line: &str) -> Result<()> {
        self.write_console(line)?;

        if let Some(target) = &self.target {
            target.append_line(line).await?;
        }

        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.console
            .lock()
            .flush()
            .map_err(|e| SinkError::Console(format!("Failed to flush console: {e}")))?;
        Ok(())
    }
}
