//! Output file handling.

use lg_error::{Result, SinkError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Extension appended to the caller-supplied stem.
const EXTENSION: &str = ".log";

/// The file matched lines are persisted to.
///
/// The file is append-only text, one matched line per record. It is shared
/// by every concurrently running scan unit; each append opens the file in
/// append mode and writes the whole record in one call, so records from
/// different units interleave only at line granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    path: PathBuf,
}

impl OutputTarget {
    /// Target `<stem>.log`.
    pub fn from_stem(stem: impl AsRef<Path>) -> Self {
        let mut path = OsString::from(stem.as_ref().as_os_str());
        path.push(EXTENSION);
        Self {
            path: PathBuf::from(path),
        }
    }

    /// Full path of the target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reset the target before a run.
    ///
    /// Any file left by a previous run is deleted. Deletion is best effort:
    /// a missing file or a failed unlink is logged and ignored. An empty
    /// file is then created so that a run with no matches still leaves the
    /// target in place; failing to create it is fatal.
    pub async fn prepare(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Removed previous output file"),
            Err(e) => debug!(
                path = %self.path.display(),
                error = %e,
                "Previous output file not removed"
            ),
        }

        fs::File::create(&self.path).await.map_err(|e| {
            SinkError::Create(format!("{}: {}", self.path.display(), e))
        })?;

        Ok(())
    }

    /// Append `line` followed by `\n`, creating the file if absent.
    pub async fn append_line(&self, line: &str) -> Result<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.append_error(e))?;

        file.write_all(record.as_bytes())
            .await
            .map_err(|e| self.append_error(e))?;
        file.flush().await.map_err(|e| self.append_error(e))?;

        Ok(())
    }

    fn append_error(&self, error: std::io::Error) -> SinkError {
        SinkError::Append(format!("{}: {}", self.path.display(), error))
    }
}
