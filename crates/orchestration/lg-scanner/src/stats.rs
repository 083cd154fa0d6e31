//! Statistics for scan runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every scan unit of a run.
///
/// Updated with relaxed atomics from concurrently running units; read once
/// through [`ScanStats::snapshot`] when the run ends.
#[derive(Debug)]
pub struct ScanStats {
    started_at: DateTime<Utc>,
    objects_listed: AtomicU64,
    objects_scanned: AtomicU64,
    bytes_fetched: AtomicU64,
    bytes_decoded: AtomicU64,
    lines_scanned: AtomicU64,
    lines_matched: AtomicU64,
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            objects_listed: AtomicU64::new(0),
            objects_scanned: AtomicU64::new(0),
            bytes_fetched: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            lines_scanned: AtomicU64::new(0),
            lines_matched: AtomicU64::new(0),
        }
    }

    /// Record the number of keys the listing returned.
    pub fn record_listed(&self, count: u64) {
        self.objects_listed.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a fully scanned object.
    pub fn record_object(&self, bytes_fetched: u64, bytes_decoded: u64, lines: u64, matches: u64) {
        self.objects_scanned.fetch_add(1, Ordering::Relaxed);
        self.bytes_fetched.fetch_add(bytes_fetched, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(bytes_decoded, Ordering::Relaxed);
        self.lines_scanned.fetch_add(lines, Ordering::Relaxed);
        self.lines_matched.fetch_add(matches, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            completed_at: None,
            objects_listed: self.objects_listed.load(Ordering::Relaxed),
            objects_scanned: self.objects_scanned.load(Ordering::Relaxed),
            bytes_fetched: self.bytes_fetched.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            lines_matched: self.lines_matched.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ScanStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run completed (set by the scanner on success)
    pub completed_at: Option<DateTime<Utc>>,

    /// Keys returned by the listing
    pub objects_listed: u64,

    /// Objects fetched, decoded and scanned to the end
    pub objects_scanned: u64,

    /// Compressed bytes downloaded
    pub bytes_fetched: u64,

    /// Decompressed bytes scanned
    pub bytes_decoded: u64,

    /// Lines tested against the matcher
    pub lines_scanned: u64,

    /// Lines that matched and were emitted
    pub lines_matched: u64,
}

impl StatsSnapshot {
    /// Mark the snapshot as completed now.
    pub fn complete(mut self) -> Self {
        self.completed_at = Some(Utc::now());
        self
    }

    /// Total duration of the run.
    pub fn duration(&self) -> Option<Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }

    /// Objects scanned per second, if the run took measurable time.
    pub fn objects_per_second(&self) -> Option<f64> {
        let secs = self.duration()?.num_milliseconds() as f64 / 1000.0;
        if secs > 0.0 {
            Some(self.objects_scanned as f64 / secs)
        } else {
            None
        }
    }
}
