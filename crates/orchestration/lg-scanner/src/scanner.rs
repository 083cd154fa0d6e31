//! Scan orchestration: list once, then fetch → decode → match → emit per object.

use lg_error::{LgError, Result};
use lg_traits::{MatchSink, ObjectFetcher, ObjectLister};
use lg_types::ObjectKey;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::ScanConfig;
use crate::decode::Decoder;
use crate::matcher::LineMatcher;
use crate::stats::{ScanStats, StatsSnapshot};

/// Coordinates a scan run.
///
/// The lister is called exactly once. Every returned key then gets its own
/// task; by default all tasks are in flight at once, or at most
/// `max_concurrency` when configured. The first failing task fails the run.
/// Tasks still in flight at that point are detached and left to finish on
/// their own: nothing signals them to stop.
pub struct Scanner {
    config: ScanConfig,
    lister: Arc<dyn ObjectLister>,
    fetcher: Arc<dyn ObjectFetcher>,
    sink: Arc<dyn MatchSink>,
    matcher: Arc<LineMatcher>,
    decoder: Decoder,
    stats: Arc<ScanStats>,
}

impl Scanner {
    /// Create a new scanner.
    pub fn new(
        config: ScanConfig,
        lister: Arc<dyn ObjectLister>,
        fetcher: Arc<dyn ObjectFetcher>,
        sink: Arc<dyn MatchSink>,
    ) -> Self {
        let matcher = Arc::new(LineMatcher::new(&config.token));
        let decoder = Decoder::new(config.compression);
        Self {
            config,
            lister,
            fetcher,
            sink,
            matcher,
            decoder,
            stats: Arc::new(ScanStats::new()),
        }
    }

    /// Run the scan to completion or first failure.
    pub async fn run(&self) -> Result<StatsSnapshot> {
        self.config.validate()?;

        let target = &self.config.target;
        info!(
            bucket = %target.bucket,
            prefix = ?target.prefix,
            needle = ?self.matcher.needle(),
            compression = ?self.config.compression,
            max_concurrency = ?self.config.max_concurrency,
            "Starting scan"
        );

        let keys = self
            .lister
            .list(&target.bucket, target.prefix.as_deref())
            .await
            .inspect_err(|e| error!(bucket = %target.bucket, error = %e, "Listing failed"))?;

        self.stats.record_listed(keys.len() as u64);
        info!(objects = keys.len(), "Scanning objects");

        let limiter = self
            .config
            .max_concurrency
            .map(|permits| Arc::new(Semaphore::new(permits)));

        let mut units = JoinSet::new();
        for key in keys {
            let unit = self.unit();
            let limiter = limiter.clone();

            units.spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => Some(limiter.acquire_owned().await.map_err(|e| {
                        LgError::Task(format!("concurrency limiter closed: {e}"))
                    })?),
                    None => None,
                };
                unit.scan(key).await
            });
        }

        while let Some(joined) = units.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => Err(LgError::Task(e.to_string())),
            };

            if let Err(e) = outcome {
                let in_flight = units.len();
                units.detach_all();
                error!(in_flight, error = %e, "Scan failed");
                return Err(e);
            }
        }

        self.sink.flush().await?;

        let snapshot = self.stats.snapshot().complete();
        info!(
            objects = snapshot.objects_scanned,
            lines = snapshot.lines_scanned,
            matches = snapshot.lines_matched,
            bytes = snapshot.bytes_fetched,
            "Scan completed"
        );

        Ok(snapshot)
    }

    fn unit(&self) -> ScanUnit {
        ScanUnit {
            bucket: self.config.target.bucket.clone(),
            fetcher: self.fetcher.clone(),
            sink: self.sink.clone(),
            matcher: self.matcher.clone(),
            decoder: self.decoder,
            stats: self.stats.clone(),
        }
    }
}

/// The per-object work: fetch, decode, scan, emit, strictly in that order.
struct ScanUnit {
    bucket: String,
    fetcher: Arc<dyn ObjectFetcher>,
    sink: Arc<dyn MatchSink>,
    matcher: Arc<LineMatcher>,
    decoder: Decoder,
    stats: Arc<ScanStats>,
}

impl ScanUnit {
    async fn scan(self, key: ObjectKey) -> Result<()> {
        let result = self.scan_object(&key).await;

        if let Err(e) = &result {
            error!(
                bucket = %self.bucket,
                key = %key,
                stage = %stage_label(e),
                error = %e,
                "Object scan failed"
            );
        }

        result
    }

    async fn scan_object(&self, key: &ObjectKey) -> Result<()> {
        debug!(bucket = %self.bucket, key = %key, "Fetching object");

        let payload = self.fetcher.fetch(&self.bucket, key).await?;
        let bytes_fetched = payload.len() as u64;

        let text = self.decoder.decode(key, &payload).await?;
        drop(payload);

        let mut lines = 0u64;
        let mut matches = 0u64;
        for line in text.split_terminator('\n') {
            lines += 1;
            if self.matcher.matches(line) {
                self.sink.emit(line).await?;
                matches += 1;
            }
        }

        self.stats
            .record_object(bytes_fetched, text.len() as u64, lines, matches);

        debug!(
            key = %key,
            bytes = bytes_fetched,
            lines,
            matches,
            "Object scanned"
        );

        Ok(())
    }
}

/// Stage name for log fields; `none` for errors outside the pipeline stages.
fn stage_label(error: &LgError) -> String {
    error
        .stage()
        .map_or_else(|| "none".to_string(), |stage| stage.to_string())
}
