//! Bounded batch fetcher

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{FuturesUnordered, Stream, StreamExt};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use super::gate::AdmissionGate;
use super::transport::{HttpTransport, Transport};
use crate::config::FetchConfig;
use crate::domain::prepare_keys;
use crate::error::{Result, ScoutError};
use crate::metrics::{MetricsSnapshot, PerformanceMetrics};
use crate::rdap::{classify_body, domain_url};
use crate::types::{CheckRecord, ResultSet};

/// Checks a batch of query keys with at most `concurrency` requests in flight.
///
/// Every key gets exactly one [`CheckRecord`]. Per-key failures (transport
/// errors, timeouts, unparseable bodies) become `Outcome::Unknown` and never
/// abort the batch. The fetcher can be reused: slots are returned to the
/// gate as each key finishes.
///
/// # Example
///
/// ```rust,no_run
/// use domain_scout::{BoundedBatchFetcher, FetchConfig};
///
/// # async fn run() -> domain_scout::Result<()> {
/// let fetcher = BoundedBatchFetcher::new(FetchConfig::default().with_concurrency(5))?;
/// let results = fetcher.fetch_all(["jax.ai", "lab.ai"]).await?;
/// for domain in results.available() {
///     println!("{domain} is available");
/// }
/// # Ok(())
/// # }
/// ```
pub struct BoundedBatchFetcher<T = HttpTransport> {
    config: FetchConfig,
    transport: T,
    gate: AdmissionGate,
    metrics: Arc<PerformanceMetrics>,
    cancel: Option<CancellationToken>,
}

impl BoundedBatchFetcher<HttpTransport> {
    /// Create a fetcher talking to the configured RDAP endpoint over HTTP
    pub fn new(config: FetchConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> BoundedBatchFetcher<T> {
    /// Create a fetcher over any transport.
    ///
    /// Fails fast on invalid configuration (e.g. zero concurrency) before
    /// anything is sent.
    pub fn with_transport(config: FetchConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let gate = AdmissionGate::new(config.concurrency)?;

        Ok(Self {
            config,
            transport,
            gate,
            metrics: Arc::new(PerformanceMetrics::new()),
            cancel: None,
        })
    }

    /// Stop issuing new requests once `token` is cancelled.
    ///
    /// Keys still waiting for a slot are reported as `NotAttempted`; requests
    /// already in flight keep their real outcome.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    pub fn get_metrics(&self) -> Arc<PerformanceMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn get_metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.get_stats()
    }

    /// Check every key and return the finished result set
    pub async fn fetch_all<I, S>(&self, keys: I) -> Result<ResultSet>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let batch_start = Instant::now();
        let records: Vec<CheckRecord> = self.fetch_stream(keys)?.collect().await;
        let expected = records.len();
        let results: ResultSet = records.into_iter().collect();
        debug_assert_eq!(results.len(), expected, "one record per unique key");

        let summary = results.summary();
        let batch_duration = batch_start.elapsed();
        self.metrics.record_batch(summary, batch_duration);

        tracing::info!(
            domains_requested = %summary.total,
            available = %summary.available,
            taken = %summary.taken,
            unknown = %summary.unknown,
            not_attempted = %summary.not_attempted,
            batch_duration_ms = %batch_duration.as_millis(),
            "Batch domain check completed"
        );

        Ok(results)
    }

    /// Check every key, yielding records in completion order.
    ///
    /// Keys are validated and de-duplicated up front; an unsafe key fails the
    /// call before any request is issued. The stream ends after the last key
    /// has produced its record.
    pub fn fetch_stream<I, S>(
        &self,
        keys: I,
    ) -> Result<impl Stream<Item = CheckRecord> + Send + Unpin + '_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (keys, duplicates) = prepare_keys(keys)?;
        if duplicates > 0 {
            tracing::warn!(duplicates, "Collapsed duplicate query keys");
        }

        tracing::debug!(
            keys = keys.len(),
            concurrency = self.config.concurrency,
            timeout_ms = %self.config.timeout.as_millis(),
            "Starting batch"
        );

        Ok(keys
            .into_iter()
            .map(|key| self.check_key(key))
            .collect::<FuturesUnordered<_>>())
    }

    /// One key's admit-request-classify cycle. Never fails: every error is
    /// folded into the returned record.
    async fn check_key(&self, key: String) -> CheckRecord {
        let permit = match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => None,
                permit = self.gate.acquire() => Some(permit),
            },
            None => Some(self.gate.acquire().await),
        };

        let _permit = match permit {
            None => return CheckRecord::not_attempted(key),
            Some(Err(e)) => return CheckRecord::failed(key, &e, None),
            Some(Ok(permit)) => permit,
        };

        if !self.config.pacing.is_zero() {
            tokio::time::sleep(self.config.pacing).await;
        }
        if self.is_cancelled() {
            return CheckRecord::not_attempted(key);
        }

        let url = domain_url(&self.config.base_url, &key);
        let start_time = Instant::now();
        let result = {
            let _in_flight = self.metrics.request_started();
            match timeout(self.config.timeout, self.transport.get(&url)).await {
                Ok(Ok(body)) => classify_body(&body),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(ScoutError::timeout("RDAP request", Some(self.config.timeout))),
            }
        };
        let duration = start_time.elapsed();
        self.metrics.add_check_time(duration);

        match result {
            Ok(classification) => {
                self.metrics.increment_domains_checked();
                tracing::debug!(
                    domain = %key,
                    outcome = %classification.outcome,
                    duration_ms = %duration.as_millis(),
                    "Domain check completed"
                );
                CheckRecord::resolved(key, classification, duration)
            }
            Err(e) => {
                self.metrics.increment_errors();
                tracing::debug!(
                    domain = %key,
                    failure = %e.failure_kind(),
                    error = %e,
                    "RDAP check failed"
                );
                CheckRecord::failed(key, &e, Some(duration))
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }
}
