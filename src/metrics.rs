//! Fetcher performance counters.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use crate::types::Summary;

/// Counters shared by every request a fetcher issues
#[derive(Debug, Default)]
pub struct PerformanceMetrics {
    domains_checked: AtomicU64,
    errors_encountered: AtomicU64,
    total_check_time_ms: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    last_batch: Mutex<Option<BatchReport>>,
}

/// Totals of the most recently finished batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchReport {
    pub summary: Summary,
    pub duration: Duration,
}

/// Decrements the in-flight gauge when dropped
#[must_use = "the request stops counting as in flight when the guard drops"]
pub struct InFlightGuard<'a> {
    metrics: &'a PerformanceMetrics,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a request as in flight until the returned guard is dropped
    pub fn request_started(&self) -> InFlightGuard<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::AcqRel);
        InFlightGuard { metrics: self }
    }

    pub fn increment_domains_checked(&self) {
        self.domains_checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.errors_encountered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_check_time(&self, duration: Duration) {
        self.total_check_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_batch(&self, summary: Summary, duration: Duration) {
        *self.last_batch.lock() = Some(BatchReport { summary, duration });
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn get_stats(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            domains_checked: self.domains_checked.load(Ordering::Relaxed),
            errors_encountered: self.errors_encountered.load(Ordering::Relaxed),
            total_check_time_ms: self.total_check_time_ms.load(Ordering::Relaxed),
            peak_in_flight: self.peak_in_flight.load(Ordering::Acquire),
            last_batch: *self.last_batch.lock(),
        }
    }
}

/// Point-in-time copy of [`PerformanceMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Lookups that got an answer from the registry
    pub domains_checked: u64,
    /// Lookups that degraded to `Unknown`
    pub errors_encountered: u64,
    pub total_check_time_ms: u64,
    /// Highest number of simultaneous requests observed
    pub peak_in_flight: usize,
    pub last_batch: Option<BatchReport>,
}

impl MetricsSnapshot {
    pub fn avg_check_time_ms(&self) -> f64 {
        let attempts = self.domains_checked + self.errors_encountered;
        if attempts == 0 {
            0.0
        } else {
            self.total_check_time_ms as f64 / attempts as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_snapshot_is_zero() {
        let metrics = PerformanceMetrics::new();
        let stats = metrics.get_stats();
        assert_eq!(stats.domains_checked, 0);
        assert_eq!(stats.errors_encountered, 0);
        assert_eq!(stats.peak_in_flight, 0);
        assert_eq!(stats.avg_check_time_ms(), 0.0);
        assert!(stats.last_batch.is_none());
    }

    #[test]
    fn test_in_flight_gauge_tracks_peak() {
        let metrics = PerformanceMetrics::new();
        {
            let _a = metrics.request_started();
            let _b = metrics.request_started();
            assert_eq!(metrics.in_flight(), 2);
        }
        let _c = metrics.request_started();
        assert_eq!(metrics.in_flight(), 1);
        assert_eq!(metrics.get_stats().peak_in_flight, 2);
    }

    #[test]
    fn test_average_check_time() {
        let metrics = PerformanceMetrics::new();
        metrics.increment_domains_checked();
        metrics.increment_errors();
        metrics.add_check_time(Duration::from_millis(30));
        metrics.add_check_time(Duration::from_millis(10));
        assert_eq!(metrics.get_stats().avg_check_time_ms(), 20.0);
    }
}
