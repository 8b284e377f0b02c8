// src/pipeline/metrics.rs
//
// Run counters shared by the batch workers. Cheap to clone; every clone
// updates the same counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct BatchMetrics {
    pub segments_seen: Arc<AtomicU64>,
    pub segments_filtered: Arc<AtomicU64>,
    pub segments_evaluated: Arc<AtomicU64>,
    pub segments_rejected: Arc<AtomicU64>,
    pub classifications: Arc<AtomicU64>,
    pub matched: Arc<AtomicU64>,
    pub unmatched: Arc<AtomicU64>,
    pub anomalous: Arc<AtomicU64>,
    pub monitor_failures: Arc<AtomicU64>,
    pub evaluation_time_us: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl Default for BatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchMetrics {
    pub fn new() -> Self {
        Self {
            segments_seen: Arc::new(AtomicU64::new(0)),
            segments_filtered: Arc::new(AtomicU64::new(0)),
            segments_evaluated: Arc::new(AtomicU64::new(0)),
            segments_rejected: Arc::new(AtomicU64::new(0)),
            classifications: Arc::new(AtomicU64::new(0)),
            matched: Arc::new(AtomicU64::new(0)),
            unmatched: Arc::new(AtomicU64::new(0)),
            anomalous: Arc::new(AtomicU64::new(0)),
            monitor_failures: Arc::new(AtomicU64::new(0)),
            evaluation_time_us: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, counter: &AtomicU64, amount: u64) {
        counter.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn segments_per_sec(&self) -> f64 {
        let evaluated = self.segments_evaluated.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            evaluated as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        let evaluated = self.segments_evaluated.load(Ordering::Relaxed);
        let total_us = self.evaluation_time_us.load(Ordering::Relaxed);
        MetricsSummary {
            segments_seen: self.segments_seen.load(Ordering::Relaxed),
            segments_filtered: self.segments_filtered.load(Ordering::Relaxed),
            segments_evaluated: evaluated,
            segments_rejected: self.segments_rejected.load(Ordering::Relaxed),
            classifications: self.classifications.load(Ordering::Relaxed),
            matched: self.matched.load(Ordering::Relaxed),
            unmatched: self.unmatched.load(Ordering::Relaxed),
            anomalous: self.anomalous.load(Ordering::Relaxed),
            monitor_failures: self.monitor_failures.load(Ordering::Relaxed),
            avg_segment_us: if evaluated > 0 { total_us / evaluated } else { 0 },
            segments_per_sec: self.segments_per_sec(),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub segments_seen: u64,
    pub segments_filtered: u64,
    pub segments_evaluated: u64,
    pub segments_rejected: u64,
    pub classifications: u64,
    pub matched: u64,
    pub unmatched: u64,
    pub anomalous: u64,
    pub monitor_failures: u64,
    pub avg_segment_us: u64,
    pub segments_per_sec: f64,
    pub elapsed_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = BatchMetrics::new();
        let worker = metrics.clone();
        worker.inc(&worker.matched);
        worker.add(&worker.segments_seen, 3);
        metrics.inc(&metrics.matched);

        let summary = metrics.summary();
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.segments_seen, 3);
        assert_eq!(summary.avg_segment_us, 0);
    }
}
