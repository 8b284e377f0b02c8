// src/pipeline/batch.rs
//
// N segments × M projections, spread over the rayon pool. Each worker
// builds its own EvaluationContext; projections are shared read-only.
// An empty segment aborts the batch. Other malformed segments (unordered
// times, duplicate actor) are reported with their error and skipped;
// classification anomalies are recorded and the batch continues.

use super::metrics::BatchMetrics;
use super::report::{BatchReport, CoverageReport, ProjectionResult, SegmentReport};
use crate::error::SegmentError;
use crate::projection::{Outcome, Projection};
use crate::scenario::{EvaluationContext, Segment};
use crate::types::SegmentConfig;
use rayon::prelude::*;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Segments with fewer ticks are discarded before evaluation
    pub min_ticks: usize,
    /// Report in input order; otherwise in completion order
    pub deterministic: bool,
    pub max_missing_listed: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            min_ticks: 0,
            deterministic: true,
            max_missing_listed: 100,
        }
    }
}

impl From<&SegmentConfig> for BatchOptions {
    fn from(config: &SegmentConfig) -> Self {
        Self {
            min_ticks: config.min_ticks,
            deterministic: config.deterministic_order,
            ..Self::default()
        }
    }
}

pub struct BatchRunner {
    projections: Vec<Projection>,
    options: BatchOptions,
    metrics: BatchMetrics,
}

impl BatchRunner {
    pub fn new(projections: Vec<Projection>, options: BatchOptions) -> Self {
        Self {
            projections,
            options,
            metrics: BatchMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &BatchMetrics {
        &self.metrics
    }

    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    pub fn run(&self, segments: &[Segment]) -> Result<BatchReport, SegmentError> {
        self.metrics
            .add(&self.metrics.segments_seen, segments.len() as u64);

        let kept: Vec<&Segment> = segments
            .iter()
            .filter(|segment| {
                let keep = segment.len() >= self.options.min_ticks;
                if !keep {
                    debug!(
                        "Skipping '{}': {} tick(s) < {}",
                        segment.source,
                        segment.len(),
                        self.options.min_ticks
                    );
                    self.metrics.inc(&self.metrics.segments_filtered);
                }
                keep
            })
            .collect();

        info!(
            "Evaluating {} segment(s) against {} projection(s) ({} order)",
            kept.len(),
            self.projections.len(),
            if self.options.deterministic { "input" } else { "completion" }
        );

        let reports = if self.options.deterministic {
            kept.par_iter()
                .map(|segment| self.evaluate_or_reject(segment))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            let sink = Mutex::new(Vec::with_capacity(kept.len()));
            kept.par_iter().try_for_each(|segment| {
                let report = self.evaluate_or_reject(segment)?;
                sink.lock().unwrap_or_else(PoisonError::into_inner).push(report);
                Ok::<(), SegmentError>(())
            })?;
            sink.into_inner().unwrap_or_else(PoisonError::into_inner)
        };

        let coverage = self
            .projections
            .iter()
            .map(|p| CoverageReport::compute(p, &reports, self.options.max_missing_listed))
            .collect();

        Ok(BatchReport {
            segments: reports,
            coverage,
            metrics: self.metrics.summary(),
        })
    }

    /// Like `evaluate`, but a segment that cannot be evaluated becomes a
    /// report carrying the error. Only an empty segment is fatal.
    fn evaluate_or_reject(&self, segment: &Segment) -> Result<SegmentReport, SegmentError> {
        match self.evaluate(segment) {
            Err(err @ SegmentError::Empty { .. }) => Err(err),
            Err(err) => {
                warn!("⚠️  Rejecting '{}': {}", segment.source, err);
                self.metrics.inc(&self.metrics.segments_rejected);
                Ok(SegmentReport {
                    source: segment.source.clone(),
                    primary: segment.primary,
                    ticks: segment.len(),
                    results: Vec::new(),
                    error: Some(err.to_string()),
                })
            }
            ok => ok,
        }
    }

    /// Every projection against one segment.
    pub fn evaluate(&self, segment: &Segment) -> Result<SegmentReport, SegmentError> {
        let started = Instant::now();
        let ctx = EvaluationContext::new(segment)?;

        let results = self
            .projections
            .iter()
            .map(|projection| {
                let classification = projection.classify(&ctx);
                self.record(&classification.outcome, classification.monitor_failures());
                ProjectionResult {
                    projection: projection.name().to_string(),
                    classification,
                }
            })
            .collect();

        self.metrics.inc(&self.metrics.segments_evaluated);
        self.metrics.add(
            &self.metrics.evaluation_time_us,
            started.elapsed().as_micros() as u64,
        );

        Ok(SegmentReport {
            source: segment.source.clone(),
            primary: segment.primary,
            ticks: segment.len(),
            results,
            error: None,
        })
    }

    fn record(&self, outcome: &Outcome, monitor_failures: usize) {
        let m = &self.metrics;
        m.inc(&m.classifications);
        match outcome {
            Outcome::Matched { .. } => m.inc(&m.matched),
            Outcome::Unmatched { .. } => m.inc(&m.unmatched),
            Outcome::Anomalous { .. } => m.inc(&m.anomalous),
        }
        m.add(&m.monitor_failures, monitor_failures as u64);
    }
}
