// src/pipeline/report.rs
//
// Per-segment results and per-projection coverage. Coverage compares the
// instances observed across the batch with the instances the projection's
// tree can produce at all.

use super::metrics::MetricsSummary;
use crate::projection::{Classification, Instance, Outcome, Projection};
use crate::types::ActorId;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionResult {
    pub projection: String,
    #[serde(flatten)]
    pub classification: Classification,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentReport {
    pub source: String,
    pub primary: ActorId,
    pub ticks: usize,
    pub results: Vec<ProjectionResult>,
    /// Set when the segment was rejected; `results` is then empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SegmentReport {
    pub fn result_for(&self, projection: &str) -> Option<&ProjectionResult> {
        self.results.iter().find(|r| r.projection == projection)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub projection: String,
    pub possible: usize,
    pub observed: usize,
    pub coverage: f64,
    pub matched: usize,
    pub unmatched: usize,
    pub anomalous: usize,
    pub monitor_failures: usize,
    pub missing_total: usize,
    /// First missing instances in sorted order
    pub missing: Vec<String>,
}

impl CoverageReport {
    pub fn compute(projection: &Projection, segments: &[SegmentReport], max_listed: usize) -> Self {
        let possible = projection.possible_instances();
        let mut observed: BTreeSet<&Instance> = BTreeSet::new();
        let (mut matched, mut unmatched, mut anomalous, mut monitor_failures) = (0, 0, 0, 0);

        for result in segments.iter().filter_map(|s| s.result_for(projection.name())) {
            match &result.classification.outcome {
                Outcome::Matched { instance } => {
                    matched += 1;
                    if possible.contains(instance) {
                        observed.insert(instance);
                    }
                }
                Outcome::Unmatched { .. } => unmatched += 1,
                Outcome::Anomalous { .. } => anomalous += 1,
            }
            monitor_failures += result.classification.monitor_failures();
        }

        let missing: Vec<&Instance> = possible.iter().filter(|i| !observed.contains(i)).collect();
        let coverage = if possible.is_empty() {
            0.0
        } else {
            observed.len() as f64 / possible.len() as f64
        };

        Self {
            projection: projection.name().to_string(),
            possible: possible.len(),
            observed: observed.len(),
            coverage,
            matched,
            unmatched,
            anomalous,
            monitor_failures,
            missing_total: missing.len(),
            missing: missing.iter().take(max_listed).map(|i| i.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub segments: Vec<SegmentReport>,
    pub coverage: Vec<CoverageReport>,
    pub metrics: MetricsSummary,
}

impl BatchReport {
    pub fn log_summary(&self) {
        info!("\n========================================");
        info!("📊 Batch summary");
        info!("  Segments evaluated: {}", self.metrics.segments_evaluated);
        info!("  Segments filtered: {}", self.metrics.segments_filtered);
        info!("  Segments rejected: {}", self.metrics.segments_rejected);
        info!("  Throughput: {:.1} segments/s", self.metrics.segments_per_sec);
        for c in &self.coverage {
            info!(
                "  {:<14} coverage {:>5.1}% ({}/{}), ✅ {} matched, ❌ {} unmatched, ⚠️  {} anomalous",
                c.projection,
                c.coverage * 100.0,
                c.observed,
                c.possible,
                c.matched,
                c.unmatched,
                c.anomalous
            );
            if c.monitor_failures > 0 {
                warn!("  🔎 {}: {} monitor failure(s)", c.projection, c.monitor_failures);
            }
        }
        info!("========================================\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{Catalogue, Node};
    use crate::projection::{Anomaly, MonitorFinding};
    use crate::temporal::UnaryPredicate;

    fn projection() -> Projection {
        Catalogue::new(
            Node::all("root").child(
                Node::exclusive("w")
                    .tag_recursive("p")
                    .child(Node::leaf("a", UnaryPredicate::always()))
                    .child(Node::leaf("b", UnaryPredicate::always()))
                    .child(Node::leaf("c", UnaryPredicate::always())),
            ),
        )
        .unwrap()
        .prune_for("p")
        .unwrap()
    }

    fn report(outcome: Outcome, findings: Vec<MonitorFinding>) -> SegmentReport {
        SegmentReport {
            source: "s".into(),
            primary: 1,
            ticks: 10,
            results: vec![ProjectionResult {
                projection: "p".into(),
                classification: Classification { outcome, findings },
            }],
            error: None,
        }
    }

    fn matched(paths: &[&str]) -> Outcome {
        Outcome::Matched {
            instance: Instance::new(paths.iter().copied()),
        }
    }

    #[test]
    fn test_coverage_counts_distinct_instances() {
        let segments = vec![
            report(matched(&["w", "w/a"]), vec![]),
            report(
                matched(&["w", "w/a"]),
                vec![MonitorFinding {
                    leaf: "w/a".into(),
                    monitor: "m".into(),
                    passed: false,
                }],
            ),
            report(
                Outcome::Anomalous {
                    anomalies: vec![Anomaly {
                        path: "w".into(),
                        rule: "exclusive",
                        satisfied: vec![],
                    }],
                },
                vec![],
            ),
        ];

        let coverage = CoverageReport::compute(&projection(), &segments, 1);
        assert_eq!(coverage.possible, 3);
        assert_eq!(coverage.observed, 1);
        assert!((coverage.coverage - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!((coverage.matched, coverage.anomalous), (2, 1));
        assert_eq!(coverage.monitor_failures, 1);
        assert_eq!(coverage.missing_total, 2);
        assert_eq!(coverage.missing, vec!["{w, w/b}"]);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(report(matched(&["w", "w/c"]), vec![])).unwrap();
        let result = &json["results"][0];
        assert_eq!(result["projection"], "p");
        assert_eq!(result["outcome"]["status"], "matched");
        assert_eq!(result["outcome"]["instance"][1], "w/c");
    }
}
