// src/pipeline/mod.rs

pub mod batch;
pub mod metrics;
pub mod report;

pub use batch::{BatchOptions, BatchRunner};
pub use metrics::{BatchMetrics, MetricsSummary};
pub use report::{BatchReport, CoverageReport, ProjectionResult, SegmentReport};
