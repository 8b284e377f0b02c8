// src/lib.rs
//
// Temporal predicate evaluation and projection-based classification of
// recorded multi-actor traffic scenarios.
//
//   scenario    segments, evaluation context, JSON loading
//   temporal    quantifiers, relations, named predicates, behaviours
//   catalogue   classification tree and the builtin scenario catalogue
//   projection  pruning, possible instances, classification
//   pipeline    parallel batch runner, coverage report, metrics

pub mod catalogue;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod projection;
pub mod scenario;
pub mod temporal;
pub mod types;

#[cfg(test)]
mod test_support;

pub use catalogue::{scenario_catalogue, Catalogue, Node};
pub use error::{CatalogueError, LookupMiss, SegmentError};
pub use projection::{Classification, Instance, Outcome, Projection};
pub use scenario::{EvaluationContext, Segment, Tick};
pub use types::Config;
