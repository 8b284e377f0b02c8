// src/scenario/mod.rs
//
// Recorded scenario segments and the indexed, read-only view that
// predicates evaluate against.
//
//   loader (JSON files) → Segment → EvaluationContext → temporal predicates

pub mod context;
pub mod loader;
pub mod segment;

pub use context::{ActorView, Anchor, EvaluationContext, Lookup};
pub use segment::{Segment, Tick};
