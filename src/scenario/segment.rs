// src/scenario/segment.rs

use crate::types::{ActorId, ActorState, Environment};
use serde::{Deserialize, Serialize};

/// One simulation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Seconds; strictly increasing across a segment but not necessarily unit-step
    pub time: f64,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub actors: Vec<ActorState>,
}

/// An ordered run of ticks classified as one unit, around a primary actor.
///
/// Ordering and identity invariants are checked when an
/// [`EvaluationContext`](super::EvaluationContext) is built, not here, so a
/// segment can be deserialized and filtered before it is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Provenance label (log file, scenario run, ...)
    #[serde(default)]
    pub source: String,
    pub primary: ActorId,
    pub ticks: Vec<Tick>,
}

impl Segment {
    pub fn new(source: impl Into<String>, primary: ActorId, ticks: Vec<Tick>) -> Self {
        Self {
            source: source.into(),
            primary,
            ticks,
        }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn duration(&self) -> f64 {
        match (self.ticks.first(), self.ticks.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }
}
