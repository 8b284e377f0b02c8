// src/error.rs
//
// Structural catalogue errors and empty/malformed segments abort a run.
// Lookup misses are recovered by the predicates that hit them.
// Classification anomalies are not errors at all; see projection::classify.

use crate::types::ActorId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentError {
    #[error("segment '{segment}' has no ticks")]
    Empty { segment: String },

    #[error("segment '{segment}': tick {index} has a non-finite time")]
    NonFiniteTime { segment: String, index: usize },

    #[error("segment '{segment}': tick {index} at t={time} does not follow t={previous}")]
    NonMonotonicTime {
        segment: String,
        index: usize,
        previous: f64,
        time: f64,
    },

    #[error("segment '{segment}': actor {actor} appears twice at t={time}")]
    DuplicateActor {
        segment: String,
        time: f64,
        actor: ActorId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LookupMiss {
    #[error("no tick at t={time}")]
    Time { time: f64 },

    #[error("actor {actor} is not present at t={time}")]
    Actor { time: f64, actor: ActorId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    #[error("catalogue root '{0}' must be a group node")]
    RootIsLeaf(String),

    #[error("catalogue root '{0}' must not carry a condition")]
    RootCondition(String),

    #[error("node name '{0}' is empty or contains '/'")]
    InvalidName(String),

    #[error("'{path}' declares child '{child}' more than once")]
    DuplicateChild { path: String, child: String },

    #[error("leaf '{0}' declares children")]
    LeafWithChildren(String),

    #[error("group '{0}' carries monitors; monitors attach to leaves only")]
    MonitorOnGroup(String),

    #[error("bounded group '{path}' has min {min} above max {max}")]
    InvertedBounds { path: String, min: usize, max: usize },

    #[error("{rule} group '{path}' cannot be satisfied by its {available} children")]
    Unsatisfiable {
        path: String,
        rule: &'static str,
        available: usize,
    },

    #[error("unknown projection '{0}'")]
    UnknownProjection(String),
}
