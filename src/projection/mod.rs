// src/projection/mod.rs
//
// Named views of the catalogue. Each projection owns its pruned tree and
// the set of instances that tree can structurally produce.

pub mod classify;
pub mod instance;
pub mod prune;

pub use classify::{classify, Anomaly, Classification, MonitorFinding, Outcome};
pub use instance::{enumerate_possible_instances, Instance};

use crate::catalogue::Node;
use crate::scenario::EvaluationContext;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct Projection {
    name: String,
    root: Node,
    possible: BTreeSet<Instance>,
}

impl Projection {
    pub fn new(name: impl Into<String>, root: Node) -> Self {
        let possible = enumerate_possible_instances(&root);
        Self {
            name: name.into(),
            root,
            possible,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn possible_instances(&self) -> &BTreeSet<Instance> {
        &self.possible
    }

    pub fn classify(&self, ctx: &EvaluationContext<'_>) -> Classification {
        classify(&self.root, ctx)
    }
}
