// src/projection/classify.rs
//
// Top-down classification of one segment against one pruned tree.
//
// At every reached group, each child's condition is evaluated on its own
// (no short-circuit between siblings), then the count is checked against
// the group's rule:
//   all        unmet children → Unmatched (no instance fits the segment)
//   others     rule violated  → an anomaly for that group
// Evaluation continues into every satisfied child either way, so one pass
// reports every violation. Anomalies take precedence over Unmatched.
//
// Monitors run only for a Matched outcome, on the leaves of the instance.

use super::instance::Instance;
use crate::catalogue::{child_path, GroupRule, Node};
use crate::scenario::EvaluationContext;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    /// Path of the offending group (the root's name for the root)
    pub path: String,
    pub rule: &'static str,
    /// Names of the children whose condition held
    pub satisfied: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Matched { instance: Instance },
    Unmatched { path: String, failed: Vec<String> },
    Anomalous { anomalies: Vec<Anomaly> },
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched { .. } => "matched",
            Self::Unmatched { .. } => "unmatched",
            Self::Anomalous { .. } => "anomalous",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorFinding {
    pub leaf: String,
    pub monitor: String,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub outcome: Outcome,
    pub findings: Vec<MonitorFinding>,
}

impl Classification {
    pub fn instance(&self) -> Option<&Instance> {
        match &self.outcome {
            Outcome::Matched { instance } => Some(instance),
            _ => None,
        }
    }

    /// The satisfied instances: the matched one, or none.
    pub fn satisfied_instances(&self) -> BTreeSet<Instance> {
        self.instance().cloned().into_iter().collect()
    }

    pub fn is_matched(&self) -> bool {
        self.instance().is_some()
    }

    pub fn monitor_failures(&self) -> usize {
        self.findings.iter().filter(|f| !f.passed).count()
    }
}

struct Walk<'a, 'c, 's> {
    ctx: &'c EvaluationContext<'s>,
    instance: Instance,
    leaves: Vec<(String, &'a Node)>,
    anomalies: Vec<Anomaly>,
    unmet: Option<(String, Vec<String>)>,
}

impl<'a> Walk<'a, '_, '_> {
    fn visit(&mut self, node: &'a Node, path: &str) {
        let Some(rule) = node.rule() else {
            self.leaves.push((path.to_string(), node));
            return;
        };
        let label = if path.is_empty() { node.name() } else { path };

        let (satisfied, failed): (Vec<&'a Node>, Vec<&'a Node>) = node
            .children()
            .iter()
            .partition(|child| child.condition_holds(self.ctx));

        if !rule.admits(satisfied.len(), node.children().len()) {
            if rule == GroupRule::All {
                if self.unmet.is_none() {
                    self.unmet = Some((label.to_string(), names(&failed)));
                }
            } else {
                self.anomalies.push(Anomaly {
                    path: label.to_string(),
                    rule: rule.as_str(),
                    satisfied: names(&satisfied),
                });
            }
        }

        for child in satisfied {
            let child_path = child_path(path, child.name());
            self.instance.insert(child_path.clone());
            self.visit(child, &child_path);
        }
    }
}

fn names(nodes: &[&Node]) -> Vec<String> {
    nodes.iter().map(|n| n.name().to_string()).collect()
}

pub fn classify(root: &Node, ctx: &EvaluationContext<'_>) -> Classification {
    let mut walk = Walk {
        ctx,
        instance: Instance::default(),
        leaves: Vec::new(),
        anomalies: Vec::new(),
        unmet: None,
    };
    walk.visit(root, "");

    let source = &ctx.segment().source;
    if !walk.anomalies.is_empty() {
        for anomaly in &walk.anomalies {
            warn!(
                "⚠️  {}: {} group '{}' has {} satisfied child(ren): [{}]",
                source,
                anomaly.rule,
                anomaly.path,
                anomaly.satisfied.len(),
                anomaly.satisfied.join(", ")
            );
        }
        return Classification {
            outcome: Outcome::Anomalous {
                anomalies: walk.anomalies,
            },
            findings: Vec::new(),
        };
    }

    if let Some((path, failed)) = walk.unmet {
        debug!("{}: '{}' unmet, failed: [{}]", source, path, failed.join(", "));
        return Classification {
            outcome: Outcome::Unmatched { path, failed },
            findings: Vec::new(),
        };
    }

    let primary = ctx.primary();
    let mut findings = Vec::new();
    for (path, leaf) in &walk.leaves {
        for monitor in leaf.monitors() {
            let passed = monitor.check.holds(ctx, primary);
            if !passed {
                warn!("🔎 {}: monitor '{}' failed on '{}'", source, monitor.name, path);
            }
            findings.push(MonitorFinding {
                leaf: path.clone(),
                monitor: monitor.name.clone(),
                passed,
            });
        }
    }

    debug!("{}: matched {}", source, walk.instance);
    Classification {
        outcome: Outcome::Matched {
            instance: walk.instance,
        },
        findings,
    }
}
