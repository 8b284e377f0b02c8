// src/catalogue/node.rs
//
// Closed node model of the classification tree. A node is either a group
// with an arity rule over its children or a leaf; both may carry a
// condition, projection tags and (leaves only) monitors.

use crate::scenario::EvaluationContext;
use crate::temporal::UnaryPredicate;

// ============================================================================
// GROUP RULES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRule {
    /// Every declared child holds
    All,
    /// Exactly one child holds
    Exclusive,
    /// At most one child holds; more than one is an anomaly
    Optional,
    /// The number of holding children lies in `[min, max]`
    Bounded { min: usize, max: usize },
}

impl GroupRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Exclusive => "exclusive",
            Self::Optional => "optional",
            Self::Bounded { .. } => "bounded",
        }
    }

    /// Whether `satisfied` true children out of `declared` fit the rule.
    pub fn admits(&self, satisfied: usize, declared: usize) -> bool {
        match *self {
            Self::All => satisfied == declared,
            Self::Exclusive => satisfied == 1,
            Self::Optional => satisfied <= 1,
            Self::Bounded { min, max } => (min..=max).contains(&satisfied),
        }
    }

    /// Whether some count in `0..=available` is admitted at all.
    pub fn satisfiable(&self, available: usize) -> bool {
        match *self {
            Self::All | Self::Optional => true,
            Self::Exclusive => available >= 1,
            Self::Bounded { min, max } => min <= max && min <= available,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group(GroupRule),
    Leaf,
}

// ============================================================================
// TAGS & MONITORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionTag {
    pub name: String,
    /// Propagate membership to every descendant
    pub recursive: bool,
}

/// Secondary check on a leaf, evaluated for the primary actor. Recorded as a
/// finding; never changes the classification.
#[derive(Debug, Clone)]
pub struct Monitor {
    pub name: String,
    pub check: UnaryPredicate,
}

// ============================================================================
// NODE
// ============================================================================

#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    condition: Option<UnaryPredicate>,
    tags: Vec<ProjectionTag>,
    monitors: Vec<Monitor>,
    kind: NodeKind,
    children: Vec<Node>,
}

impl Node {
    fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            condition: None,
            tags: Vec::new(),
            monitors: Vec::new(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn all(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group(GroupRule::All))
    }

    pub fn exclusive(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group(GroupRule::Exclusive))
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group(GroupRule::Optional))
    }

    pub fn bounded(name: impl Into<String>, min: usize, max: usize) -> Self {
        Self::new(name, NodeKind::Group(GroupRule::Bounded { min, max }))
    }

    pub fn leaf(name: impl Into<String>, condition: UnaryPredicate) -> Self {
        Self::new(name, NodeKind::Leaf).when(condition)
    }

    // ---- builder -----------------------------------------------------------

    pub fn when(mut self, condition: UnaryPredicate) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn tag(mut self, projection: impl Into<String>) -> Self {
        self.tags.push(ProjectionTag {
            name: projection.into(),
            recursive: false,
        });
        self
    }

    pub fn tag_recursive(mut self, projection: impl Into<String>) -> Self {
        self.tags.push(ProjectionTag {
            name: projection.into(),
            recursive: true,
        });
        self
    }

    pub fn monitor(mut self, name: impl Into<String>, check: UnaryPredicate) -> Self {
        self.monitors.push(Monitor {
            name: name.into(),
            check,
        });
        self
    }

    // ---- accessors ---------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn rule(&self) -> Option<GroupRule> {
        match self.kind {
            NodeKind::Group(rule) => Some(rule),
            NodeKind::Leaf => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    pub fn condition(&self) -> Option<&UnaryPredicate> {
        self.condition.as_ref()
    }

    pub fn tags(&self) -> &[ProjectionTag] {
        &self.tags
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// `Some(recursive)` if tagged with `projection`. A recursive tag wins
    /// over a plain one for the same name.
    pub fn tag_for(&self, projection: &str) -> Option<bool> {
        self.tags
            .iter()
            .filter(|t| t.name == projection)
            .map(|t| t.recursive)
            .reduce(|a, b| a || b)
    }

    /// The node's condition for the segment's primary actor, from the first
    /// tick. A node without a condition always holds.
    pub fn condition_holds(&self, ctx: &EvaluationContext<'_>) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |c| c.holds(ctx, ctx.primary()))
    }

    /// Same node with no children, used when rebuilding a pruned tree.
    pub(crate) fn detached(&self) -> Self {
        Self {
            name: self.name.clone(),
            condition: self.condition.clone(),
            tags: self.tags.clone(),
            monitors: self.monitors.clone(),
            kind: self.kind,
            children: Vec::new(),
        }
    }

    pub(crate) fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }
}

/// Join a parent path and a child name; the root's path is empty.
pub fn child_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}/{child}")
    }
}
