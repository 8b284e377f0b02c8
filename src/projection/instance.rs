// src/projection/instance.rs
//
// An instance is the set of satisfied non-root node paths of one
// classification ("environment/weather/clear", ...). The possible instances
// of a tree follow from its shape alone:
//
//   leaf       {path}
//   all        product of every child's options
//   exclusive  union of the children's options
//   optional   nothing chosen, or any single child's option
//   bounded    for each k in [min, max], each k-subset of children, product
//
// A chosen group contributes its own path as well as its children's.

use crate::catalogue::{child_path, GroupRule, Node};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Instance(BTreeSet<String>);

impl Instance {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, path: impl Into<String>) {
        self.0.insert(path.into());
    }

    fn union(&self, other: &Instance) -> Instance {
        Instance(self.0.union(&other.0).cloned().collect())
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "{{}}");
        }
        let joined: Vec<&str> = self.paths().collect();
        write!(f, "{{{}}}", joined.join(", "))
    }
}

/// Every structurally possible instance of the tree rooted at `root`.
pub fn enumerate_possible_instances(root: &Node) -> BTreeSet<Instance> {
    children_options(root, "")
}

fn node_options(node: &Node, path: &str) -> BTreeSet<Instance> {
    if node.is_leaf() {
        return BTreeSet::from([Instance::new([path])]);
    }
    children_options(node, path)
        .into_iter()
        .map(|mut instance| {
            instance.insert(path);
            instance
        })
        .collect()
}

fn children_options(node: &Node, path: &str) -> BTreeSet<Instance> {
    let options: Vec<BTreeSet<Instance>> = node
        .children()
        .iter()
        .map(|child| node_options(child, &child_path(path, child.name())))
        .collect();

    match node.rule() {
        None => BTreeSet::from([Instance::default()]),
        Some(GroupRule::All) => product(options.iter()),
        Some(GroupRule::Exclusive) => options.into_iter().flatten().collect(),
        Some(GroupRule::Optional) => std::iter::once(Instance::default())
            .chain(options.into_iter().flatten())
            .collect(),
        Some(GroupRule::Bounded { min, max }) => {
            let mut all = BTreeSet::new();
            for k in min..=max.min(options.len()) {
                for subset in subsets(options.len(), k) {
                    all.extend(product(subset.iter().map(|&i| &options[i])));
                }
            }
            all
        }
    }
}

fn product<'a>(options: impl Iterator<Item = &'a BTreeSet<Instance>>) -> BTreeSet<Instance> {
    options.fold(BTreeSet::from([Instance::default()]), |acc, opts| {
        acc.iter()
            .flat_map(|a| opts.iter().map(move |o| a.union(o)))
            .collect()
    })
}

/// All `k`-element index subsets of `0..n`, in lexicographic order.
fn subsets(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn extend(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            extend(i + 1, n, k, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    extend(0, n, k, &mut Vec::with_capacity(k), &mut out);
    out
}
