// src/catalogue/mod.rs
//
// The classification catalogue: one rooted tree of groups and leaves,
// built once, validated once, then shared read-only by every evaluation.
// Structural problems are fatal and reported before any segment is seen.

pub mod builtin;
pub mod node;

pub use builtin::scenario_catalogue;
pub use node::{child_path, GroupRule, Monitor, Node, NodeKind, ProjectionTag};

use crate::error::CatalogueError;
use std::collections::{BTreeSet, HashSet};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Catalogue {
    root: Node,
}

impl Catalogue {
    pub fn new(root: Node) -> Result<Self, CatalogueError> {
        validate(&root)?;
        let catalogue = Self { root };
        info!(
            "✓ Catalogue '{}' ready: {} nodes, projections: {}",
            catalogue.root.name(),
            count_nodes(&catalogue.root),
            catalogue
                .projection_names()
                .into_iter()
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(catalogue)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Every projection named by some tag, sorted.
    pub fn projection_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_tags(&self.root, &mut names);
        names
    }
}

fn collect_tags(node: &Node, names: &mut BTreeSet<String>) {
    names.extend(node.tags().iter().map(|t| t.name.clone()));
    for child in node.children() {
        collect_tags(child, names);
    }
}

fn count_nodes(node: &Node) -> usize {
    1 + node.children().iter().map(count_nodes).sum::<usize>()
}

/// Structural checks, also applied to every pruned tree.
pub(crate) fn validate(root: &Node) -> Result<(), CatalogueError> {
    if root.is_leaf() {
        return Err(CatalogueError::RootIsLeaf(root.name().to_string()));
    }
    if root.condition().is_some() {
        return Err(CatalogueError::RootCondition(root.name().to_string()));
    }
    validate_node(root, "")
}

fn validate_node(node: &Node, path: &str) -> Result<(), CatalogueError> {
    let label = if path.is_empty() { node.name() } else { path };

    if node.name().is_empty() || node.name().contains('/') {
        return Err(CatalogueError::InvalidName(node.name().to_string()));
    }

    let Some(rule) = node.rule() else {
        if !node.children().is_empty() {
            return Err(CatalogueError::LeafWithChildren(label.to_string()));
        }
        return Ok(());
    };

    if !node.monitors().is_empty() {
        return Err(CatalogueError::MonitorOnGroup(label.to_string()));
    }
    if let GroupRule::Bounded { min, max } = rule {
        if min > max {
            return Err(CatalogueError::InvertedBounds {
                path: label.to_string(),
                min,
                max,
            });
        }
    }
    if !rule.satisfiable(node.children().len()) {
        return Err(CatalogueError::Unsatisfiable {
            path: label.to_string(),
            rule: rule.as_str(),
            available: node.children().len(),
        });
    }

    let mut seen = HashSet::new();
    for child in node.children() {
        if !seen.insert(child.name()) {
            return Err(CatalogueError::DuplicateChild {
                path: label.to_string(),
                child: child.name().to_string(),
            });
        }
        validate_node(child, &child_path(path, child.name()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::UnaryPredicate;

    fn leaf(name: &str) -> Node {
        Node::leaf(name, UnaryPredicate::always())
    }

    #[test]
    fn test_valid_catalogue() {
        let root = Node::all("root")
            .child(Node::exclusive("a").tag_recursive("p").child(leaf("x")).child(leaf("y")))
            .child(Node::optional("b").tag("q").child(leaf("z")));
        let catalogue = Catalogue::new(root).unwrap();
        assert_eq!(
            catalogue.projection_names().into_iter().collect::<Vec<_>>(),
            vec!["p", "q"]
        );
    }

    #[test]
    fn test_root_must_be_plain_group() {
        assert_eq!(
            Catalogue::new(leaf("root")).unwrap_err(),
            CatalogueError::RootIsLeaf("root".into())
        );
        assert_eq!(
            Catalogue::new(Node::all("root").when(UnaryPredicate::always())).unwrap_err(),
            CatalogueError::RootCondition("root".into())
        );
    }

    #[test]
    fn test_structural_errors() {
        let dup = Node::all("root").child(Node::all("g").child(leaf("x")).child(leaf("x")));
        assert_eq!(
            Catalogue::new(dup).unwrap_err(),
            CatalogueError::DuplicateChild {
                path: "g".into(),
                child: "x".into()
            }
        );

        let bad_name = Node::all("root").child(leaf("a/b"));
        assert!(matches!(
            Catalogue::new(bad_name),
            Err(CatalogueError::InvalidName(_))
        ));

        let leaf_parent = Node::all("root").child(leaf("x").child(leaf("y")));
        assert_eq!(
            Catalogue::new(leaf_parent).unwrap_err(),
            CatalogueError::LeafWithChildren("x".into())
        );

        let monitored_group =
            Node::all("root").child(Node::all("g").monitor("m", UnaryPredicate::always()));
        assert_eq!(
            Catalogue::new(monitored_group).unwrap_err(),
            CatalogueError::MonitorOnGroup("g".into())
        );
    }

    #[test]
    fn test_arity_errors() {
        let inverted = Node::all("root").child(Node::bounded("g", 2, 1).child(leaf("x")));
        assert!(matches!(
            Catalogue::new(inverted),
            Err(CatalogueError::InvertedBounds { min: 2, max: 1, .. })
        ));

        let empty_exclusive = Node::all("root").child(Node::exclusive("g"));
        assert_eq!(
            Catalogue::new(empty_exclusive).unwrap_err(),
            CatalogueError::Unsatisfiable {
                path: "g".into(),
                rule: "exclusive",
                available: 0
            }
        );

        let short_bounded =
            Node::all("root").child(Node::bounded("g", 3, 4).child(leaf("x")).child(leaf("y")));
        assert!(matches!(
            Catalogue::new(short_bounded),
            Err(CatalogueError::Unsatisfiable { available: 2, .. })
        ));
    }
}
