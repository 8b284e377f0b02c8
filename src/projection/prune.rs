// src/projection/prune.rs
//
// Slice the catalogue into per-projection trees. The root is always kept;
// below it a node survives iff it is tagged with the projection or an
// ancestor passed the tag down recursively. Arity rules are re-checked on
// the surviving children, so a projection that empties an exclusive group
// is rejected like any other malformed catalogue.

use super::Projection;
use crate::catalogue::{self, child_path, Catalogue, Node};
use crate::error::CatalogueError;
use tracing::{debug, info, warn};

impl Catalogue {
    pub fn prune_for(&self, projection: &str) -> Result<Projection, CatalogueError> {
        if !self.projection_names().contains(projection) {
            return Err(CatalogueError::UnknownProjection(projection.to_string()));
        }

        let inherited = self.root().tag_for(projection) == Some(true);
        let root = prune_node(self.root(), projection, inherited, "");
        catalogue::validate(&root)?;

        Ok(Projection::new(projection, root))
    }

    /// One pruned tree per known projection not named in `ignore`, sorted
    /// by name. Ignored names that match no projection are only logged.
    pub fn build_projections(&self, ignore: &[String]) -> Result<Vec<Projection>, CatalogueError> {
        let names = self.projection_names();

        for name in ignore {
            if !names.contains(name) {
                debug!("Ignore list names unknown projection '{}'", name);
            }
        }

        let mut projections = Vec::new();
        for name in names.iter().filter(|n| !ignore.contains(n)) {
            let projection = self.prune_for(name)?;
            info!(
                "✓ Projection '{}': {} possible instance(s)",
                name,
                projection.possible_instances().len()
            );
            projections.push(projection);
        }
        Ok(projections)
    }
}

fn prune_node(node: &Node, projection: &str, inherited: bool, path: &str) -> Node {
    let mut kept = node.detached();
    for child in node.children() {
        let child_path = child_path(path, child.name());
        let tag = child.tag_for(projection);
        if inherited || tag.is_some() {
            let propagate = inherited || tag == Some(true);
            kept.push_child(prune_node(child, projection, propagate, &child_path));
        } else {
            warn_unreachable(child, projection, &child_path);
        }
    }
    kept
}

/// A dropped subtree can still carry tags for the projection; those nodes
/// are unreachable because their parent is not retained.
fn warn_unreachable(node: &Node, projection: &str, path: &str) {
    for child in node.children() {
        let child_path = child_path(path, child.name());
        if child.tag_for(projection).is_some() {
            warn!(
                "⚠️  Projection '{}': '{}' is tagged but its parent is not; dropped",
                projection, child_path
            );
        }
        warn_unreachable(child, projection, &child_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::scenario_catalogue;
    use crate::projection::Instance;
    use crate::temporal::UnaryPredicate;
    use crate::types::Thresholds;

    fn leaf(name: &str) -> Node {
        Node::leaf(name, UnaryPredicate::always())
    }

    fn names(node: &Node) -> Vec<&str> {
        node.children().iter().map(|c| c.name()).collect()
    }

    fn sample() -> Catalogue {
        Catalogue::new(
            Node::all("root")
                .child(
                    Node::exclusive("weather")
                        .tag_recursive("env")
                        .child(leaf("clear"))
                        .child(leaf("rain").tag("wet")),
                )
                .child(
                    Node::bounded("rules", 0, 2)
                        .tag("safety")
                        .child(leaf("red_light").tag("safety"))
                        .child(leaf("speeding")),
                ),
        )
        .unwrap()
    }

    #[test]
    fn test_recursive_tag_keeps_subtree() {
        let env = sample().prune_for("env").unwrap();
        assert_eq!(names(env.root()), vec!["weather"]);
        assert_eq!(names(&env.root().children()[0]), vec!["clear", "rain"]);
    }

    #[test]
    fn test_plain_tag_keeps_only_named_nodes() {
        let safety = sample().prune_for("safety").unwrap();
        assert_eq!(names(safety.root()), vec!["rules"]);
        assert_eq!(names(&safety.root().children()[0]), vec!["red_light"]);

        let possible = safety.possible_instances();
        assert_eq!(possible.len(), 2);
        assert!(!possible.iter().any(|i| i.contains("rules/speeding")));
    }

    #[test]
    fn test_removing_tag_removes_node_and_instances() {
        let tagged = sample().prune_for("safety").unwrap();
        assert!(tagged
            .possible_instances()
            .contains(&Instance::new(["rules", "rules/red_light"])));

        let untagged = Catalogue::new(
            Node::all("root").child(
                Node::bounded("rules", 0, 2)
                    .tag("safety")
                    .child(leaf("red_light"))
                    .child(leaf("speeding")),
            ),
        )
        .unwrap()
        .prune_for("safety")
        .unwrap();
        assert!(untagged.root().children()[0].children().is_empty());
        assert_eq!(untagged.possible_instances().len(), 1);
    }

    fn road_catalogue(road_tagged: bool) -> Catalogue {
        let junction = Node::exclusive("junction")
            .child(leaf("signalled"))
            .child(leaf("unsignalled"));
        let road = Node::all("road").child(junction).child(leaf("lanes"));
        let road = if road_tagged { road.tag_recursive("p") } else { road };
        Catalogue::new(Node::all("root").child(road).child(leaf("ego").tag("p"))).unwrap()
    }

    #[test]
    fn test_removing_recursive_tag_removes_subtree_and_instances() {
        let tagged = road_catalogue(true).prune_for("p").unwrap();
        assert_eq!(names(tagged.root()), vec!["road", "ego"]);
        let road = &tagged.root().children()[0];
        assert_eq!(names(road), vec!["junction", "lanes"]);
        assert_eq!(names(&road.children()[0]), vec!["signalled", "unsignalled"]);

        let possible = tagged.possible_instances();
        assert_eq!(possible.len(), 2);
        assert!(possible.contains(&Instance::new([
            "road",
            "road/junction",
            "road/junction/signalled",
            "road/lanes",
            "ego",
        ])));

        let untagged = road_catalogue(false).prune_for("p").unwrap();
        assert_eq!(names(untagged.root()), vec!["ego"]);
        let possible = untagged.possible_instances();
        assert_eq!(possible.len(), 1);
        assert!(possible
            .iter()
            .all(|i| i.paths().all(|path| !path.starts_with("road"))));
    }

    #[test]
    fn test_pruning_that_empties_exclusive_is_fatal() {
        // "wet" keeps the exclusive group's child but not the group itself,
        // so the group is dropped and the tagged leaf is unreachable
        let wet = sample().prune_for("wet").unwrap();
        assert!(wet.root().children().is_empty());

        let catalogue = Catalogue::new(
            Node::all("root").child(
                Node::exclusive("weather")
                    .tag("p")
                    .child(leaf("clear"))
                    .child(leaf("rain")),
            ),
        )
        .unwrap();
        assert!(matches!(
            catalogue.prune_for("p"),
            Err(CatalogueError::Unsatisfiable { rule: "exclusive", available: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_projection() {
        assert_eq!(
            sample().prune_for("nope").unwrap_err(),
            CatalogueError::UnknownProjection("nope".into())
        );
    }

    #[test]
    fn test_build_projections_honours_ignore() {
        let projections = sample()
            .build_projections(&["wet".to_string(), "missing".to_string()])
            .unwrap();
        let built: Vec<&str> = projections.iter().map(|p| p.name()).collect();
        assert_eq!(built, vec!["env", "safety"]);
    }

    #[test]
    fn test_builtin_projection_sizes() {
        let catalogue = scenario_catalogue(&Thresholds::default()).unwrap();
        let size = |name: &str| catalogue.prune_for(name).unwrap().possible_instances().len();

        assert_eq!(size("environment"), 3 * 2);
        assert_eq!(size("road_layout"), 2);
        // 5 behaviours, 0..=3 at once: 1 + 5 + 10 + 10; times the optional group
        assert_eq!(size("behavior"), 26 * 3);
        assert_eq!(size("rules"), 4);
        assert_eq!(size("participants"), 8);
        assert_eq!(size("safety"), 2);
    }
}
