// src/catalogue/builtin.rs
//
// The fixed scenario catalogue. Top-level groups are tagged recursively
// with their own projection and with "full". The "safety" projection is
// tagged without recursion, so it keeps only the nodes it names.
//
//   scenario (all)
//   ├── environment (all)
//   │   ├── weather (exclusive): clear | precipitation | overcast
//   │   └── time_of_day (exclusive): daylight | low_light
//   ├── road (exclusive): junction | open_road
//   ├── ego_behavior (bounded 0..3): overtaking, lane_change, following, yielding, stopping
//   ├── being_overtaken (optional): overtaken_on_right | overtaken_on_left
//   ├── traffic_rules (bounded 0..2): ran_red_light, speeding
//   └── participants (bounded 0..3): pedestrians, cyclists, oncoming_traffic

use super::node::Node;
use super::Catalogue;
use crate::error::CatalogueError;
use crate::temporal::Behaviors;
use crate::types::{ActorKind, Thresholds, Weather};

pub const FULL: &str = "full";
pub const SAFETY: &str = "safety";

pub fn scenario_catalogue(thresholds: &Thresholds) -> Result<Catalogue, CatalogueError> {
    let b = Behaviors::new(*thresholds);

    let root = Node::all("scenario")
        .child(environment(&b))
        .child(road(&b))
        .child(ego_behavior(&b))
        .child(being_overtaken(&b))
        .child(traffic_rules(&b))
        .child(participants(&b));

    Catalogue::new(root)
}

fn environment(b: &Behaviors) -> Node {
    // an even split between clear and rain falls through to overcast
    let clear = b.mostly_weather("clear", &[Weather::Clear], &[Weather::Rain]);
    let precipitation = b.mostly_weather("precipitation", &[Weather::Rain], &[Weather::Clear]);
    let overcast = clear.or(&precipitation).negate().renamed("overcast");
    let daylight = b.daylight();

    Node::all("environment")
        .tag_recursive("environment")
        .tag_recursive(FULL)
        .child(
            Node::exclusive("weather")
                .child(Node::leaf("clear", clear))
                .child(Node::leaf("precipitation", precipitation))
                .child(Node::leaf("overcast", overcast)),
        )
        .child(
            Node::exclusive("time_of_day")
                .child(Node::leaf("low_light", daylight.negate()))
                .child(Node::leaf("daylight", daylight)),
        )
}

fn road(b: &Behaviors) -> Node {
    let junction = b.junction();
    Node::exclusive("road")
        .tag_recursive("road_layout")
        .tag_recursive(FULL)
        .child(Node::leaf("open_road", junction.negate()))
        .child(Node::leaf("junction", junction))
}

fn ego_behavior(b: &Behaviors) -> Node {
    Node::bounded("ego_behavior", 0, 3)
        .tag_recursive("behavior")
        .tag_recursive(FULL)
        .child(
            Node::leaf("overtaking", b.overtaking().exists_other())
                .monitor("keeps_gap", b.keeps_gap()),
        )
        .child(Node::leaf("lane_change", b.lane_change()))
        .child(Node::leaf("following", b.following().exists_other()))
        .child(Node::leaf("yielding", b.yielding().exists_other()))
        .child(
            Node::leaf("stopping", b.stopping())
                .monitor("comfortable_deceleration", b.comfortable_deceleration()),
        )
}

fn being_overtaken(b: &Behaviors) -> Node {
    Node::optional("being_overtaken")
        .tag_recursive("behavior")
        .tag_recursive(FULL)
        .child(Node::leaf(
            "overtaken_on_right",
            b.right_overtaking().converse().exists_other(),
        ))
        .child(Node::leaf(
            "overtaken_on_left",
            b.left_overtaking().converse().exists_other(),
        ))
}

fn traffic_rules(b: &Behaviors) -> Node {
    Node::bounded("traffic_rules", 0, 2)
        .tag_recursive("rules")
        .tag_recursive(FULL)
        .tag(SAFETY)
        .child(
            Node::leaf("ran_red_light", b.ran_red_light())
                .tag(SAFETY)
                .monitor("comfortable_deceleration", b.comfortable_deceleration()),
        )
        .child(Node::leaf("speeding", b.speeding()))
}

fn participants(b: &Behaviors) -> Node {
    Node::bounded("participants", 0, 3)
        .tag_recursive("participants")
        .tag_recursive(FULL)
        .child(Node::leaf("pedestrians", b.participant(ActorKind::Pedestrian)))
        .child(Node::leaf("cyclists", b.participant(ActorKind::Bicycle)))
        .child(Node::leaf("oncoming_traffic", b.oncoming_traffic()))
}
