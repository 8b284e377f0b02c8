// src/temporal/relations.rs
//
// Relational and attribute primitives on resolved actor states at a single
// tick. Temporal structure is added by the quantifiers; nothing here looks
// at other ticks.
//
// Relations are read "a REL b" and are not symmetric in general:
//   is_behind(a, b)   a trails b by more than `offset` along a's direction
//   is_ahead(a, b)    is_behind(b, a)
//   is_beside(a, b)   adjacent lane, |lead| ≤ offset           (symmetric)
//   is_right_of(a, b) a's lane is further right than b's
//
// Every pairwise relation is false when both arguments are the same actor.

use crate::types::{ActorState, LightState};

pub fn distinct(a: &ActorState, b: &ActorState) -> bool {
    a.id != b.id
}

pub fn same_road(a: &ActorState, b: &ActorState) -> bool {
    distinct(a, b) && a.lane.road_id == b.lane.road_id
}

pub fn same_lane(a: &ActorState, b: &ActorState) -> bool {
    same_road(a, b) && a.lane.lane_id == b.lane.lane_id
}

/// Same road, lanes carrying traffic the same way.
pub fn same_direction(a: &ActorState, b: &ActorState) -> bool {
    same_road(a, b) && a.lane.lane_id.signum() == b.lane.lane_id.signum() && a.lane.lane_id != 0
}

pub fn oncoming(a: &ActorState, b: &ActorState) -> bool {
    same_road(a, b)
        && a.lane.lane_id != 0
        && b.lane.lane_id != 0
        && a.lane.lane_id.signum() != b.lane.lane_id.signum()
}

/// Signed distance by which `b` leads `a`, measured along `a`'s direction of
/// travel. Positive when `b` is in front of `a`.
pub fn longitudinal_lead(a: &ActorState, b: &ActorState) -> f64 {
    (b.lane.s - a.lane.s) * a.lane.driving_sign()
}

pub fn is_behind(a: &ActorState, b: &ActorState, offset: f64) -> bool {
    same_direction(a, b) && longitudinal_lead(a, b) > offset
}

pub fn is_ahead(a: &ActorState, b: &ActorState, offset: f64) -> bool {
    is_behind(b, a, offset)
}

pub fn is_beside(a: &ActorState, b: &ActorState, offset: f64) -> bool {
    same_direction(a, b)
        && a.lane.lane_id != b.lane.lane_id
        && longitudinal_lead(a, b).abs() <= offset
}

pub fn is_right_of(a: &ActorState, b: &ActorState) -> bool {
    same_direction(a, b) && a.lane.lane_id.abs() > b.lane.lane_id.abs()
}

pub fn is_left_of(a: &ActorState, b: &ActorState) -> bool {
    is_right_of(b, a)
}

pub fn both_at_least(a: &ActorState, b: &ActorState, speed: f64) -> bool {
    distinct(a, b) && a.speed >= speed && b.speed >= speed
}

/// Same-lane gap, `None` for actors in different lanes.
pub fn lane_gap(a: &ActorState, b: &ActorState) -> Option<f64> {
    same_lane(a, b).then(|| longitudinal_lead(a, b).abs())
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

pub fn is_stopped(a: &ActorState, stop_speed: f64) -> bool {
    a.speed <= stop_speed
}

pub fn in_junction(a: &ActorState) -> bool {
    a.lane.in_junction
}

pub fn facing_red(a: &ActorState) -> bool {
    a.traffic_light == Some(LightState::Red)
}

pub fn exceeds_limit(a: &ActorState, tolerance: f64) -> bool {
    a.lane
        .speed_limit
        .is_some_and(|limit| a.speed > limit * tolerance)
}
