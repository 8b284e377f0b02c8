// src/test_support.rs
//
// Trajectory builders shared by the unit tests.

use crate::scenario::{Segment, Tick};
use crate::types::{ActorId, ActorKind, ActorState, Environment, LaneState};

pub fn vehicle(id: ActorId, lane_id: i32, s: f64, speed: f64) -> ActorState {
    ActorState {
        id,
        kind: ActorKind::Vehicle,
        speed,
        acceleration: 0.0,
        lane: LaneState {
            road_id: 1,
            lane_id,
            s,
            in_junction: false,
            speed_limit: None,
        },
        traffic_light: None,
    }
}

pub fn pedestrian(id: ActorId, s: f64) -> ActorState {
    ActorState {
        kind: ActorKind::Pedestrian,
        ..vehicle(id, -3, s, 1.2)
    }
}

pub fn tick(time: f64, actors: Vec<ActorState>) -> Tick {
    Tick {
        time,
        environment: Environment::default(),
        actors,
    }
}

pub fn tick_in(time: f64, environment: Environment, actors: Vec<ActorState>) -> Tick {
    Tick {
        time,
        environment,
        actors,
    }
}

pub fn segment(primary: ActorId, ticks: Vec<Tick>) -> Segment {
    Segment::new("test", primary, ticks)
}

/// One actor per tick, built from `states[i]` at time `i`.
pub fn solo(states: Vec<ActorState>) -> Segment {
    let primary = states.first().map_or(1, |s| s.id);
    let ticks = states
        .into_iter()
        .enumerate()
        .map(|(i, s)| tick(i as f64, vec![s]))
        .collect();
    segment(primary, ticks)
}

/// Actor 1 overtakes actor 2 on the left, one tick per second.
///
/// Each phase row is `(lane of actor 1, lead of actor 2 over actor 1,
/// speed of actor 1, speed of actor 2)`. Actor 2 stays in lane -2.
pub fn two_actor_segment(phases: &[(i32, f64, f64, f64)]) -> Segment {
    let ticks = phases
        .iter()
        .enumerate()
        .map(|(i, &(lane, lead, speed_1, speed_2))| {
            let s1 = i as f64 * 15.0;
            tick(
                i as f64,
                vec![vehicle(1, lane, s1, speed_1), vehicle(2, -2, s1 + lead, speed_2)],
            )
        })
        .collect();
    segment(1, ticks)
}

/// behind → alongside → ahead with both actors fast throughout, unless
/// `alongside_speed_2` drops actor 2 below the overtake speed mid-phase.
pub fn overtake_phases(alongside_speed_2: f64) -> Vec<(i32, f64, f64, f64)> {
    vec![
        (-2, 20.0, 18.0, 10.0),
        (-2, 12.0, 18.0, 10.0),
        (-1, 5.0, 18.0, 10.0),
        (-1, 1.0, 18.0, 10.0),
        (-1, 0.0, 18.0, alongside_speed_2),
        (-1, -1.5, 18.0, 10.0),
        (-1, -5.0, 18.0, 10.0),
        (-1, -10.0, 18.0, 10.0),
    ]
}
