// src/scenario/context.rs
//
// Read-only index over one segment. Every lookup is keyed by the exact
// time value of a tick (not its position), because quantifiers reason about
// absolute times carried by resolved actor states.
//
// Indices:
//   - time → tick position
//   - (time, actor id) → slot of the actor inside that tick
//   - actor id → kind at first appearance
//
// The temporal quantifiers are implemented on this type in
// temporal::quantifiers.

use super::segment::{Segment, Tick};
use crate::error::{LookupMiss, SegmentError};
use crate::types::{ActorId, ActorKind, ActorState, Environment};
use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;
use tracing::debug;

pub type Lookup<T> = Result<T, LookupMiss>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TimeKey(u64);

impl TimeKey {
    fn of(time: f64) -> Self {
        // -0.0 == 0.0, so both must map to the same key
        Self((time + 0.0).to_bits())
    }
}

// ============================================================================
// RESOLVED STATE
// ============================================================================

/// An actor's state resolved at one tick. Carries the tick so that a
/// predicate handed a view can anchor further quantifiers at its time.
#[derive(Debug, Clone, Copy)]
pub struct ActorView<'s> {
    tick: &'s Tick,
    state: &'s ActorState,
}

impl<'s> ActorView<'s> {
    pub fn time(&self) -> f64 {
        self.tick.time
    }

    pub fn tick(&self) -> &'s Tick {
        self.tick
    }

    pub fn state(&self) -> &'s ActorState {
        self.state
    }

    pub fn environment(&self) -> &'s Environment {
        &self.tick.environment
    }
}

impl Deref for ActorView<'_> {
    type Target = ActorState;

    fn deref(&self) -> &ActorState {
        self.state
    }
}

/// Reference time of a quantifier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Anchor {
    /// The segment's first tick
    #[default]
    Start,
    /// An explicit tick time
    At(f64),
}

impl From<f64> for Anchor {
    fn from(time: f64) -> Self {
        Self::At(time)
    }
}

impl From<ActorView<'_>> for Anchor {
    fn from(view: ActorView<'_>) -> Self {
        Self::At(view.time())
    }
}

// ============================================================================
// EVALUATION CONTEXT
// ============================================================================

#[derive(Debug)]
pub struct EvaluationContext<'s> {
    segment: &'s Segment,
    tick_index: HashMap<TimeKey, usize>,
    actor_index: HashMap<(TimeKey, ActorId), usize>,
    kinds: BTreeMap<ActorId, ActorKind>,
}

impl<'s> EvaluationContext<'s> {
    /// Index a segment. Rejects empty segments, non-finite or
    /// non-increasing times, and actors listed twice in one tick.
    pub fn new(segment: &'s Segment) -> Result<Self, SegmentError> {
        let label = || segment.source.clone();

        if segment.ticks.is_empty() {
            return Err(SegmentError::Empty { segment: label() });
        }

        let mut tick_index = HashMap::with_capacity(segment.ticks.len());
        let mut actor_index = HashMap::new();
        let mut kinds = BTreeMap::new();
        let mut previous: Option<f64> = None;

        for (index, tick) in segment.ticks.iter().enumerate() {
            if !tick.time.is_finite() {
                return Err(SegmentError::NonFiniteTime {
                    segment: label(),
                    index,
                });
            }
            if let Some(prev) = previous {
                if tick.time <= prev {
                    return Err(SegmentError::NonMonotonicTime {
                        segment: label(),
                        index,
                        previous: prev,
                        time: tick.time,
                    });
                }
            }
            previous = Some(tick.time);

            let key = TimeKey::of(tick.time);
            tick_index.insert(key, index);

            for (slot, actor) in tick.actors.iter().enumerate() {
                if actor_index.insert((key, actor.id), slot).is_some() {
                    return Err(SegmentError::DuplicateActor {
                        segment: label(),
                        time: tick.time,
                        actor: actor.id,
                    });
                }
                kinds.entry(actor.id).or_insert(actor.kind);
            }
        }

        debug!(
            "Indexed segment '{}': {} ticks, {} actors, {:.1}s",
            segment.source,
            segment.ticks.len(),
            kinds.len(),
            segment.duration()
        );

        Ok(Self {
            segment,
            tick_index,
            actor_index,
            kinds,
        })
    }

    pub fn segment(&self) -> &'s Segment {
        self.segment
    }

    pub fn primary(&self) -> ActorId {
        self.segment.primary
    }

    pub fn len(&self) -> usize {
        self.segment.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn end_time(&self) -> f64 {
        self.segment.ticks[self.segment.ticks.len() - 1].time
    }

    pub fn ticks_all(&self) -> &'s [Tick] {
        &self.segment.ticks
    }

    pub fn tick_position(&self, time: f64) -> Lookup<usize> {
        self.tick_index
            .get(&TimeKey::of(time))
            .copied()
            .ok_or(LookupMiss::Time { time })
    }

    /// Ticks from `time` (inclusive) to the end. The iterator is lazy,
    /// finite, and restartable by cloning.
    pub fn ticks_from(&self, time: f64) -> Lookup<std::slice::Iter<'s, Tick>> {
        let position = self.tick_position(time)?;
        Ok(self.segment.ticks[position..].iter())
    }

    /// The remaining horizon of a quantifier anchored at `anchor`.
    pub fn horizon(&self, anchor: Anchor) -> Lookup<&'s [Tick]> {
        match anchor {
            Anchor::Start => Ok(&self.segment.ticks),
            Anchor::At(time) => {
                let position = self.tick_position(time)?;
                Ok(&self.segment.ticks[position..])
            }
        }
    }

    /// The tick immediately after the tick at `time`, if any.
    pub fn next_tick(&self, time: f64) -> Lookup<Option<&'s Tick>> {
        let position = self.tick_position(time)?;
        Ok(self.segment.ticks.get(position + 1))
    }

    pub fn resolve(&self, time: f64, actor: ActorId) -> Lookup<ActorView<'s>> {
        let key = TimeKey::of(time);
        let position = *self
            .tick_index
            .get(&key)
            .ok_or(LookupMiss::Time { time })?;
        let tick = &self.segment.ticks[position];
        self.view_in(tick, actor)
            .ok_or(LookupMiss::Actor { time, actor })
    }

    /// Resolve `actor` inside a tick of this segment.
    pub fn view_in(&self, tick: &'s Tick, actor: ActorId) -> Option<ActorView<'s>> {
        let slot = *self.actor_index.get(&(TimeKey::of(tick.time), actor))?;
        let state = tick.actors.get(slot).filter(|s| s.id == actor)?;
        Some(ActorView { tick, state })
    }

    /// Both actors inside one tick; `None` for a self-pair or if either is absent.
    pub fn pair_in(
        &self,
        tick: &'s Tick,
        a: ActorId,
        b: ActorId,
    ) -> Option<(ActorView<'s>, ActorView<'s>)> {
        if a == b {
            return None;
        }
        Some((self.view_in(tick, a)?, self.view_in(tick, b)?))
    }

    /// The states of `actor` from `time` onward, one entry per tick;
    /// `None` where the actor is absent.
    pub fn states_from(
        &self,
        time: f64,
        actor: ActorId,
    ) -> Lookup<impl Iterator<Item = Option<ActorView<'s>>> + '_> {
        let ticks = self.ticks_from(time)?;
        Ok(ticks.map(move |tick| self.view_in(tick, actor)))
    }

    pub fn actor_ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.kinds.keys().copied()
    }

    /// Every actor in the segment except `actor`.
    pub fn others(&self, actor: ActorId) -> impl Iterator<Item = ActorId> + '_ {
        self.actor_ids().filter(move |id| *id != actor)
    }

    pub fn kind_of(&self, actor: ActorId) -> Option<ActorKind> {
        self.kinds.get(&actor).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pedestrian, segment, tick, vehicle};

    fn sample() -> Segment {
        segment(
            1,
            vec![
                tick(0.0, vec![vehicle(1, -1, 0.0, 10.0), vehicle(2, -1, 20.0, 8.0)]),
                tick(0.5, vec![vehicle(1, -1, 5.0, 10.0)]),
                tick(1.25, vec![vehicle(1, -1, 12.5, 10.0), pedestrian(3, 30.0)]),
            ],
        )
    }

    #[test]
    fn test_empty_segment_rejected() {
        let seg = segment(1, vec![]);
        assert!(matches!(
            EvaluationContext::new(&seg),
            Err(SegmentError::Empty { .. })
        ));
    }

    #[test]
    fn test_non_increasing_time_rejected() {
        let seg = segment(
            1,
            vec![
                tick(0.0, vec![vehicle(1, -1, 0.0, 1.0)]),
                tick(1.0, vec![vehicle(1, -1, 1.0, 1.0)]),
                tick(1.0, vec![vehicle(1, -1, 2.0, 1.0)]),
            ],
        );
        match EvaluationContext::new(&seg) {
            Err(SegmentError::NonMonotonicTime { index, .. }) => assert_eq!(index, 2),
            other => panic!("expected NonMonotonicTime, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_actor_rejected() {
        let seg = segment(
            1,
            vec![tick(0.0, vec![vehicle(1, -1, 0.0, 1.0), vehicle(1, -2, 3.0, 1.0)])],
        );
        assert!(matches!(
            EvaluationContext::new(&seg),
            Err(SegmentError::DuplicateActor { actor: 1, .. })
        ));
    }

    #[test]
    fn test_resolve_by_time_value() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();

        let view = ctx.resolve(1.25, 1).unwrap();
        assert_eq!(view.time(), 1.25);
        assert_eq!(view.lane.s, 12.5);

        assert_eq!(
            ctx.resolve(0.75, 1).unwrap_err(),
            LookupMiss::Time { time: 0.75 }
        );
        assert_eq!(
            ctx.resolve(0.5, 2).unwrap_err(),
            LookupMiss::Actor { time: 0.5, actor: 2 }
        );
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();
        assert!(ctx.resolve(-0.0, 1).is_ok());
    }

    #[test]
    fn test_ticks_from_is_restartable() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();

        let ticks = ctx.ticks_from(0.5).unwrap();
        let again = ticks.clone();
        let times: Vec<f64> = ticks.map(|t| t.time).collect();
        assert_eq!(times, vec![0.5, 1.25]);
        assert_eq!(again.count(), 2);

        assert!(ctx.ticks_from(0.6).is_err());
        assert_eq!(ctx.ticks_all().len(), 3);
    }

    #[test]
    fn test_states_from_marks_absence() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();
        let presence: Vec<bool> = ctx.states_from(0.0, 2).unwrap().map(|v| v.is_some()).collect();
        assert_eq!(presence, vec![true, false, false]);
    }

    #[test]
    fn test_actor_index() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();
        assert_eq!(ctx.actor_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(ctx.others(2).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(ctx.kind_of(3), Some(ActorKind::Pedestrian));
        assert_eq!(ctx.kind_of(9), None);
    }

    #[test]
    fn test_next_tick_and_pair() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();
        assert_eq!(ctx.next_tick(0.5).unwrap().map(|t| t.time), Some(1.25));
        assert!(ctx.next_tick(1.25).unwrap().is_none());

        let first = &ctx.ticks_all()[0];
        assert!(ctx.pair_in(first, 1, 2).is_some());
        assert!(ctx.pair_in(first, 1, 1).is_none());
    }
}
