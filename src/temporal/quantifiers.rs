// src/temporal/quantifiers.rs
//
// Temporal quantifiers over one actor (or an ordered pair of actors),
// evaluated relative to an anchor tick and bounded by the segment's end.
//
//   eventually(e)        ∃ t ≥ ref : e(t)
//   globally(e)          ∀ t ≥ ref : e(t)
//   until(φ1, φ2)        ∃ t0 ≥ ref : φ2(t0) ∧ ∀ t ∈ [ref, t0) : φ1(t)
//   next(e)              e at the tick right after ref (false at the last tick)
//   min_prevalence(p, e) |{t : e(t)}| / |segment| ≥ p over the WHOLE segment
//
// Windowed variants restrict the horizon to [ref + lo, ref + hi]. A window
// with no ticks makes `globally_within` vacuously true and
// `eventually_within` false; `sustained` asks for both, which is how
// composite predicates avoid vacuous truth.
//
// Lookup misses (anchor time not in the segment, actor absent at a tick)
// count as "not satisfied". Pair quantifiers are false for a self-pair.

use crate::scenario::{ActorView, Anchor, EvaluationContext, Tick};
use crate::types::ActorId;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Relative time window `[lo, hi]` in seconds elapsed since the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub lo: f64,
    pub hi: f64,
}

impl Window {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// `[0, hi]`
    pub fn upto(hi: f64) -> Self {
        Self { lo: 0.0, hi }
    }
}

/// Slack on window edges, in seconds. Elapsed times are differences of
/// absolute tick times and carry their rounding.
pub(crate) const TIME_EPSILON: f64 = 1e-9;

/// Whether at least `duration` seconds elapse between `from` and `to`.
pub(crate) fn spans(from: f64, to: f64, duration: f64) -> bool {
    to - from + TIME_EPSILON >= duration
}

fn within(ticks: &[Tick], window: Window) -> impl Iterator<Item = &Tick> {
    let reference = ticks.first().map_or(0.0, |t| t.time);
    ticks
        .iter()
        .skip_while(move |t| t.time - reference + TIME_EPSILON < window.lo)
        .take_while(move |t| t.time - reference <= window.hi + TIME_EPSILON)
}

impl<'s> EvaluationContext<'s> {
    fn suffix(&self, anchor: Anchor) -> Option<&'s [Tick]> {
        match self.horizon(anchor) {
            Ok(ticks) => Some(ticks),
            Err(miss) => {
                trace!("Quantifier anchor unresolved: {}", miss);
                None
            }
        }
    }

    // ========================================================================
    // SINGLE ACTOR
    // ========================================================================

    pub fn eventually<F>(&self, actor: ActorId, anchor: impl Into<Anchor>, e: F) -> bool
    where
        F: Fn(ActorView<'s>) -> bool,
    {
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        ticks
            .iter()
            .filter_map(|tick| self.view_in(tick, actor))
            .any(e)
    }

    pub fn globally<F>(&self, actor: ActorId, anchor: impl Into<Anchor>, e: F) -> bool
    where
        F: Fn(ActorView<'s>) -> bool,
    {
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        ticks
            .iter()
            .all(|tick| self.view_in(tick, actor).is_some_and(&e))
    }

    pub fn eventually_within<F>(
        &self,
        actor: ActorId,
        anchor: impl Into<Anchor>,
        window: Window,
        e: F,
    ) -> bool
    where
        F: Fn(ActorView<'s>) -> bool,
    {
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        within(ticks, window)
            .filter_map(|tick| self.view_in(tick, actor))
            .any(e)
    }

    pub fn globally_within<F>(
        &self,
        actor: ActorId,
        anchor: impl Into<Anchor>,
        window: Window,
        e: F,
    ) -> bool
    where
        F: Fn(ActorView<'s>) -> bool,
    {
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        within(ticks, window).all(|tick| self.view_in(tick, actor).is_some_and(&e))
    }

    /// `globally_within ∧ eventually_within`: holds throughout a window that
    /// actually contains ticks.
    pub fn sustained<F>(&self, actor: ActorId, anchor: impl Into<Anchor>, window: Window, e: F) -> bool
    where
        F: Fn(ActorView<'s>) -> bool,
    {
        let anchor = anchor.into();
        self.globally_within(actor, anchor, window, &e)
            && self.eventually_within(actor, anchor, window, &e)
    }

    pub fn until<P, Q>(&self, actor: ActorId, anchor: impl Into<Anchor>, phi1: P, phi2: Q) -> bool
    where
        P: Fn(ActorView<'s>) -> bool,
        Q: Fn(ActorView<'s>) -> bool,
    {
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        for tick in ticks {
            let Some(view) = self.view_in(tick, actor) else {
                return false;
            };
            if phi2(view) {
                return true;
            }
            if !phi1(view) {
                return false;
            }
        }
        false
    }

    pub fn next<F>(&self, actor: ActorId, anchor: impl Into<Anchor>, e: F) -> bool
    where
        F: Fn(ActorView<'s>) -> bool,
    {
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        ticks
            .get(1)
            .and_then(|tick| self.view_in(tick, actor))
            .is_some_and(e)
    }

    /// Fraction of all ticks in the segment at which `actor` is present and
    /// `e` holds. Ticks where the actor is absent count against it.
    pub fn prevalence<F>(&self, actor: ActorId, e: F) -> f64
    where
        F: Fn(ActorView<'s>) -> bool,
    {
        let ticks = self.ticks_all();
        let hits = ticks
            .iter()
            .filter_map(|tick| self.view_in(tick, actor))
            .filter(|view| e(*view))
            .count();
        hits as f64 / ticks.len() as f64
    }

    /// `prevalence ≥ threshold`, boundary inclusive.
    pub fn min_prevalence<F>(&self, actor: ActorId, threshold: f64, e: F) -> bool
    where
        F: Fn(ActorView<'s>) -> bool,
    {
        self.prevalence(actor, e) >= threshold
    }

    // ========================================================================
    // ACTOR PAIRS
    // ========================================================================

    pub fn eventually_pair<F>(
        &self,
        a: ActorId,
        b: ActorId,
        anchor: impl Into<Anchor>,
        e: F,
    ) -> bool
    where
        F: Fn(ActorView<'s>, ActorView<'s>) -> bool,
    {
        if a == b {
            return false;
        }
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        ticks
            .iter()
            .filter_map(|tick| self.pair_in(tick, a, b))
            .any(|(x, y)| e(x, y))
    }

    pub fn globally_pair<F>(&self, a: ActorId, b: ActorId, anchor: impl Into<Anchor>, e: F) -> bool
    where
        F: Fn(ActorView<'s>, ActorView<'s>) -> bool,
    {
        if a == b {
            return false;
        }
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        ticks
            .iter()
            .all(|tick| self.pair_in(tick, a, b).is_some_and(|(x, y)| e(x, y)))
    }

    pub fn eventually_pair_within<F>(
        &self,
        a: ActorId,
        b: ActorId,
        anchor: impl Into<Anchor>,
        window: Window,
        e: F,
    ) -> bool
    where
        F: Fn(ActorView<'s>, ActorView<'s>) -> bool,
    {
        if a == b {
            return false;
        }
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        within(ticks, window)
            .filter_map(|tick| self.pair_in(tick, a, b))
            .any(|(x, y)| e(x, y))
    }

    pub fn globally_pair_within<F>(
        &self,
        a: ActorId,
        b: ActorId,
        anchor: impl Into<Anchor>,
        window: Window,
        e: F,
    ) -> bool
    where
        F: Fn(ActorView<'s>, ActorView<'s>) -> bool,
    {
        if a == b {
            return false;
        }
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        within(ticks, window).all(|tick| self.pair_in(tick, a, b).is_some_and(|(x, y)| e(x, y)))
    }

    pub fn sustained_pair<F>(
        &self,
        a: ActorId,
        b: ActorId,
        anchor: impl Into<Anchor>,
        window: Window,
        e: F,
    ) -> bool
    where
        F: Fn(ActorView<'s>, ActorView<'s>) -> bool,
    {
        let anchor = anchor.into();
        self.globally_pair_within(a, b, anchor, window, &e)
            && self.eventually_pair_within(a, b, anchor, window, &e)
    }

    pub fn until_pair<P, Q>(
        &self,
        a: ActorId,
        b: ActorId,
        anchor: impl Into<Anchor>,
        phi1: P,
        phi2: Q,
    ) -> bool
    where
        P: Fn(ActorView<'s>, ActorView<'s>) -> bool,
        Q: Fn(ActorView<'s>, ActorView<'s>) -> bool,
    {
        if a == b {
            return false;
        }
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        for tick in ticks {
            let Some((x, y)) = self.pair_in(tick, a, b) else {
                return false;
            };
            if phi2(x, y) {
                return true;
            }
            if !phi1(x, y) {
                return false;
            }
        }
        false
    }

    pub fn next_pair<F>(&self, a: ActorId, b: ActorId, anchor: impl Into<Anchor>, e: F) -> bool
    where
        F: Fn(ActorView<'s>, ActorView<'s>) -> bool,
    {
        if a == b {
            return false;
        }
        let Some(ticks) = self.suffix(anchor.into()) else {
            return false;
        };
        ticks
            .get(1)
            .and_then(|tick| self.pair_in(tick, a, b))
            .is_some_and(|(x, y)| e(x, y))
    }
}
