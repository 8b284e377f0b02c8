// src/temporal/behaviors.rs
//
// Composite behaviours built from the relational primitives and the
// temporal quantifiers. Each behaviour has a raw form (context, anchor,
// actor ids) and a constructor returning it as a named predicate for the
// catalogue.
//
// Overtaking is the strict three-phase chain
//
//   behind ∧ fast  U  (beside ∧ fast ∧ side  U  (ahead ∧ fast))
//
// entered at some tick ≥ the anchor, where "fast" means both actors keep at
// least `min_overtake_speed`. A speed drop in any phase breaks that attempt.

use super::predicate::{BinaryPredicate, UnaryPredicate};
use super::quantifiers::{spans, Window};
use super::relations;
use crate::scenario::{ActorView, Anchor, EvaluationContext};
use crate::types::{ActorId, ActorKind, ActorState, Thresholds, TimeOfDay, Weather};

/// Which side the passing actor must be on while alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Any,
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    fn holds(&self, a: &ActorState, b: &ActorState) -> bool {
        match self {
            Self::Any => true,
            Self::Left => relations::is_left_of(a, b),
            Self::Right => relations::is_right_of(a, b),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Behaviors {
    th: Thresholds,
}

impl Behaviors {
    pub fn new(th: Thresholds) -> Self {
        Self { th }
    }

    // ========================================================================
    // PAIR PHASES
    // ========================================================================

    fn fast(&self, a: &ActorState, b: &ActorState) -> bool {
        relations::both_at_least(a, b, self.th.min_overtake_speed)
    }

    fn approaching(&self, a: &ActorState, b: &ActorState) -> bool {
        relations::is_behind(a, b, self.th.behind_offset) && self.fast(a, b)
    }

    fn alongside(&self, a: &ActorState, b: &ActorState, side: Side) -> bool {
        relations::is_beside(a, b, self.th.beside_offset) && self.fast(a, b) && side.holds(a, b)
    }

    fn passed(&self, a: &ActorState, b: &ActorState) -> bool {
        relations::is_ahead(a, b, self.th.behind_offset) && self.fast(a, b)
    }

    fn trailing(&self, a: &ActorState, b: &ActorState) -> bool {
        relations::same_lane(a, b)
            && relations::is_behind(a, b, self.th.behind_offset)
            && relations::longitudinal_lead(a, b) <= self.th.follow_max_gap
            && !relations::is_stopped(a, self.th.stop_speed)
            && !relations::is_stopped(b, self.th.stop_speed)
    }

    // ========================================================================
    // RAW BEHAVIOURS
    // ========================================================================

    /// `a` overtakes `b`, passing on `side`.
    pub fn overtakes(
        &self,
        ctx: &EvaluationContext<'_>,
        anchor: Anchor,
        a: ActorId,
        b: ActorId,
        side: Side,
    ) -> bool {
        let Ok(ticks) = ctx.horizon(anchor) else {
            return false;
        };
        // A chain started at the first tick of an approach run covers every
        // later start in the same run, so only run starts are tried.
        let mut was_approaching = false;
        for tick in ticks {
            let Some((x, y)) = ctx.pair_in(tick, a, b) else {
                was_approaching = false;
                continue;
            };
            let approaching = self.approaching(&x, &y);
            if approaching && !was_approaching && self.approach_then_pass(ctx, x, a, b, side) {
                return true;
            }
            was_approaching = approaching;
        }
        false
    }

    fn approach_then_pass(
        &self,
        ctx: &EvaluationContext<'_>,
        from: ActorView<'_>,
        a: ActorId,
        b: ActorId,
        side: Side,
    ) -> bool {
        ctx.until_pair(
            a,
            b,
            from,
            |p, q| self.approaching(&p, &q),
            |p, q| {
                self.alongside(&p, &q, side)
                    && ctx.until_pair(
                        a,
                        b,
                        p,
                        |m, n| self.alongside(&m, &n, side),
                        |m, n| self.passed(&m, &n),
                    )
            },
        )
    }

    /// `a` trails `b` in the same lane within the following gap, for a
    /// window of `follow_min_duration` that lies inside the segment.
    pub fn follows(&self, ctx: &EvaluationContext<'_>, anchor: Anchor, a: ActorId, b: ActorId) -> bool {
        let duration = self.th.follow_min_duration;
        let end = ctx.end_time();
        ctx.eventually_pair(a, b, anchor, |x, y| {
            spans(x.time(), end, duration)
                && self.trailing(&x, &y)
                && ctx.sustained_pair(a, b, x, Window::upto(duration), |p, q| self.trailing(&p, &q))
        })
    }

    /// `a` waits outside a junction while `b` is in it, and stays out until
    /// `b` has left.
    pub fn yields_to(&self, ctx: &EvaluationContext<'_>, anchor: Anchor, a: ActorId, b: ActorId) -> bool {
        let stop = self.th.stop_speed;
        ctx.eventually_pair(a, b, anchor, |x, y| {
            relations::is_stopped(&x, stop)
                && !relations::in_junction(&x)
                && relations::in_junction(&y)
                && ctx.until_pair(
                    a,
                    b,
                    x,
                    |p, _| !relations::in_junction(&p),
                    |_, q| !relations::in_junction(&q),
                )
        })
    }

    pub fn changes_lane(&self, ctx: &EvaluationContext<'_>, anchor: Anchor, a: ActorId) -> bool {
        ctx.eventually(a, anchor, |x| {
            !x.lane.in_junction
                && ctx.next(a, x, |n| {
                    !n.lane.in_junction
                        && n.lane.road_id == x.lane.road_id
                        && n.lane.lane_id != x.lane.lane_id
                })
        })
    }

    /// Facing red outside the junction, inside it at the next tick.
    pub fn runs_red_light(&self, ctx: &EvaluationContext<'_>, anchor: Anchor, a: ActorId) -> bool {
        ctx.eventually(a, anchor, |x| {
            relations::facing_red(&x)
                && !relations::in_junction(&x)
                && ctx.next(a, x, |n| relations::in_junction(&n))
        })
    }

    pub fn speeds(&self, ctx: &EvaluationContext<'_>, anchor: Anchor, a: ActorId) -> bool {
        let tolerance = self.th.speeding_tolerance;
        ctx.eventually(a, anchor, |x| relations::exceeds_limit(&x, tolerance))
    }

    /// Standstill held for `min_stop_duration`, window inside the segment.
    pub fn stops(&self, ctx: &EvaluationContext<'_>, anchor: Anchor, a: ActorId) -> bool {
        let duration = self.th.min_stop_duration;
        let stop = self.th.stop_speed;
        let end = ctx.end_time();
        ctx.eventually(a, anchor, |x| {
            spans(x.time(), end, duration)
                && ctx.sustained(a, x, Window::upto(duration), |v| relations::is_stopped(&v, stop))
        })
    }

    pub fn enters_junction(&self, ctx: &EvaluationContext<'_>, anchor: Anchor, a: ActorId) -> bool {
        ctx.eventually(a, anchor, |x| relations::in_junction(&x))
    }

    /// Whole-segment share of ticks with weather in `kinds`.
    /// `kinds` reach the prevalence threshold and strictly outweigh `rivals`.
    /// A tie between the two holds for neither side.
    pub fn weather_prevails(
        &self,
        ctx: &EvaluationContext<'_>,
        a: ActorId,
        kinds: &[Weather],
        rivals: &[Weather],
    ) -> bool {
        let share = ctx.prevalence(a, |v| kinds.contains(&v.environment().weather));
        let rival = ctx.prevalence(a, |v| rivals.contains(&v.environment().weather));
        share >= self.th.prevalence && share > rival
    }

    pub fn daylight_prevails(&self, ctx: &EvaluationContext<'_>, a: ActorId) -> bool {
        ctx.min_prevalence(a, self.th.prevalence, |v| {
            v.environment().time_of_day == TimeOfDay::Day
        })
    }

    // ========================================================================
    // NAMED PREDICATES
    // ========================================================================

    pub fn overtaking(&self) -> BinaryPredicate {
        self.overtaking_on(Side::Any)
    }

    pub fn right_overtaking(&self) -> BinaryPredicate {
        self.overtaking_on(Side::Right)
    }

    pub fn left_overtaking(&self) -> BinaryPredicate {
        self.overtaking_on(Side::Left)
    }

    fn overtaking_on(&self, side: Side) -> BinaryPredicate {
        let me = *self;
        let name = match side {
            Side::Any => "overtaking".to_string(),
            other => format!("{}_overtaking", other.as_str()),
        };
        BinaryPredicate::new(name, move |ctx, anchor, a, b| me.overtakes(ctx, anchor, a, b, side))
    }

    pub fn following(&self) -> BinaryPredicate {
        let me = *self;
        BinaryPredicate::new("following", move |ctx, anchor, a, b| me.follows(ctx, anchor, a, b))
    }

    pub fn yielding(&self) -> BinaryPredicate {
        let me = *self;
        BinaryPredicate::new("yielding", move |ctx, anchor, a, b| me.yields_to(ctx, anchor, a, b))
    }

    pub fn lane_change(&self) -> UnaryPredicate {
        let me = *self;
        UnaryPredicate::new("lane_change", move |ctx, anchor, a| me.changes_lane(ctx, anchor, a))
    }

    pub fn ran_red_light(&self) -> UnaryPredicate {
        let me = *self;
        UnaryPredicate::new("ran_red_light", move |ctx, anchor, a| me.runs_red_light(ctx, anchor, a))
    }

    pub fn speeding(&self) -> UnaryPredicate {
        let me = *self;
        UnaryPredicate::new("speeding", move |ctx, anchor, a| me.speeds(ctx, anchor, a))
    }

    pub fn stopping(&self) -> UnaryPredicate {
        let me = *self;
        UnaryPredicate::new("stopping", move |ctx, anchor, a| me.stops(ctx, anchor, a))
    }

    pub fn junction(&self) -> UnaryPredicate {
        let me = *self;
        UnaryPredicate::new("junction", move |ctx, anchor, a| me.enters_junction(ctx, anchor, a))
    }

    /// Ignores the anchor: prevalence is over the whole segment.
    pub fn mostly_weather(&self, name: &str, kinds: &[Weather], rivals: &[Weather]) -> UnaryPredicate {
        let me = *self;
        let (kinds, rivals) = (kinds.to_vec(), rivals.to_vec());
        UnaryPredicate::new(name, move |ctx, _, a| {
            me.weather_prevails(ctx, a, &kinds, &rivals)
        })
    }

    pub fn daylight(&self) -> UnaryPredicate {
        let me = *self;
        UnaryPredicate::new("daylight", move |ctx, _, a| me.daylight_prevails(ctx, a))
    }

    /// Some actor of `kind` shares at least one tick with the subject.
    pub fn participant(&self, kind: ActorKind) -> UnaryPredicate {
        BinaryPredicate::new("co_present", |ctx, anchor, a, b| {
            ctx.eventually_pair(a, b, anchor, |_, _| true)
        })
        .exists_other_of(kind)
    }

    pub fn oncoming_traffic(&self) -> UnaryPredicate {
        BinaryPredicate::new("oncoming", |ctx, anchor, a, b| {
            ctx.eventually_pair(a, b, anchor, |x, y| relations::oncoming(&x, &y))
        })
        .exists_other_of(ActorKind::Vehicle)
        .renamed("oncoming_traffic")
    }

    // ========================================================================
    // MONITORS
    // ========================================================================

    /// No other actor ever comes closer than `min_gap` in the same lane.
    pub fn keeps_gap(&self) -> UnaryPredicate {
        let min_gap = self.th.min_gap;
        BinaryPredicate::new("too_close", move |ctx, anchor, a, b| {
            ctx.eventually_pair(a, b, anchor, |x, y| {
                relations::lane_gap(&x, &y).is_some_and(|gap| gap < min_gap)
            })
        })
        .exists_other()
        .negate()
        .renamed("keeps_gap")
    }

    /// Deceleration never exceeds `max_deceleration`.
    pub fn comfortable_deceleration(&self) -> UnaryPredicate {
        let limit = self.th.max_deceleration;
        UnaryPredicate::new("comfortable_deceleration", move |ctx, anchor, a| {
            !ctx.eventually(a, anchor, |v| v.acceleration < -limit)
        })
    }
}
