// src/temporal/predicate.rs
//
// Named, pure predicates of fixed arity. Each predicate has one canonical
// body taking (context, anchor, actor ids) and two entry points on top:
//
//   holds_for(ctx, view...)       already-resolved state(s); anchored at the view's time
//   holds_at(ctx, time, id...)    (time, id) resolved through the context first;
//                                 a miss is returned, not swallowed
//
// Predicates are cheap to clone and shareable across threads.

use crate::scenario::{ActorView, Anchor, EvaluationContext, Lookup};
use crate::types::{ActorId, ActorKind};
use std::fmt;
use std::sync::Arc;

type UnaryBody = dyn Fn(&EvaluationContext<'_>, Anchor, ActorId) -> bool + Send + Sync;
type BinaryBody = dyn Fn(&EvaluationContext<'_>, Anchor, ActorId, ActorId) -> bool + Send + Sync;

// ============================================================================
// UNARY
// ============================================================================

#[derive(Clone)]
pub struct UnaryPredicate {
    name: Arc<str>,
    body: Arc<UnaryBody>,
}

impl UnaryPredicate {
    pub fn new<F>(name: impl Into<Arc<str>>, body: F) -> Self
    where
        F: Fn(&EvaluationContext<'_>, Anchor, ActorId) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    /// A predicate that holds everywhere.
    pub fn always() -> Self {
        Self::new("always", |_, _, _| true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eval(&self, ctx: &EvaluationContext<'_>, anchor: Anchor, actor: ActorId) -> bool {
        (self.body)(ctx, anchor, actor)
    }

    /// Evaluate from the segment's first tick.
    pub fn holds(&self, ctx: &EvaluationContext<'_>, actor: ActorId) -> bool {
        self.eval(ctx, Anchor::Start, actor)
    }

    pub fn holds_for(&self, ctx: &EvaluationContext<'_>, view: ActorView<'_>) -> bool {
        self.eval(ctx, view.into(), view.id)
    }

    pub fn holds_at(&self, ctx: &EvaluationContext<'_>, time: f64, actor: ActorId) -> Lookup<bool> {
        let view = ctx.resolve(time, actor)?;
        Ok(self.holds_for(ctx, view))
    }

    pub fn negate(&self) -> Self {
        let inner = self.clone();
        Self::new(format!("not {}", self.name), move |ctx, anchor, actor| {
            !inner.eval(ctx, anchor, actor)
        })
    }

    pub fn and(&self, other: &UnaryPredicate) -> Self {
        let (lhs, rhs) = (self.clone(), other.clone());
        Self::new(
            format!("{} and {}", self.name, other.name),
            move |ctx, anchor, actor| lhs.eval(ctx, anchor, actor) && rhs.eval(ctx, anchor, actor),
        )
    }

    pub fn or(&self, other: &UnaryPredicate) -> Self {
        let (lhs, rhs) = (self.clone(), other.clone());
        Self::new(
            format!("{} or {}", self.name, other.name),
            move |ctx, anchor, actor| lhs.eval(ctx, anchor, actor) || rhs.eval(ctx, anchor, actor),
        )
    }

    pub fn renamed(&self, name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            body: Arc::clone(&self.body),
        }
    }
}

impl fmt::Debug for UnaryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UnaryPredicate").field(&self.name).finish()
    }
}

// ============================================================================
// BINARY
// ============================================================================

#[derive(Clone)]
pub struct BinaryPredicate {
    name: Arc<str>,
    body: Arc<BinaryBody>,
}

impl BinaryPredicate {
    pub fn new<F>(name: impl Into<Arc<str>>, body: F) -> Self
    where
        F: Fn(&EvaluationContext<'_>, Anchor, ActorId, ActorId) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical body. A self-pair never holds.
    pub fn eval(&self, ctx: &EvaluationContext<'_>, anchor: Anchor, a: ActorId, b: ActorId) -> bool {
        a != b && (self.body)(ctx, anchor, a, b)
    }

    pub fn holds(&self, ctx: &EvaluationContext<'_>, a: ActorId, b: ActorId) -> bool {
        self.eval(ctx, Anchor::Start, a, b)
    }

    /// Anchored at `a`'s time; `b` is re-resolved there by the body.
    pub fn holds_for(&self, ctx: &EvaluationContext<'_>, a: ActorView<'_>, b: ActorView<'_>) -> bool {
        a.time() == b.time() && self.eval(ctx, a.into(), a.id, b.id)
    }

    pub fn holds_at(
        &self,
        ctx: &EvaluationContext<'_>,
        time: f64,
        a: ActorId,
        b: ActorId,
    ) -> Lookup<bool> {
        let x = ctx.resolve(time, a)?;
        let y = ctx.resolve(time, b)?;
        Ok(self.holds_for(ctx, x, y))
    }

    /// `P(b, a)`.
    pub fn converse(&self) -> Self {
        let inner = self.clone();
        Self::new(format!("converse {}", self.name), move |ctx, anchor, a, b| {
            inner.eval(ctx, anchor, b, a)
        })
    }

    pub fn negate(&self) -> Self {
        let inner = self.clone();
        Self::new(format!("not {}", self.name), move |ctx, anchor, a, b| {
            !inner.eval(ctx, anchor, a, b)
        })
    }

    /// ∃ b ≠ a in the segment with `P(a, b)`.
    pub fn exists_other(&self) -> UnaryPredicate {
        let inner = self.clone();
        UnaryPredicate::new(format!("some other: {}", self.name), move |ctx, anchor, a| {
            ctx.others(a).any(|b| inner.eval(ctx, anchor, a, b))
        })
    }

    /// ∃ b ≠ a of the given kind with `P(a, b)`.
    pub fn exists_other_of(&self, kind: ActorKind) -> UnaryPredicate {
        let inner = self.clone();
        UnaryPredicate::new(
            format!("some {}: {}", kind.as_str().to_lowercase(), self.name),
            move |ctx, anchor, a| {
                ctx.others(a)
                    .filter(|b| ctx.kind_of(*b) == Some(kind))
                    .any(|b| inner.eval(ctx, anchor, a, b))
            },
        )
    }
}

impl fmt::Debug for BinaryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BinaryPredicate").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupMiss;
    use crate::temporal::relations;
    use crate::test_support::{pedestrian, segment, tick, vehicle};

    fn fast() -> UnaryPredicate {
        UnaryPredicate::new("fast", |ctx, anchor, actor| {
            ctx.eventually(actor, anchor, |v| v.speed > 10.0)
        })
    }

    fn behind() -> BinaryPredicate {
        BinaryPredicate::new("behind", |ctx, anchor, a, b| {
            ctx.eventually_pair(a, b, anchor, |x, y| relations::is_behind(&x, &y, 2.0))
        })
    }

    fn sample() -> crate::scenario::Segment {
        segment(
            1,
            vec![
                tick(0.0, vec![vehicle(1, -1, 0.0, 5.0), vehicle(2, -1, 10.0, 5.0)]),
                tick(1.0, vec![vehicle(1, -1, 5.0, 12.0), pedestrian(3, 2.0)]),
                tick(2.0, vec![vehicle(1, -1, 17.0, 5.0), vehicle(2, -1, 20.0, 5.0)]),
            ],
        )
    }

    #[test]
    fn test_entry_points_share_one_body() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();
        let p = fast();

        assert!(p.holds(&ctx, 1));
        assert_eq!(p.holds_at(&ctx, 1.0, 1), Ok(true));
        assert_eq!(p.holds_at(&ctx, 2.0, 1), Ok(false), "anchored at the resolved time");

        let view = ctx.resolve(0.0, 1).unwrap();
        assert!(p.holds_for(&ctx, view));
    }

    #[test]
    fn test_holds_at_reports_misses() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();
        assert_eq!(
            fast().holds_at(&ctx, 1.0, 2),
            Err(LookupMiss::Actor { time: 1.0, actor: 2 })
        );
        assert_eq!(
            behind().holds_at(&ctx, 3.0, 1, 2),
            Err(LookupMiss::Time { time: 3.0 })
        );
    }

    #[test]
    fn test_binary_self_pair_is_false() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();
        let anything = BinaryPredicate::new("anything", |_, _, _, _| true);
        assert!(!anything.holds(&ctx, 1, 1));
        assert_eq!(anything.holds_at(&ctx, 0.0, 1, 1), Ok(false));
        assert!(anything.holds(&ctx, 1, 2));
    }

    #[test]
    fn test_binary_anchor_and_converse() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();
        let p = behind();

        assert!(p.holds(&ctx, 1, 2));
        assert!(!p.holds(&ctx, 2, 1));
        assert!(p.converse().holds(&ctx, 2, 1));
        // at t=2 the lead is 3.0 > 2.0, still behind
        assert_eq!(p.holds_at(&ctx, 2.0, 1, 2), Ok(true));
    }

    #[test]
    fn test_exists_other() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();
        let p = behind();

        assert!(p.exists_other().holds(&ctx, 1));
        assert!(!p.exists_other().holds(&ctx, 2));
        assert!(!p.exists_other_of(ActorKind::Pedestrian).holds(&ctx, 1));
        assert!(p.exists_other_of(ActorKind::Vehicle).holds(&ctx, 1));
    }

    #[test]
    fn test_combinators() {
        let seg = sample();
        let ctx = EvaluationContext::new(&seg).unwrap();
        let f = fast();
        let never = f.negate().and(&f);
        assert!(!never.holds(&ctx, 1));
        assert!(f.or(&never).holds(&ctx, 1));
        assert!(UnaryPredicate::always().holds(&ctx, 42));
        assert_eq!(f.renamed("quick").name(), "quick");
        assert_eq!(format!("{:?}", f), "UnaryPredicate(\"fast\")");
    }
}
