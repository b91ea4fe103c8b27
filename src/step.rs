use std::marker::PhantomData;

use crate::ctx::Ctx;

/// State that the engine can fold partial updates into.
///
/// Each step returns a [`GraphState::Update`] holding only the fields it
/// computed; the runner merges it with [`GraphState::apply`]. Later values for
/// a field overwrite earlier ones.
pub trait GraphState: Clone + 'static {
    /// The partial update a step produces.
    type Update;

    /// Merge `update` into `self`.
    fn apply(&mut self, update: Self::Update);
}

/// A sync step that reads the current state and returns a partial update.
///
/// Steps can't fail. Anything that goes wrong inside a step (a collaborator
/// being down, say) must be encoded in the update it returns.
pub trait Step<S: GraphState>: Send + 'static {
    /// A unique name for this step, used when wiring edges.
    fn name(&self) -> &'static str;

    /// Run one step against a read-only view of the state.
    fn run(&mut self, state: &S, ctx: &mut Ctx) -> S::Update;
}

/// A [`Step`] backed by a closure. Build one with [`step_fn`].
pub struct FnStep<S, F> {
    name: &'static str,
    f: F,
    _state: PhantomData<fn(&S)>,
}

/// Wrap a closure as a named step.
///
/// ```rust
/// use trip_line::{step_fn, GraphState, Step, Ctx};
///
/// #[derive(Clone, Default)]
/// struct Count(u32);
///
/// impl GraphState for Count {
///     type Update = u32;
///     fn apply(&mut self, update: u32) {
///         self.0 = update;
///     }
/// }
///
/// let mut bump = step_fn("bump", |s: &Count, _ctx: &mut Ctx| s.0 + 1);
/// assert_eq!(bump.name(), "bump");
/// assert_eq!(bump.run(&Count(1), &mut Ctx::new()), 2);
/// ```
pub fn step_fn<S, F>(name: &'static str, f: F) -> FnStep<S, F>
where
    S: GraphState,
    F: FnMut(&S, &mut Ctx) -> S::Update + Send + 'static,
{
    FnStep {
        name,
        f,
        _state: PhantomData,
    }
}

impl<S, F> Step<S> for FnStep<S, F>
where
    S: GraphState,
    F: FnMut(&S, &mut Ctx) -> S::Update + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&mut self, state: &S, ctx: &mut Ctx) -> S::Update {
        (self.f)(state, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Pair {
        left: Option<u32>,
        right: Option<u32>,
    }

    #[derive(Default)]
    struct PairUpdate {
        left: Option<u32>,
        right: Option<u32>,
    }

    impl GraphState for Pair {
        type Update = PairUpdate;
        fn apply(&mut self, update: PairUpdate) {
            if let Some(v) = update.left {
                self.left = Some(v);
            }
            if let Some(v) = update.right {
                self.right = Some(v);
            }
        }
    }

    #[test]
    fn fn_step_reports_name() {
        let step = step_fn("left", |_s: &Pair, _ctx: &mut Ctx| PairUpdate::default());
        assert_eq!(step.name(), "left");
    }

    #[test]
    fn fn_step_sees_state_and_ctx() {
        let mut step = step_fn("left", |s: &Pair, ctx: &mut Ctx| {
            ctx.log("left ran");
            PairUpdate {
                left: Some(s.right.unwrap_or(0) + 1),
                right: None,
            }
        });
        let mut ctx = Ctx::new();
        let update = step.run(&Pair { left: None, right: Some(4) }, &mut ctx);
        assert_eq!(update.left, Some(5));
        assert_eq!(ctx.logs(), ["left ran"]);
    }

    #[test]
    fn apply_keeps_fields_the_update_omits() {
        let mut state = Pair { left: Some(1), right: Some(2) };
        state.apply(PairUpdate { left: Some(9), right: None });
        assert_eq!(state, Pair { left: Some(9), right: Some(2) });
    }

    #[test]
    fn fn_step_can_keep_its_own_counter() {
        let mut calls = 0;
        let mut step = step_fn("count", move |_s: &Pair, _ctx: &mut Ctx| {
            calls += 1;
            PairUpdate { left: Some(calls), right: None }
        });
        let mut ctx = Ctx::new();
        step.run(&Pair::default(), &mut ctx);
        let second = step.run(&Pair::default(), &mut ctx);
        assert_eq!(second.left, Some(2));
    }
}
