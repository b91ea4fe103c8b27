//! The travel-planning pipeline.
//!
//! Two shapes share one engine:
//!
//! ```text
//! Simple:       flights -> hotels -> activities -> planner -> END
//!
//! BudgetAware:  flights -> hotels -> activities -> planner --finish--> END
//!                          ^                          |
//!                          +------ revise <--revise---+
//! ```
//!
//! The budget-aware loop goes round at most `max_revisions` times; after
//! that the last plan is returned as-is.

pub mod budget;
pub mod prompts;
pub mod steps;

use crate::collab::Services;
use crate::graph::{END, Graph, GraphError};
use crate::runner::Runner;
use crate::state::{Itinerary, TripState};
use crate::Ctx;
use budget::{BudgetPolicy, SentinelPolicy};
use steps::{
    ACTIVITIES, FLIGHTS, HOTELS, PLANNER, PlannerStep, REVISE, ReviseStep, SearchKind, SearchStep,
};

pub const DEFAULT_MAX_REVISIONS: u32 = 2;

/// Branch keys returned by [`after_planning`].
pub const BRANCH_REVISE: &str = "revise";
pub const BRANCH_FINISH: &str = "finish";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Straight pipeline, no budget check.
    Simple,
    /// Loop back to the hotel search while the plan is over budget.
    BudgetAware { max_revisions: u32 },
}

impl Default for Variant {
    fn default() -> Self {
        Self::BudgetAware {
            max_revisions: DEFAULT_MAX_REVISIONS,
        }
    }
}

/// Decision after the planner: revise while the plan is over budget and the
/// bound allows, otherwise finish with what we have.
pub fn after_planning(max_revisions: u32) -> impl Fn(&TripState) -> &'static str + Send + 'static {
    move |state: &TripState| {
        let over_budget = state
            .itinerary
            .as_ref()
            .is_some_and(Itinerary::needs_revision);
        if over_budget && state.revision_count < max_revisions {
            BRANCH_REVISE
        } else {
            BRANCH_FINISH
        }
    }
}

/// Build the graph for `variant` with the default budget policy.
pub fn build_graph(services: &Services, variant: Variant) -> Result<Graph<TripState>, GraphError> {
    build_graph_with_policy(services, variant, SentinelPolicy::default())
}

/// Build the graph for `variant`. `policy` is only used by the budget-aware
/// shape.
pub fn build_graph_with_policy(
    services: &Services,
    variant: Variant,
    policy: impl BudgetPolicy + 'static,
) -> Result<Graph<TripState>, GraphError> {
    let search = || services.search.clone();
    let builder = Graph::builder("trip")
        .register_step(SearchStep::new(SearchKind::Flights, search()))
        .register_step(SearchStep::new(SearchKind::Hotels, search()))
        .register_step(SearchStep::new(SearchKind::Activities, search()));

    let builder = match variant {
        Variant::Simple => builder
            .register_step(PlannerStep::new(services.model.clone()))
            .add_edge(PLANNER, END),
        Variant::BudgetAware { max_revisions } => builder
            .register_step(PlannerStep::new(services.model.clone()).with_policy(policy))
            .register_step(ReviseStep)
            .add_conditional_edge(
                PLANNER,
                after_planning(max_revisions),
                [(BRANCH_REVISE, REVISE), (BRANCH_FINISH, END)],
            )
            .add_edge(REVISE, HOTELS),
    };

    builder
        .set_entry(FLIGHTS)
        .then(HOTELS)
        .then(ACTIVITIES)
        .then(PLANNER)
        .build()
}

/// A ready-to-run travel planner.
pub struct TripPlanner {
    runner: Runner<TripState>,
}

impl TripPlanner {
    pub fn new(services: &Services, variant: Variant) -> Result<Self, GraphError> {
        Ok(Self {
            runner: Runner::new(build_graph(services, variant)?),
        })
    }

    pub fn with_policy(
        services: &Services,
        variant: Variant,
        policy: impl BudgetPolicy + 'static,
    ) -> Result<Self, GraphError> {
        Ok(Self {
            runner: Runner::new(build_graph_with_policy(services, variant, policy)?),
        })
    }

    /// Log each step through `tracing`.
    pub fn with_tracing(mut self) -> Self {
        self.runner = self.runner.with_tracing();
        self
    }

    /// Plan one trip. Only the seed fields of `seed` are used, and `ctx` is
    /// cleared first so its path and visit counts describe this run alone.
    pub fn plan(&mut self, seed: TripState, ctx: &mut Ctx) -> Result<TripState, GraphError> {
        ctx.clear();
        self.runner.run(seed.seed_only(), ctx)
    }
}
