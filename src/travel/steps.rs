use std::sync::Arc;

use super::budget::BudgetPolicy;
use super::prompts;
use crate::collab::{ChatModel, WebSearch};
use crate::state::{Itinerary, TripState, TripUpdate};
use crate::tools::strip_code_fences;
use crate::{Ctx, Step};

pub const FLIGHTS: &str = "flights";
pub const HOTELS: &str = "hotels";
pub const ACTIVITIES: &str = "activities";
pub const PLANNER: &str = "planner";
pub const REVISE: &str = "revise";

/// Run a search, or explain in the result why there isn't one.
fn search_or_placeholder(search: Option<&dyn WebSearch>, query: &str) -> String {
    let Some(search) = search else {
        return format!("[search skipped] {query}");
    };
    match search.search(query) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(query, error = %err, "search failed");
            format!("[search failed: {err}] {query}")
        }
    }
}

// ---------------------------------------------------------------------------
// Search steps
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKind {
    Flights,
    Hotels,
    Activities,
}

impl SearchKind {
    fn step_name(self) -> &'static str {
        match self {
            Self::Flights => FLIGHTS,
            Self::Hotels => HOTELS,
            Self::Activities => ACTIVITIES,
        }
    }

    fn query(self, state: &TripState) -> String {
        match self {
            Self::Flights => prompts::flights_query(state),
            Self::Hotels => prompts::hotels_query(state),
            Self::Activities => prompts::activities_query(state),
        }
    }

    fn update(self, info: String) -> TripUpdate {
        match self {
            Self::Flights => TripUpdate::flights(info),
            Self::Hotels => TripUpdate::hotels(info),
            Self::Activities => TripUpdate::activities(info),
        }
    }
}

/// One of the three web-search phases.
pub struct SearchStep {
    kind: SearchKind,
    search: Option<Arc<dyn WebSearch>>,
}

impl SearchStep {
    pub fn new(kind: SearchKind, search: Option<Arc<dyn WebSearch>>) -> Self {
        Self { kind, search }
    }
}

impl Step<TripState> for SearchStep {
    fn name(&self) -> &'static str {
        self.kind.step_name()
    }

    fn run(&mut self, state: &TripState, ctx: &mut Ctx) -> TripUpdate {
        let query = self.kind.query(state);
        ctx.log(format!("searching {}: {query}", self.kind.step_name()));
        tracing::info!(step = self.kind.step_name(), "searching");

        let info = search_or_placeholder(self.search.as_deref(), &query);
        self.kind.update(info)
    }
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Writes the itinerary and, when it has a budget policy and the trip has a
/// budget, decides whether the plan needs another pass.
pub struct PlannerStep {
    model: Option<Arc<dyn ChatModel>>,
    policy: Option<Box<dyn BudgetPolicy>>,
}

impl PlannerStep {
    pub fn new(model: Option<Arc<dyn ChatModel>>) -> Self {
        Self {
            model,
            policy: None,
        }
    }

    pub fn with_policy(mut self, policy: impl BudgetPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    fn write(&self, state: &TripState, budget_rule: Option<String>) -> String {
        let Some(model) = &self.model else {
            return prompts::fallback_itinerary(state, None);
        };
        match prompts::planner_prompt(state, budget_rule).send(model.as_ref()) {
            Ok(text) => strip_code_fences(&text),
            Err(err) => {
                tracing::warn!(error = %err, "planner model failed, using fallback");
                prompts::fallback_itinerary(state, Some(&err.to_string()))
            }
        }
    }
}

impl Step<TripState> for PlannerStep {
    fn name(&self) -> &'static str {
        PLANNER
    }

    fn run(&mut self, state: &TripState, ctx: &mut Ctx) -> TripUpdate {
        ctx.log("compiling final plan");
        tracing::info!(step = PLANNER, revision = state.revision_count, "compiling plan");

        // No budget, no budget check.
        let checked = self.policy.as_deref().zip(state.budget);

        let text = self.write(state, checked.map(|(policy, budget)| policy.instruction(budget)));
        let itinerary = match checked {
            Some((policy, budget)) if policy.over_budget(&text, budget) => {
                ctx.log(format!("plan is over the budget of {budget}"));
                Itinerary::NeedsRevision(text)
            }
            _ => Itinerary::Accepted(text),
        };
        TripUpdate::itinerary(itinerary)
    }
}

// ---------------------------------------------------------------------------
// Revise
// ---------------------------------------------------------------------------

/// Counts a revision and leaves advice for the next hotel search.
pub struct ReviseStep;

impl Step<TripState> for ReviseStep {
    fn name(&self) -> &'static str {
        REVISE
    }

    fn run(&mut self, state: &TripState, ctx: &mut Ctx) -> TripUpdate {
        let revision = state.revision_count + 1;
        let feedback = match state.budget {
            Some(budget) => format!(
                "Revision {revision}: the last plan went over the budget of {budget}. \
                 Look for cheaper hotels."
            ),
            None => format!(
                "Revision {revision}: the last plan went over budget. Look for cheaper hotels."
            ),
        };
        ctx.log(format!("revising plan (attempt {revision})"));
        tracing::info!(step = REVISE, revision, "plan over budget, revising");
        TripUpdate::revision(revision, feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{CollabError, Message};
    use crate::travel::budget::SentinelPolicy;
    use std::sync::Mutex;

    struct FixedSearch(&'static str);
    impl WebSearch for FixedSearch {
        fn search(&self, _query: &str) -> Result<String, CollabError> {
            Ok(self.0.to_string())
        }
    }

    struct DownSearch;
    impl WebSearch for DownSearch {
        fn search(&self, _query: &str) -> Result<String, CollabError> {
            Err(CollabError::Status(503))
        }
    }

    struct EchoModel {
        reply: &'static str,
        seen: Mutex<Vec<Vec<Message>>>,
    }
    impl ChatModel for EchoModel {
        fn generate(&self, messages: &[Message]) -> Result<String, CollabError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            Ok(self.reply.to_string())
        }
    }

    fn echo(reply: &'static str) -> Arc<EchoModel> {
        Arc::new(EchoModel {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn kyoto() -> TripState {
        TripState::seed("Kyoto, Japan", "history")
    }

    #[test]
    fn search_step_uses_collaborator() {
        let mut step = SearchStep::new(SearchKind::Flights, Some(Arc::new(FixedSearch("KIX 420"))));
        let update = step.run(&kyoto(), &mut Ctx::new());
        assert_eq!(update, TripUpdate::flights("KIX 420".into()));
    }

    #[test]
    fn search_step_without_collaborator_is_skipped() {
        let mut step = SearchStep::new(SearchKind::Activities, None);
        let update = step.run(&kyoto(), &mut Ctx::new());
        assert_eq!(
            update.activity_info.as_deref(),
            Some("[search skipped] Top things to do in Kyoto, Japan for someone who likes history")
        );
    }

    #[test]
    fn search_failure_becomes_placeholder() {
        let mut step = SearchStep::new(SearchKind::Hotels, Some(Arc::new(DownSearch)));
        let update = step.run(&kyoto(), &mut Ctx::new());
        assert_eq!(
            update.hotel_info.as_deref(),
            Some("[search failed: http status 503] Best budget hotels in Kyoto, Japan near city center")
        );
    }

    #[test]
    fn search_step_names() {
        assert_eq!(SearchStep::new(SearchKind::Flights, None).name(), FLIGHTS);
        assert_eq!(SearchStep::new(SearchKind::Hotels, None).name(), HOTELS);
        assert_eq!(SearchStep::new(SearchKind::Activities, None).name(), ACTIVITIES);
    }

    #[test]
    fn planner_without_model_falls_back() {
        let mut step = PlannerStep::new(None);
        let update = step.run(&kyoto(), &mut Ctx::new());
        let itinerary = update.itinerary.unwrap();
        assert!(!itinerary.needs_revision());
        assert!(itinerary.text().starts_with("# 3-Day Itinerary for Kyoto, Japan"));
    }

    #[test]
    fn planner_strips_code_fence() {
        let mut step = PlannerStep::new(Some(echo("```markdown\n# Day 1\n```")));
        let update = step.run(&kyoto(), &mut Ctx::new());
        assert_eq!(update.itinerary, Some(Itinerary::Accepted("# Day 1".into())));
    }

    #[test]
    fn planner_flags_over_budget_reply() {
        let model = echo("TOO EXPENSIVE: hotels alone are 900");
        let mut step = PlannerStep::new(Some(model.clone())).with_policy(SentinelPolicy::default());
        let update = step.run(&kyoto().with_budget(500), &mut Ctx::new());

        assert!(update.itinerary.unwrap().needs_revision());
        let seen = model.seen.lock().unwrap();
        assert!(seen[0][1].content.contains("total budget is 500"));
    }

    #[test]
    fn planner_skips_budget_check_without_budget() {
        let model = echo("TOO EXPENSIVE");
        let mut step = PlannerStep::new(Some(model.clone())).with_policy(SentinelPolicy::default());
        let update = step.run(&kyoto(), &mut Ctx::new());

        assert_eq!(update.itinerary, Some(Itinerary::Accepted("TOO EXPENSIVE".into())));
        let seen = model.seen.lock().unwrap();
        assert!(!seen[0][1].content.contains("budget"));
    }

    #[test]
    fn revise_bumps_counter_and_leaves_feedback() {
        let mut state = kyoto().with_budget(500);
        state.revision_count = 1;

        let update = ReviseStep.run(&state, &mut Ctx::new());
        assert_eq!(update.revision_count, Some(2));
        assert_eq!(
            update.feedback.as_deref(),
            Some("Revision 2: the last plan went over the budget of 500. Look for cheaper hotels.")
        );
        assert!(update.hotel_info.is_none());
    }
}
