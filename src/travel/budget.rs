//! Deciding whether a generated plan blew the budget.
//!
//! The model answers in free text, so this is a heuristic: we ask it to say a
//! fixed phrase when the plan doesn't fit and then look for that phrase. It
//! never computes a cost. Swap in another [`BudgetPolicy`] if the model can
//! return something structured.

/// The phrase the planner is told to use when a plan is over budget.
pub const TOO_EXPENSIVE: &str = "TOO EXPENSIVE";

pub trait BudgetPolicy: Send {
    /// Extra instruction appended to the planner prompt.
    fn instruction(&self, budget: u32) -> String;

    /// Whether the generated itinerary signals it can't fit `budget`.
    fn over_budget(&self, itinerary: &str, budget: u32) -> bool;
}

/// Looks for a sentinel phrase anywhere in the reply. Case-sensitive.
#[derive(Clone, Debug)]
pub struct SentinelPolicy {
    phrase: &'static str,
}

impl SentinelPolicy {
    pub fn new(phrase: &'static str) -> Self {
        Self { phrase }
    }
}

impl Default for SentinelPolicy {
    fn default() -> Self {
        Self::new(TOO_EXPENSIVE)
    }
}

impl BudgetPolicy for SentinelPolicy {
    fn instruction(&self, budget: u32) -> String {
        format!(
            "The traveller's total budget is {budget}. If the trip cannot be done within \
             that budget, start your answer with \"{}\" and explain what costs too much.",
            self.phrase
        )
    }

    fn over_budget(&self, itinerary: &str, _budget: u32) -> bool {
        itinerary.contains(self.phrase)
    }
}
