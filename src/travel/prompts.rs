//! Search queries, the planner prompt and the fallback itinerary.

use crate::collab::Prompt;
use crate::state::TripState;

fn destination(state: &TripState) -> &str {
    state.destination.as_deref().unwrap_or("unknown")
}

fn interests(state: &TripState) -> &str {
    state.interests.as_deref().unwrap_or("varied")
}

pub fn flights_query(state: &TripState) -> String {
    format!("Cheap flights to {} next month prices", destination(state))
}

/// After a revision the hotel search leans towards cheaper places.
pub fn hotels_query(state: &TripState) -> String {
    let destination = destination(state);
    match (&state.feedback, state.budget) {
        (None, _) => format!("Best budget hotels in {destination} near city center"),
        (Some(_), Some(budget)) => {
            format!("Cheapest budget hotels and hostels in {destination} under {budget} total")
        }
        (Some(_), None) => format!("Cheapest budget hotels and hostels in {destination}"),
    }
}

pub fn activities_query(state: &TripState) -> String {
    format!(
        "Top things to do in {} for someone who likes {}",
        destination(state),
        interests(state)
    )
}

/// `budget_rule` is the budget policy's instruction, when one applies.
///
/// Once the revise step has left feedback the conversation continues past the
/// first request: the previous plan comes back as the model's own turn,
/// followed by the feedback.
pub fn planner_prompt(state: &TripState, budget_rule: Option<String>) -> Prompt {
    let mut body = format!(
        "Create a 3-day itinerary for {}.\n\
         User Interests: {}\n\n\
         Flight Data: {}\n\
         Hotel Data: {}\n\
         Activity Data: {}\n\n\
         Format as a clean Day-by-Day Markdown guide with estimated costs.",
        destination(state),
        state.interests.as_deref().unwrap_or("none"),
        state.flight_info.as_deref().unwrap_or(""),
        state.hotel_info.as_deref().unwrap_or(""),
        state.activity_info.as_deref().unwrap_or(""),
    );
    if let Some(rule) = budget_rule {
        body.push_str("\n\n");
        body.push_str(&rule);
    }

    let mut prompt = Prompt::new()
        .system("You are an expert Travel Agent.")
        .user(body);

    // On a revision, replay the rejected plan and then the advice.
    if let Some(feedback) = &state.feedback {
        if let Some(previous) = state.itinerary_text() {
            prompt = prompt.assistant(previous);
        }
        prompt = prompt.user(format!("Note from the previous attempt: {feedback}"));
    }
    prompt
}

/// What the caller gets when no model could write the plan.
pub fn fallback_itinerary(state: &TripState, reason: Option<&str>) -> String {
    let destination = state.destination.as_deref().unwrap_or("your destination");
    let interests = state.interests.as_deref().unwrap_or("general interests");
    let mut text = format!(
        "# 3-Day Itinerary for {destination}\n\nUser interests: {interests}\n\n\
         (LLM not available - fallback itinerary.)"
    );
    if let Some(reason) = reason {
        text.push_str(&format!("\n\nPlanner error: {reason}"));
    }
    text
}
