//! The trip-planning state record and the partial updates steps return.

use crate::step::GraphState;
use serde::{Deserialize, Serialize};

/// What the planner produced, and whether it fits the budget.
///
/// Both variants keep the generated text so the caller always has a
/// best-effort itinerary, even when the revision loop gives up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Itinerary {
    Accepted(String),
    NeedsRevision(String),
}

impl Itinerary {
    pub fn text(&self) -> &str {
        match self {
            Self::Accepted(text) | Self::NeedsRevision(text) => text,
        }
    }

    pub fn needs_revision(&self) -> bool {
        matches!(self, Self::NeedsRevision(_))
    }
}

/// Trip-planning progress. Everything but the revision counter starts absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripState {
    pub destination: Option<String>,
    pub interests: Option<String>,
    /// Total budget in whole currency units.
    pub budget: Option<u32>,
    pub revision_count: u32,
    pub flight_info: Option<String>,
    pub hotel_info: Option<String>,
    pub activity_info: Option<String>,
    pub itinerary: Option<Itinerary>,
    /// Advice for the next hotel search, set by the revise step.
    pub feedback: Option<String>,
}

impl TripState {
    /// Seed state for one planning request.
    pub fn seed(destination: impl Into<String>, interests: impl Into<String>) -> Self {
        Self {
            destination: Some(destination.into()),
            interests: Some(interests.into()),
            ..Self::default()
        }
    }

    pub fn with_budget(mut self, budget: u32) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Only the caller-supplied fields: destination, interests and budget.
    /// Everything the steps write starts over.
    pub fn seed_only(self) -> Self {
        Self {
            destination: self.destination,
            interests: self.interests,
            budget: self.budget,
            ..Self::default()
        }
    }

    /// Itinerary text, if the planner has run.
    pub fn itinerary_text(&self) -> Option<&str> {
        self.itinerary.as_ref().map(Itinerary::text)
    }
}

/// The fields one step computed. Absent fields leave the state untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripUpdate {
    pub flight_info: Option<String>,
    pub hotel_info: Option<String>,
    pub activity_info: Option<String>,
    pub itinerary: Option<Itinerary>,
    pub revision_count: Option<u32>,
    pub feedback: Option<String>,
}

impl TripUpdate {
    pub fn flights(info: String) -> Self {
        Self {
            flight_info: Some(info),
            ..Self::default()
        }
    }

    pub fn hotels(info: String) -> Self {
        Self {
            hotel_info: Some(info),
            ..Self::default()
        }
    }

    pub fn activities(info: String) -> Self {
        Self {
            activity_info: Some(info),
            ..Self::default()
        }
    }

    pub fn itinerary(itinerary: Itinerary) -> Self {
        Self {
            itinerary: Some(itinerary),
            ..Self::default()
        }
    }

    pub fn revision(revision_count: u32, feedback: String) -> Self {
        Self {
            revision_count: Some(revision_count),
            feedback: Some(feedback),
            ..Self::default()
        }
    }
}

impl GraphState for TripState {
    type Update = TripUpdate;

    fn apply(&mut self, update: TripUpdate) {
        let TripUpdate {
            flight_info,
            hotel_info,
            activity_info,
            itinerary,
            revision_count,
            feedback,
        } = update;

        if flight_info.is_some() {
            self.flight_info = flight_info;
        }
        if hotel_info.is_some() {
            self.hotel_info = hotel_info;
        }
        if activity_info.is_some() {
            self.activity_info = activity_info;
        }
        if itinerary.is_some() {
            self.itinerary = itinerary;
        }
        // The counter only moves forward.
        if let Some(count) = revision_count {
            self.revision_count = self.revision_count.max(count);
        }
        if feedback.is_some() {
            self.feedback = feedback;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_sets_only_request_fields() {
        let state = TripState::seed("Lisbon", "food").with_budget(800);
        assert_eq!(state.destination.as_deref(), Some("Lisbon"));
        assert_eq!(state.interests.as_deref(), Some("food"));
        assert_eq!(state.budget, Some(800));
        assert_eq!(state.revision_count, 0);
        assert!(state.itinerary.is_none());
        assert!(state.feedback.is_none());
    }

    #[test]
    fn seed_only_drops_step_progress() {
        let mut state = TripState::seed("Lisbon", "food").with_budget(800);
        state.revision_count = 7;
        state.hotel_info = Some("Hotel A".into());
        state.itinerary = Some(Itinerary::NeedsRevision("old".into()));
        state.feedback = Some("cheaper".into());

        assert_eq!(
            state.seed_only(),
            TripState::seed("Lisbon", "food").with_budget(800)
        );
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut state = TripState::seed("Lisbon", "food");
        state.apply(TripUpdate::flights("TAP".into()));
        state.apply(TripUpdate::hotels("Hotel A".into()));

        assert_eq!(state.flight_info.as_deref(), Some("TAP"));
        assert_eq!(state.hotel_info.as_deref(), Some("Hotel A"));
        assert_eq!(state.destination.as_deref(), Some("Lisbon"));
    }

    #[test]
    fn revisit_overwrites_earlier_value() {
        let mut state = TripState::default();
        state.apply(TripUpdate::hotels("Hotel A".into()));
        state.apply(TripUpdate::hotels("Hostel B".into()));
        assert_eq!(state.hotel_info.as_deref(), Some("Hostel B"));
    }

    #[test]
    fn revision_count_never_goes_backwards() {
        let mut state = TripState::default();
        state.apply(TripUpdate::revision(2, "cheaper".into()));
        state.apply(TripUpdate::revision(1, "stale".into()));
        assert_eq!(state.revision_count, 2);
        assert_eq!(state.feedback.as_deref(), Some("stale"));
    }

    #[test]
    fn itinerary_text_covers_both_variants() {
        assert_eq!(Itinerary::Accepted("a".into()).text(), "a");
        assert_eq!(Itinerary::NeedsRevision("b".into()).text(), "b");
        assert!(Itinerary::NeedsRevision("b".into()).needs_revision());
        assert!(!Itinerary::Accepted("a".into()).needs_revision());
    }

    #[test]
    fn seed_deserializes_from_partial_json() {
        let state: TripState =
            serde_json::from_str(r#"{"destination":"Oslo","interests":"fjords","budget":1200}"#)
                .unwrap();
        assert_eq!(state.destination.as_deref(), Some("Oslo"));
        assert_eq!(state.budget, Some(1200));
        assert_eq!(state.revision_count, 0);
    }

    #[test]
    fn itinerary_serializes_with_status_tag() {
        let json = serde_json::to_value(Itinerary::NeedsRevision("x".into())).unwrap();
        assert_eq!(json, serde_json::json!({"status": "needs_revision", "text": "x"}));
    }
}
