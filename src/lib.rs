//! Plan a travel itinerary with a small step-graph workflow engine.
//!
//! Steps read a shared state and return partial updates; the [`Runner`]
//! merges each update, follows the next edge (or asks a decision function
//! which branch to take), and stops at [`END`]. The [`travel`] module wires
//! web search and a chat model into a flights -> hotels -> activities ->
//! planner pipeline, optionally looping back when the plan is over budget.
//!
//! # Quick start
//!
//! ```rust
//! use trip_line::{step_fn, Ctx, Graph, GraphState, Runner, END};
//!
//! #[derive(Clone)]
//! struct State { n: i32 }
//!
//! impl GraphState for State {
//!     type Update = i32;
//!     fn apply(&mut self, n: i32) { self.n = n; }
//! }
//!
//! let graph = Graph::builder("demo")
//!     .register_step(step_fn("add_one", |s: &State, _ctx: &mut Ctx| s.n + 1))
//!     .add_conditional_edge(
//!         "add_one",
//!         |s: &State| if s.n < 3 { "again" } else { "done" },
//!         [("again", "add_one"), ("done", END)],
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut ctx = Ctx::new();
//! let result = Runner::new(graph).run(State { n: 0 }, &mut ctx).unwrap();
//! assert_eq!(result.n, 3);
//! assert_eq!(ctx.visits("add_one"), 3);
//! ```
//!
//! Planning a trip with no collaborators configured still produces a
//! (fallback) itinerary:
//!
//! ```rust
//! use trip_line::collab::Services;
//! use trip_line::travel::{TripPlanner, Variant};
//! use trip_line::{Ctx, TripState};
//!
//! let mut planner = TripPlanner::new(&Services::none(), Variant::default()).unwrap();
//! let trip = planner
//!     .plan(TripState::seed("Kyoto, Japan", "history"), &mut Ctx::new())
//!     .unwrap();
//! assert!(trip.itinerary_text().unwrap().contains("Kyoto, Japan"));
//! ```

mod ctx;
mod graph;
mod runner;
mod step;

pub mod collab;
pub mod config;
pub mod state;
pub mod tools;
pub mod travel;

pub use ctx::Ctx;
pub use graph::{Decision, END, Graph, GraphBuilder, GraphError};
pub use runner::{ErrorEvent, Runner, StepEvent};
pub use state::{Itinerary, TripState, TripUpdate};
pub use step::{FnStep, GraphState, Step, step_fn};
