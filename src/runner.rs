use crate::graph::{END, Graph, GraphError};
use crate::step::GraphState;
use crate::Ctx;
use std::time::{Duration, Instant};

/// Passed to the `on_step` hook after each step, once the next hop is known.
pub struct StepEvent<'a> {
    pub step: &'a str,
    /// Where the runner goes next; [`END`] when the run is over.
    pub next: &'a str,
    pub duration: Duration,
    pub step_number: usize,
}

/// Passed to the `on_error` hook when routing fails or a limit is exceeded.
pub struct ErrorEvent<'a> {
    pub step: &'a str,
    pub error: &'a GraphError,
    pub step_number: usize,
}

pub struct Runner<S: GraphState> {
    graph: Graph<S>,
    max_steps: usize,
    on_step: Option<Box<dyn FnMut(&StepEvent)>>,
    on_error: Option<Box<dyn FnMut(&ErrorEvent)>>,
}

impl<S: GraphState> Runner<S> {
    pub fn new(graph: Graph<S>) -> Self {
        Self {
            graph,
            max_steps: 10_000,
            on_step: None,
            on_error: None,
        }
    }

    pub fn graph(&self) -> &Graph<S> {
        &self.graph
    }

    /// Prevent accidental infinite loops.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Register a callback that fires after each step.
    pub fn on_step(mut self, cb: impl FnMut(&StepEvent) + 'static) -> Self {
        self.on_step = Some(Box::new(cb));
        self
    }

    /// Register a callback that fires when routing fails or a limit is exceeded.
    pub fn on_error(mut self, cb: impl FnMut(&ErrorEvent) + 'static) -> Self {
        self.on_error = Some(Box::new(cb));
        self
    }

    /// Set both hooks to log step transitions and errors through `tracing`.
    pub fn with_tracing(self) -> Self {
        let graph = self.graph.name();
        self.on_step(move |e| {
            tracing::info!(
                graph,
                step = e.step,
                next = e.next,
                step_number = e.step_number,
                elapsed_ms = e.duration.as_millis() as u64,
                "step finished"
            );
        })
        .on_error(move |e| {
            tracing::error!(
                graph,
                step = e.step,
                step_number = e.step_number,
                error = %e.error,
                "run aborted"
            );
        })
    }

    fn report(&mut self, step: &str, error: &GraphError, step_number: usize) {
        if let Some(cb) = &mut self.on_error {
            cb(&ErrorEvent {
                step,
                error,
                step_number,
            });
        }
    }

    pub fn run(&mut self, mut state: S, ctx: &mut Ctx) -> Result<S, GraphError> {
        let mut current = self.graph.entry();
        let mut step_number: usize = 0;

        for _ in 0..self.max_steps {
            step_number += 1;

            let step = self
                .graph
                .step_mut(current)
                .ok_or(GraphError::UnknownStep(current))?;

            ctx.enter(current);
            let start = Instant::now();
            let update = step.run(&state, ctx);
            let duration = start.elapsed();

            state.apply(update);

            let next = match self.graph.next(current, &state) {
                Ok(next) => next,
                Err(err) => {
                    self.report(current, &err, step_number);
                    return Err(err);
                }
            };
            tracing::debug!(from = current, to = next, "edge resolved");

            if let Some(cb) = &mut self.on_step {
                cb(&StepEvent {
                    step: current,
                    next,
                    duration,
                    step_number,
                });
            }

            if next == END {
                return Ok(state);
            }
            current = next;
        }

        let err = GraphError::MaxStepsExceeded {
            graph: self.graph.name(),
            max_steps: self.max_steps,
        };
        self.report(current, &err, step_number);
        Err(err)
    }
}
