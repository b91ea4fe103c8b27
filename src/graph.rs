use crate::step::{GraphState, Step};
use std::collections::HashMap;
use thiserror::Error;

/// Terminal marker. Route an edge or a branch here to finish the run.
pub const END: &str = "__end__";

// ---------------------------------------------------------------------------
// GraphError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("duplicate step name: {0}")]
    DuplicateStep(&'static str),
    #[error("unknown step: {0}")]
    UnknownStep(&'static str),
    #[error("step name is reserved: {0}")]
    ReservedName(&'static str),
    #[error("step '{0}' already has an outgoing edge")]
    ConflictingEdge(&'static str),
    #[error("step '{0}' has no outgoing edge")]
    DeadEnd(&'static str),
    #[error("graph missing entry step")]
    MissingEntry,
    #[error("decision after step '{from}' returned unknown branch '{key}'")]
    UnknownBranch {
        from: &'static str,
        key: &'static str,
    },
    #[error("max_steps ({max_steps}) exceeded (possible infinite loop) in graph {graph}")]
    MaxStepsExceeded {
        graph: &'static str,
        max_steps: usize,
    },
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Picks a branch key from the state a step just produced.
pub type Decision<S> = Box<dyn Fn(&S) -> &'static str + Send>;

pub(crate) enum Transition<S> {
    Fixed(&'static str),
    Conditional {
        decide: Decision<S>,
        branches: HashMap<&'static str, &'static str>,
    },
}

impl<S> Transition<S> {
    fn targets(&self) -> Vec<&'static str> {
        match self {
            Self::Fixed(to) => vec![*to],
            Self::Conditional { branches, .. } => branches.values().copied().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

pub struct GraphBuilder<S: GraphState> {
    name: &'static str,
    entry: Option<&'static str>,
    chain_last: Option<&'static str>,
    steps: HashMap<&'static str, Box<dyn Step<S>>>,
    step_order: Vec<&'static str>,
    edges: HashMap<&'static str, Transition<S>>,
    edge_order: Vec<&'static str>,
    error: Option<GraphError>,
}

impl<S: GraphState> GraphBuilder<S> {
    /// Keep the first construction error; `build()` reports it.
    fn fail(&mut self, err: GraphError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub fn register_step<T: Step<S>>(mut self, step: T) -> Self {
        let name = step.name();
        if name == END {
            self.fail(GraphError::ReservedName(END));
            return self;
        }
        if self.steps.contains_key(name) {
            self.fail(GraphError::DuplicateStep(name));
            return self;
        }
        self.steps.insert(name, Box::new(step));
        self.step_order.push(name);

        // The first registered step is the entry unless set_entry says otherwise.
        if self.entry.is_none() {
            self.entry = Some(name);
        }
        if self.chain_last.is_none() {
            self.chain_last = Some(name);
        }

        self
    }

    pub fn set_entry(mut self, step: &'static str) -> Self {
        self.entry = Some(step);
        self.chain_last = Some(step);
        self
    }

    /// Unconditional transition `from -> to`. `to` may be [`END`].
    pub fn add_edge(mut self, from: &'static str, to: &'static str) -> Self {
        self.insert_transition(from, Transition::Fixed(to));
        self.chain_last = Some(to);
        self
    }

    /// Chain the next step: current(chain_last) -> next
    pub fn then(self, next: &'static str) -> Self {
        match self.chain_last {
            Some(current) => self.add_edge(current, next),
            // No prior step; treat `next` as the entry
            None => self.set_entry(next),
        }
    }

    /// After `from` runs, `decide` picks a key and `branches` maps it to the
    /// next step (or [`END`]).
    pub fn add_conditional_edge<F, I>(mut self, from: &'static str, decide: F, branches: I) -> Self
    where
        F: Fn(&S) -> &'static str + Send + 'static,
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        self.insert_transition(
            from,
            Transition::Conditional {
                decide: Box::new(decide),
                branches: branches.into_iter().collect(),
            },
        );
        self
    }

    fn insert_transition(&mut self, from: &'static str, transition: Transition<S>) {
        if self.edges.contains_key(from) {
            self.fail(GraphError::ConflictingEdge(from));
            return;
        }
        self.edges.insert(from, transition);
        self.edge_order.push(from);
    }

    fn is_target(&self, name: &'static str) -> bool {
        name == END || self.steps.contains_key(name)
    }

    pub fn build(mut self) -> Result<Graph<S>, GraphError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        let entry = self.entry.ok_or(GraphError::MissingEntry)?;
        if !self.steps.contains_key(entry) {
            return Err(GraphError::UnknownStep(entry));
        }

        // Every edge must start at a registered step and land on one (or END).
        for &from in &self.edge_order {
            if !self.steps.contains_key(from) {
                return Err(GraphError::UnknownStep(from));
            }
            if let Some(target) = self.edges[from]
                .targets()
                .into_iter()
                .find(|t| !self.is_target(*t))
            {
                return Err(GraphError::UnknownStep(target));
            }
        }

        for &name in &self.step_order {
            if !self.edges.contains_key(name) {
                return Err(GraphError::DeadEnd(name));
            }
        }

        Ok(Graph {
            name: self.name,
            entry,
            steps: self.steps,
            edges: self.edges,
        })
    }
}

// ---------------------------------------------------------------------------
// Graph (validated, only constructed via build())
// ---------------------------------------------------------------------------

pub struct Graph<S: GraphState> {
    name: &'static str,
    entry: &'static str,
    steps: HashMap<&'static str, Box<dyn Step<S>>>,
    edges: HashMap<&'static str, Transition<S>>,
}

impl<S: GraphState> Graph<S> {
    pub fn builder(name: &'static str) -> GraphBuilder<S> {
        GraphBuilder {
            name,
            entry: None,
            chain_last: None,
            steps: HashMap::new(),
            step_order: Vec::new(),
            edges: HashMap::new(),
            edge_order: Vec::new(),
            error: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn contains(&self, step: &str) -> bool {
        self.steps.contains_key(step)
    }

    // --- stuff the runner uses (keep pub(crate)) ---
    pub(crate) fn entry(&self) -> &'static str {
        self.entry
    }

    pub(crate) fn step_mut(&mut self, name: &'static str) -> Option<&mut Box<dyn Step<S>>> {
        self.steps.get_mut(name)
    }

    /// Resolve where to go after `from`, given the state it left behind.
    pub(crate) fn next(&self, from: &'static str, state: &S) -> Result<&'static str, GraphError> {
        match self.edges.get(from) {
            Some(Transition::Fixed(to)) => Ok(*to),
            Some(Transition::Conditional { decide, branches }) => {
                let key = decide(state);
                branches
                    .get(key)
                    .copied()
                    .ok_or(GraphError::UnknownBranch { from, key })
            }
            None => Err(GraphError::DeadEnd(from)),
        }
    }
}
