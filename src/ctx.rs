use std::collections::HashMap;

/// Execution context for a run: where the runner has been and what the steps
/// had to say along the way.
pub struct Ctx {
    path: Vec<&'static str>,
    visits: HashMap<&'static str, usize>,
    log: Vec<String>,
}

impl Ctx {
    pub fn new() -> Self {
        Self {
            path: vec![],
            visits: HashMap::new(),
            log: vec![],
        }
    }

    /// Record that `step` is about to run.
    pub(crate) fn enter(&mut self, step: &'static str) {
        self.path.push(step);
        *self.visits.entry(step).or_insert(0) += 1;
    }

    /// Steps in the order they ran.
    pub fn path(&self) -> &[&'static str] {
        &self.path
    }

    /// How many times `step` ran.
    pub fn visits(&self, step: &str) -> usize {
        self.visits.get(step).copied().unwrap_or(0)
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::debug!(target: "trip_line::ctx", "{msg}");
        self.log.push(msg);
    }

    pub fn logs(&self) -> &[String] {
        &self.log
    }

    /// Forget everything, ready for another run.
    pub fn clear(&mut self) {
        self.path.clear();
        self.visits.clear();
        self.log.clear();
    }
}

impl Default for Ctx {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_tracks_path_and_visits() {
        let mut ctx = Ctx::new();
        ctx.enter("a");
        ctx.enter("b");
        ctx.enter("a");

        assert_eq!(ctx.path(), ["a", "b", "a"]);
        assert_eq!(ctx.visits("a"), 2);
        assert_eq!(ctx.visits("b"), 1);
        assert_eq!(ctx.visits("never"), 0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut ctx = Ctx::new();
        ctx.enter("a");
        ctx.log("hello");
        ctx.clear();

        assert!(ctx.path().is_empty());
        assert!(ctx.logs().is_empty());
        assert_eq!(ctx.visits("a"), 0);
    }
}
