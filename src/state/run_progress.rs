use crate::state::RunState;
use chrono::{DateTime, Utc};

/// Counters for one invocation
///
/// Created when a run starts, mutated only by the orchestrator, and dropped
/// when the run ends. Nothing here is ever written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RunProgress {
    /// Number of books targeted by the run
    pub total_units: usize,

    /// Books whose attempt has finished, successful or not
    pub completed_units: usize,

    /// Book currently being captured
    pub current_unit: Option<String>,

    /// Failed books in failure order
    pub failed_units: Vec<String>,

    /// PDFs written during the run
    pub items_captured: u32,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,

    state: RunState,
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl RunProgress {
    /// Creates an idle run with all counters at zero
    pub fn new() -> Self {
        Self {
            total_units: 0,
            completed_units: 0,
            current_unit: None,
            failed_units: Vec::new(),
            items_captured: 0,
            started_at: None,
            finished_at: None,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Moves the run to `Running` over `total` books
    pub fn begin(&mut self, total: usize) {
        if self.transition(RunState::Running) {
            self.total_units = total;
            self.started_at = Some(Utc::now());
        }
    }

    /// Marks `unit` as the book being captured
    pub fn begin_unit(&mut self, unit: &str) {
        self.current_unit = Some(unit.to_string());
    }

    /// Counts one PDF written
    pub fn record_item(&mut self) {
        self.items_captured += 1;
    }

    /// Finishes the current book successfully
    pub fn record_success(&mut self) {
        self.completed_units += 1;
    }

    /// Finishes the current book as failed
    pub fn record_failure(&mut self, unit: &str) {
        if !self.failed_units.iter().any(|u| u == unit) {
            self.failed_units.push(unit.to_string());
        }
        self.completed_units += 1;
    }

    /// Ends the run, choosing the terminal state from the failure list
    pub fn finish(&mut self) {
        let terminal = if self.failed_units.is_empty() {
            RunState::Completed
        } else {
            RunState::CompletedWithFailures
        };
        if self.transition(terminal) {
            self.current_unit = None;
            self.finished_at = Some(Utc::now());
        }
    }

    /// Books attempted without failure
    pub fn succeeded_units(&self) -> usize {
        self.completed_units.saturating_sub(self.failed_units.len())
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_units.is_empty()
    }

    /// True for a run that had nothing to do
    pub fn is_empty_run(&self) -> bool {
        self.total_units == 0
    }

    /// Wall-clock duration of a finished run
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    fn transition(&mut self, next: RunState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::warn!("Ignoring invalid run transition {} -> {}", self.state, next);
            return false;
        }
        self.state = next;
        true
    }
}
