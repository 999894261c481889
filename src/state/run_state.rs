/// Run state definitions for tracking one archiver invocation
use std::fmt;

/// Represents where a run is in its single linear pass
///
/// `Idle -> Running -> Completed | CompletedWithFailures`. An empty run goes
/// straight from `Idle` to `Completed`. There is no retry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Run created, nothing attempted yet
    Idle,

    /// Books are being captured
    Running,

    /// Every attempted book succeeded (or there was nothing to do)
    Completed,

    /// At least one book failed
    CompletedWithFailures,
}

impl RunState {
    /// Returns true once the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::CompletedWithFailures)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Idle, Self::Completed)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::CompletedWithFailures)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::CompletedWithFailures => "completed_with_failures",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
