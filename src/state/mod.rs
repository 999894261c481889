//! State module for tracking run progress
//!
//! # Components
//!
//! - `RunState`: Where a run is in its single pass (idle, running, completed)
//! - `RunProgress`: Per-invocation counters, failure list and timestamps

mod run_progress;
mod run_state;

// Re-export main types
pub use run_progress::RunProgress;
pub use run_state::RunState;
