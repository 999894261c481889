//! Run orchestration
//!
//! This module contains the sequential driver that takes a list of books and
//! pushes each one through the capture adapter, including:
//! - Per-book failure isolation
//! - The pause between books
//! - The single-book entry point and name filtering for explicit targets

mod pause;
mod runner;

pub use pause::{Pause, TokioPause};
pub use runner::{partition_names, resolve_single, NamePartition, Orchestrator, UnitCapture};

pub use crate::state::{RunProgress, RunState};
