//! Human-readable progress reporting
//!
//! Every function here is pure formatting over catalog and run snapshots. The
//! CLI prints the pre-run status and the summary; the orchestrator logs the
//! per-book and per-chapter lines through `tracing`.

use crate::catalog::{Catalog, ItemRange};
use crate::resume::{materialized_in_order, pending_units, OutputSnapshot};
use crate::state::RunProgress;
use std::time::Duration;

/// Name of the binary, used in remediation commands
pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Pre-run status: totals, what is already on disk, what remains
pub fn format_status(catalog: &Catalog, snapshot: &OutputSnapshot) -> String {
    let done = materialized_in_order(catalog, snapshot);
    let pending = pending_units(catalog, snapshot);

    let mut out = String::from("Book download status:\n");
    out.push_str(&format!("   Total books: {}\n", catalog.len()));
    if done.is_empty() {
        out.push_str("   Already downloaded: 0\n");
    } else {
        out.push_str(&format!(
            "   Already downloaded: {} ({})\n",
            done.len(),
            done.join(", ")
        ));
    }
    out.push_str(&format!("   Remaining to download: {}", pending.len()));
    out
}

/// Shown when every book is already materialized
pub fn format_nothing_to_do() -> String {
    "All books are already downloaded!".to_string()
}

/// The list of books about to be captured, under a heading
pub fn format_run_plan(heading: &str, targets: &[String]) -> String {
    format!("{}\n{}\n{}", heading, targets.join(", "), rule())
}

/// Start of one book, with its position in the run
pub fn format_unit_start(unit: &str, position: usize, total: usize) -> String {
    format!("Downloading {} ({}/{})...", unit, position, total)
}

/// Start of one chapter
pub fn format_item_start(unit: &str, item: u32, range: &ItemRange) -> String {
    if range.is_single() {
        format!("Downloading {} chapter {}...", unit, item)
    } else {
        format!(
            "Downloading {} chapter {} ({}/{})...",
            unit,
            item,
            item.saturating_sub(range.start) + 1,
            range.len()
        )
    }
}

pub fn format_unit_success(unit: &str, items: usize) -> String {
    format!("{} completed successfully ({} chapters)", unit, items)
}

pub fn format_unit_failure(unit: &str, reason: &str) -> String {
    format!("{} failed: {}", unit, reason)
}

/// Notice printed before the pause between books
pub fn format_delay(delay: Duration) -> String {
    let millis = delay.as_millis();
    if millis % 1000 == 0 {
        let secs = millis / 1000;
        let unit = if secs == 1 { "second" } else { "seconds" };
        format!("Waiting {} {} before next download...", secs, unit)
    } else {
        format!("Waiting {}ms before next download...", millis)
    }
}

/// Names that did not match any book, followed by the valid names
pub fn format_invalid_names(invalid: &[String], catalog: &Catalog) -> String {
    format!(
        "Invalid book names: {}\nValid book names: {}",
        invalid.join(", "),
        catalog.list_all_unit_names().join(", ")
    )
}

pub fn format_no_valid_units() -> String {
    "No valid books to download".to_string()
}

/// Command that re-captures a single book
pub fn retry_command(unit: &str) -> String {
    format!("{} book {}", PROGRAM_NAME, unit)
}

/// Post-run summary with a remediation command for each failed book
pub fn format_summary(progress: &RunProgress) -> String {
    let mut lines = vec![
        rule(),
        "DOWNLOAD SUMMARY".to_string(),
        rule(),
        format!("Total books processed: {}", progress.total_units),
        format!("Successfully downloaded: {}", progress.succeeded_units()),
        format!("Failed downloads: {}", progress.failed_units.len()),
        format!("Chapters saved: {}", progress.items_captured),
    ];

    if let Some(elapsed) = progress.elapsed() {
        lines.push(format!("Elapsed: {}s", elapsed.num_seconds()));
    }

    if progress.has_failures() {
        lines.push(String::new());
        lines.push("Failed books:".to_string());
        for unit in &progress.failed_units {
            lines.push(format!("   - {}", unit));
        }
        lines.push(String::new());
        lines.push("To retry failed downloads, run:".to_string());
        for unit in &progress.failed_units {
            lines.push(format!("   {}", retry_command(unit)));
        }
    } else {
        lines.push(String::new());
        lines.push("All books downloaded successfully!".to_string());
    }

    lines.join("\n")
}
