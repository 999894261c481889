//! Sequential run driver
//!
//! Books are captured strictly one at a time, chapters within a book in
//! increasing order. A failing book is recorded and the run moves on; a fixed
//! pause separates consecutive books.

use crate::capture::{BrowsingSession, CaptureAdapter, CapturedItem};
use crate::catalog::{item_range, normalize_name, Catalog, CollectionUnit, ItemRange};
use crate::orchestrator::Pause;
use crate::report;
use crate::state::RunProgress;
use crate::{ArchiveError, CatalogError};
use std::time::Duration;

/// Caller-supplied names split into known books and everything else
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePartition {
    /// Normalized book names in caller order, first occurrence only
    pub valid: Vec<String>,

    /// Names that matched no book, as given
    pub invalid: Vec<String>,
}

/// Splits raw names into valid and invalid book names
///
/// Valid names are normalized through the catalog and keep the caller's
/// order. A book named twice is kept once so it is attempted at most once.
pub fn partition_names(catalog: &Catalog, raw_names: &[String]) -> NamePartition {
    let mut partition = NamePartition::default();

    for raw in raw_names {
        match catalog.lookup(raw) {
            Some(unit) if partition.valid.contains(&unit.name) => {
                tracing::debug!("Ignoring repeated book {}", unit.name);
            }
            Some(unit) => partition.valid.push(unit.name.clone()),
            None => partition.invalid.push(raw.clone()),
        }
    }

    partition
}

/// Resolves the book and chapter range of a single-book invocation
///
/// Fails with `UnknownUnit` or `InvalidItemIndex` without touching the network.
pub fn resolve_single<'c>(
    catalog: &'c Catalog,
    raw_name: &str,
    raw_item: Option<&str>,
) -> Result<(&'c CollectionUnit, ItemRange), CatalogError> {
    let unit = catalog
        .lookup(raw_name)
        .ok_or_else(|| CatalogError::UnknownUnit {
            name: normalize_name(raw_name),
        })?;
    let range = item_range(unit, raw_item)?;
    Ok((unit, range))
}

/// Chapters written for one book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCapture {
    pub unit: String,
    pub range: ItemRange,
    pub items: Vec<CapturedItem>,
}

/// Drives books through the capture adapter one at a time
pub struct Orchestrator<'a, S, P> {
    catalog: &'a Catalog,
    adapter: &'a CaptureAdapter,
    session: &'a S,
    pause: P,
    delay: Duration,
}

impl<'a, S: BrowsingSession, P: Pause> Orchestrator<'a, S, P> {
    /// Creates an orchestrator
    ///
    /// # Arguments
    ///
    /// * `catalog` - Book table used to resolve names and chapter counts
    /// * `adapter` - Captures individual chapters
    /// * `session` - Browser session shared by every capture
    /// * `pause` - Waits between books
    /// * `delay` - How long to wait between books
    pub fn new(
        catalog: &'a Catalog,
        adapter: &'a CaptureAdapter,
        session: &'a S,
        pause: P,
        delay: Duration,
    ) -> Self {
        Self {
            catalog,
            adapter,
            session,
            pause,
            delay,
        }
    }

    /// Captures every chapter of every target book, in order
    ///
    /// Never fails: a book that cannot be captured is appended to
    /// `failed_units` and the run continues with the next one. An empty
    /// target list returns a completed run without attempting anything.
    pub async fn run(&self, targets: &[String]) -> RunProgress {
        let mut progress = RunProgress::new();

        if targets.is_empty() {
            tracing::debug!("No books to capture");
            progress.finish();
            return progress;
        }

        progress.begin(targets.len());
        let total = targets.len();

        for (index, unit_name) in targets.iter().enumerate() {
            progress.begin_unit(unit_name);
            tracing::info!("{}", report::format_unit_start(unit_name, index + 1, total));

            let mut captured = Vec::new();
            let outcome = self.capture_named_unit(unit_name, &mut captured).await;
            for _ in &captured {
                progress.record_item();
            }

            match outcome {
                Ok(()) => {
                    tracing::info!("{}", report::format_unit_success(unit_name, captured.len()));
                    progress.record_success();
                }
                Err(e) => {
                    tracing::error!("{}", report::format_unit_failure(unit_name, &e.to_string()));
                    progress.record_failure(unit_name);
                }
            }

            if index + 1 < total {
                tracing::info!("{}", report::format_delay(self.delay));
                self.pause.pause(self.delay).await;
            }
        }

        progress.finish();
        progress
    }

    /// Captures a caller-chosen subset of books, in the caller's order
    ///
    /// Unknown names are reported and skipped. If nothing valid remains the
    /// result is an empty, completed run.
    pub async fn run_specific(&self, raw_names: &[String]) -> RunProgress {
        let partition = partition_names(self.catalog, raw_names);

        if !partition.invalid.is_empty() {
            tracing::warn!(
                "{}",
                report::format_invalid_names(&partition.invalid, self.catalog)
            );
        }

        if partition.valid.is_empty() {
            tracing::warn!("{}", report::format_no_valid_units());
            let mut progress = RunProgress::new();
            progress.finish();
            return progress;
        }

        tracing::info!(
            "{}",
            report::format_run_plan(
                &format!("Downloading {} specific books:", partition.valid.len()),
                &partition.valid
            )
        );

        self.run(&partition.valid).await
    }

    /// Captures one book, or a single chapter of it
    ///
    /// Unlike [`run`](Self::run), a failure here is returned to the caller.
    /// Name and chapter are validated before any page is loaded.
    pub async fn run_single(
        &self,
        raw_name: &str,
        raw_item: Option<&str>,
    ) -> Result<UnitCapture, ArchiveError> {
        let (unit, range) = resolve_single(self.catalog, raw_name, raw_item)?;

        let mut items = Vec::new();
        self.capture_unit(unit, range, &mut items).await?;

        Ok(UnitCapture {
            unit: unit.name.clone(),
            range,
            items,
        })
    }

    async fn capture_named_unit(
        &self,
        unit_name: &str,
        captured: &mut Vec<CapturedItem>,
    ) -> Result<(), ArchiveError> {
        let unit = self
            .catalog
            .lookup(unit_name)
            .ok_or_else(|| CatalogError::UnknownUnit {
                name: unit_name.to_string(),
            })?;
        let range = item_range(unit, None)?;
        self.capture_unit(unit, range, captured).await
    }

    /// Captures `range` of `unit`, stopping at the first failed chapter
    ///
    /// Chapters captured before a failure stay in `captured`.
    async fn capture_unit(
        &self,
        unit: &CollectionUnit,
        range: ItemRange,
        captured: &mut Vec<CapturedItem>,
    ) -> Result<(), ArchiveError> {
        let base_url = self.adapter.base_url(&unit.name);

        for item in range.iter() {
            tracing::info!("{}", report::format_item_start(&unit.name, item, &range));
            let saved = self
                .adapter
                .capture_item(self.session, &unit.name, &base_url, item)
                .await?;
            captured.push(saved);
        }

        Ok(())
    }
}
