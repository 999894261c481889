//! Catalog of books and their chapter counts
//!
//! This module provides:
//! - The fixed, ordered book table (two groups: Old and New Testament)
//! - Name normalization and lookup
//! - Chapter range resolution for a single-book invocation
//!
//! # Example
//!
//! ```
//! use commentary_archiver::catalog::Catalog;
//!
//! let catalog = Catalog::standard();
//! let unit = catalog.lookup("Song of Solomon").unwrap();
//! assert_eq!(unit.name, "song-of-solomon");
//! assert_eq!(unit.item_count, 8);
//! ```

mod table;

pub use table::{UnitGroup, NEW_TESTAMENT, OLD_TESTAMENT, STANDARD_GROUPS};

use crate::CatalogError;
use std::collections::HashMap;

/// One book: a normalized name and its number of chapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionUnit {
    /// Lowercase, hyphenated name (e.g. "1-samuel")
    pub name: String,

    /// Number of chapters, always at least 1
    pub item_count: u32,
}

/// Inclusive, 1-based chapter range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRange {
    pub start: u32,
    pub end: u32,
}

impl ItemRange {
    /// Iterates the chapter numbers in increasing order
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    /// Number of chapters in the range; zero when `start > end`
    pub fn len(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

/// The ordered book catalog
///
/// Built once at startup and never mutated. Book order is the concatenation
/// of the groups, each in table order.
#[derive(Debug, Clone)]
pub struct Catalog {
    groups: Vec<(String, Vec<CollectionUnit>)>,
    index: HashMap<String, (usize, usize)>,
}

impl Catalog {
    /// Builds the standard 66-book catalog
    pub fn standard() -> Self {
        // The static table is known to be valid; see test_standard_table_is_valid.
        Self::build(&STANDARD_GROUPS)
    }

    /// Builds a catalog from arbitrary groups, validating the table
    ///
    /// # Returns
    ///
    /// * `Ok(Catalog)` - The table is non-empty, every name is normalized and
    ///   unique, and every chapter count is positive
    /// * `Err(CatalogError::InvalidTable)` - Otherwise
    pub fn new(groups: &[UnitGroup]) -> Result<Self, CatalogError> {
        validate_table(groups)?;
        Ok(Self::build(groups))
    }

    fn build(groups: &[UnitGroup]) -> Self {
        let mut built = Vec::with_capacity(groups.len());
        let mut index = HashMap::new();

        for (g, group) in groups.iter().enumerate() {
            let units: Vec<CollectionUnit> = group
                .units
                .iter()
                .enumerate()
                .map(|(u, (name, count))| {
                    index.insert((*name).to_string(), (g, u));
                    CollectionUnit {
                        name: (*name).to_string(),
                        item_count: *count,
                    }
                })
                .collect();
            built.push((group.name.to_string(), units));
        }

        Self {
            groups: built,
            index,
        }
    }

    /// Returns every book name in canonical order
    pub fn list_all_unit_names(&self) -> Vec<String> {
        self.units().map(|u| u.name.clone()).collect()
    }

    /// Iterates every book in canonical order
    pub fn units(&self) -> impl Iterator<Item = &CollectionUnit> {
        self.groups.iter().flat_map(|(_, units)| units.iter())
    }

    /// Group names with their books, in canonical order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[CollectionUnit])> {
        self.groups
            .iter()
            .map(|(name, units)| (name.as_str(), units.as_slice()))
    }

    /// Looks up a book by raw name after normalizing it
    ///
    /// "Song of Solomon", "song-of-solomon" and "  SONG  of solomon " all
    /// resolve to the same book.
    pub fn lookup(&self, raw_name: &str) -> Option<&CollectionUnit> {
        let normalized = normalize_name(raw_name);
        self.index
            .get(&normalized)
            .map(|&(g, u)| &self.groups[g].1[u])
    }

    /// Returns true if the raw name resolves to a book
    pub fn contains(&self, raw_name: &str) -> bool {
        self.lookup(raw_name).is_some()
    }

    /// Number of books in the catalog
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Resolves the chapters to capture for one book
///
/// With no explicit chapter the full range `[1, item_count]` is returned.
/// An explicit chapter must be an integer within `1..=item_count` and yields a
/// single-chapter range.
pub fn item_range(unit: &CollectionUnit, explicit: Option<&str>) -> Result<ItemRange, CatalogError> {
    let Some(raw) = explicit else {
        return Ok(ItemRange {
            start: 1,
            end: unit.item_count,
        });
    };

    let invalid = || CatalogError::InvalidItemIndex {
        unit: unit.name.clone(),
        raw: raw.to_string(),
        max: unit.item_count,
    };

    let index: u32 = raw.trim().parse().map_err(|_| invalid())?;
    if index < 1 || index > unit.item_count {
        return Err(invalid());
    }

    Ok(ItemRange {
        start: index,
        end: index,
    })
}

/// Normalizes a book name: lowercase, whitespace runs become a single hyphen
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn validate_table(groups: &[UnitGroup]) -> Result<(), CatalogError> {
    let mut seen = HashMap::new();

    for group in groups {
        for (name, count) in group.units {
            if name.is_empty() || normalize_name(name) != *name {
                return Err(CatalogError::InvalidTable(format!(
                    "book name '{}' in {} is not normalized",
                    name, group.name
                )));
            }
            if *count == 0 {
                return Err(CatalogError::InvalidTable(format!(
                    "book '{}' must have at least one chapter",
                    name
                )));
            }
            if let Some(previous) = seen.insert(*name, group.name) {
                return Err(CatalogError::InvalidTable(format!(
                    "book '{}' appears in both {} and {}",
                    name, previous, group.name
                )));
            }
        }
    }

    if seen.is_empty() {
        return Err(CatalogError::InvalidTable(
            "catalog has no books".to_string(),
        ));
    }

    Ok(())
}
