//! Resumability: which books still need capturing
//!
//! There is no progress ledger. A book counts as materialized as soon as a
//! directory with its name exists under the output root, whatever that
//! directory holds. The classification functions are pure over an
//! [`OutputSnapshot`], so tests can hand in a synthetic listing.

use crate::catalog::Catalog;
use std::collections::BTreeSet;
use std::io;
use std::path::Path;

/// Names of the directories directly under the output root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSnapshot {
    directories: BTreeSet<String>,
}

impl OutputSnapshot {
    /// Reads the directory listing of `root`
    ///
    /// A missing root yields an empty snapshot: nothing has been captured yet.
    /// Symlinks are followed, so a linked book directory counts. Plain files
    /// and entries with non UTF-8 names are ignored.
    pub fn scan(root: &Path) -> io::Result<Self> {
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Output root {} does not exist yet", root.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        let mut directories = BTreeSet::new();
        for entry in entries {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                directories.insert(name.to_string());
            }
        }

        tracing::debug!(
            "Scanned {}: {} directories",
            root.display(),
            directories.len()
        );
        Ok(Self { directories })
    }

    /// Builds a snapshot from directory names, without touching the filesystem
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            directories: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.directories.contains(name)
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}

/// Books whose output directory exists
///
/// Directories that don't match a catalog book are ignored.
pub fn materialized_units(catalog: &Catalog, snapshot: &OutputSnapshot) -> BTreeSet<String> {
    catalog
        .units()
        .filter(|unit| snapshot.contains(&unit.name))
        .map(|unit| unit.name.clone())
        .collect()
}

/// Books still to capture, in catalog order
pub fn pending_units(catalog: &Catalog, snapshot: &OutputSnapshot) -> Vec<String> {
    catalog
        .units()
        .filter(|unit| !snapshot.contains(&unit.name))
        .map(|unit| unit.name.clone())
        .collect()
}

/// Books already captured, in catalog order
pub fn materialized_in_order(catalog: &Catalog, snapshot: &OutputSnapshot) -> Vec<String> {
    catalog
        .units()
        .filter(|unit| snapshot.contains(&unit.name))
        .map(|unit| unit.name.clone())
        .collect()
}
