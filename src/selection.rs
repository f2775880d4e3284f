//! Asset-type filters deciding which categories a scan includes.
//!
//! This is the headless equivalent of the asset-type checkbox row in the
//! original tools: an optional local JSON file narrows which categories are
//! considered, and a missing file means no filtering at all.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::AssetType;

/// Trait describing which asset types a scan should include.
pub trait TypeInclusion {
    /// Returns `true` when the asset type should be scanned.
    fn is_included(&self, asset_type: &AssetType) -> bool;
}

/// Asset types the original tools expose as filter checkboxes.
pub fn default_types() -> Vec<AssetType> {
    vec![
        AssetType::Set,
        AssetType::Layout,
        AssetType::Character,
        AssetType::Prop,
    ]
}

/// Configuration file layout for selecting asset types.
#[derive(Debug, Default, Deserialize)]
struct TypeSelectionFile {
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

/// Selection helper narrowing which asset types scans consider.
#[derive(Debug, Clone, Default)]
pub struct TypeSelection {
    include: Option<BTreeSet<String>>,
    exclude: BTreeSet<String>,
}

/// Errors that can occur while loading the selection configuration.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// Failed to read the selection file from disk.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// Failed to parse the JSON selection file.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
}

impl TypeSelection {
    /// Load configuration from the selection file if present.
    ///
    /// A missing file is not an error; it yields an unfiltered selection.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(SelectionError::Io {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        let file: TypeSelectionFile =
            serde_json::from_str(&contents).map_err(|err| SelectionError::Parse {
                path: path.to_path_buf(),
                source: err,
            })?;
        Ok(Self::from(file))
    }

    /// Determine whether an asset type passes the filter.
    pub fn is_included(&self, asset_type: &AssetType) -> bool {
        let name = asset_type.dir_name();
        if self.exclude.contains(name) {
            return false;
        }

        match &self.include {
            Some(include) => include.contains(name),
            None => true,
        }
    }

    /// Keep only the asset types that pass the filter.
    pub fn filter(&self, types: impl IntoIterator<Item = AssetType>) -> Vec<AssetType> {
        types
            .into_iter()
            .filter(|asset_type| self.is_included(asset_type))
            .collect()
    }

    #[cfg(test)]
    fn is_unfiltered(&self) -> bool {
        self.include.is_none() && self.exclude.is_empty()
    }
}

impl TypeInclusion for TypeSelection {
    fn is_included(&self, asset_type: &AssetType) -> bool {
        TypeSelection::is_included(self, asset_type)
    }
}

impl From<TypeSelectionFile> for TypeSelection {
    fn from(file: TypeSelectionFile) -> Self {
        let include = normalise_list(file.include);
        let exclude = normalise_list(file.exclude);

        Self {
            include: (!include.is_empty()).then_some(include),
            exclude,
        }
    }
}

/// Convert a list of raw category names into a sorted, de-duplicated set.
fn normalise_list(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}
