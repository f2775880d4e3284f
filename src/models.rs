//! Catalog data model shared by scanning and resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::project::ProjectLayout;
use crate::shot::ShotContext;

/// Which half of the project tree an operation reads: the work-in-progress
/// scratch area or the reviewed publish area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectArea {
    /// In-flight scene files, saved but not yet reviewed.
    Wip,
    /// Approved files, the source of truth for downstream departments.
    Publish,
}

impl ProjectArea {
    /// Stable lowercase name used on the command line and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ProjectArea::Wip => "wip",
            ProjectArea::Publish => "publish",
        }
    }
}

impl fmt::Display for ProjectArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectArea {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "wip" => Ok(ProjectArea::Wip),
            "publish" => Ok(ProjectArea::Publish),
            other => Err(format!("unknown project area {other:?}, expected wip or publish")),
        }
    }
}

/// Category of a logical asset, fixing which convention subtree holds it.
///
/// `Character` and `Layout` are shot-scoped: their published output lives in
/// the cache directory of a shot rather than the global assets tree, and
/// scanning them requires a [`ShotContext`]. Every other category is global.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetType {
    /// Set dressing, published per project.
    Set,
    /// Prop geometry and caches, published per project.
    Prop,
    /// Character animation caches, published per shot.
    Character,
    /// Layout (camera) caches, published per shot.
    Layout,
    /// Any other category directory found under the assets tree.
    Custom(String),
}

impl AssetType {
    /// Parse a category directory name into a known type.
    pub fn parse(name: &str) -> Self {
        match name {
            "set" => AssetType::Set,
            "prop" => AssetType::Prop,
            "character" => AssetType::Character,
            "layout" => AssetType::Layout,
            other => AssetType::Custom(other.to_string()),
        }
    }

    /// Directory name of the category under the convention tree.
    pub fn dir_name(&self) -> &str {
        match self {
            AssetType::Set => "set",
            AssetType::Prop => "prop",
            AssetType::Character => "character",
            AssetType::Layout => "layout",
            AssetType::Custom(name) => name,
        }
    }

    /// Shot-scoped types live under the sequence tree and need a shot
    /// context to scan.
    pub fn is_shot_scoped(&self) -> bool {
        matches!(self, AssetType::Character | AssetType::Layout)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A logical asset regardless of version: its category plus base name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetIdentity {
    /// Category the asset belongs to.
    pub asset_type: AssetType,
    /// Version-stripped base name (for global assets, the directory name).
    pub base_name: String,
}

impl AssetIdentity {
    /// Build an identity from a category and base name.
    pub fn new(asset_type: AssetType, base_name: impl Into<String>) -> Self {
        Self {
            asset_type,
            base_name: base_name.into(),
        }
    }

    /// Display label in `<type>/<name>` form, as shown in asset lists.
    pub fn label(&self) -> String {
        format!("{}/{}", self.asset_type, self.base_name)
    }

    /// Parse a `<type>/<name>` label back into an identity.
    pub fn parse_label(label: &str) -> Option<Self> {
        let (type_name, base_name) = label.split_once('/')?;
        if type_name.is_empty() || base_name.is_empty() {
            return None;
        }
        Some(Self::new(AssetType::parse(type_name), base_name))
    }
}

impl fmt::Display for AssetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.asset_type, self.base_name)
    }
}

/// One concrete file belonging to an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetVersion {
    /// File name as found on disk, used as the version label.
    pub file_name: String,
    /// Extracted version number; 0 for unversioned files.
    pub number: u32,
    /// Original `v<digits>` text when the filename carried one.
    pub tag: Option<String>,
    /// Path relative to the asset's convention root directory.
    pub relative_path: PathBuf,
}

impl AssetVersion {
    /// Label shown in version lists and accepted back by resolution.
    pub fn label(&self) -> &str {
        &self.file_name
    }
}

/// Immutable snapshot of the assets and versions found by one scan.
///
/// A catalog is a derived, disposable view of the filesystem at scan time. It
/// records the root, layout and shot it was built from so resolution can
/// reconstruct absolute paths without taking any path fragment from callers.
/// Rebuild it after anything changes on disk.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    area: ProjectArea,
    layout: ProjectLayout,
    shot: Option<ShotContext>,
    entries: BTreeMap<AssetIdentity, Vec<AssetVersion>>,
}

impl Catalog {
    pub(crate) fn new(
        root: PathBuf,
        area: ProjectArea,
        layout: ProjectLayout,
        shot: Option<ShotContext>,
        entries: BTreeMap<AssetIdentity, Vec<AssetVersion>>,
    ) -> Self {
        Self {
            root,
            area,
            layout,
            shot,
            entries,
        }
    }

    /// Project root the catalog was scanned from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Area (wip or publish) the catalog was scanned from.
    pub fn area(&self) -> ProjectArea {
        self.area
    }

    /// Directory convention the catalog was scanned with.
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Shot context supplied to the scan, if any.
    pub fn shot(&self) -> Option<&ShotContext> {
        self.shot.as_ref()
    }

    /// Iterate the identities in deterministic order.
    pub fn identities(&self) -> impl Iterator<Item = &AssetIdentity> {
        self.entries.keys()
    }

    /// Display labels (`<type>/<name>`) of every asset, sorted.
    pub fn asset_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.entries.keys().map(AssetIdentity::label).collect();
        labels.sort();
        labels
    }

    /// Versions of one asset, newest first. `None` when the identity was not
    /// seen by the scan.
    pub fn versions(&self, identity: &AssetIdentity) -> Option<&[AssetVersion]> {
        self.entries.get(identity).map(Vec::as_slice)
    }

    /// Display labels of one asset's versions, newest first.
    pub fn version_labels(&self, identity: &AssetIdentity) -> Vec<String> {
        self.versions(identity)
            .map(|versions| {
                versions
                    .iter()
                    .map(|version| version.label().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of assets in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the scan found no assets at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
