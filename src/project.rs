//! Convention path construction shared by scanning, resolution and saves.
//!
//! Every path the crate touches is built here by joining the project root
//! with layout-owned segment names. Asset and version components always come
//! from prior scans of the filesystem itself, never from free-form caller
//! input, which is what keeps resolved paths inside the project tree.

use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::error::CatalogError;
use crate::models::{AssetIdentity, AssetType, ProjectArea};
use crate::shot::ShotContext;

/// Owned snapshot of the directory convention used to build every path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Directory holding work-in-progress scene files.
    pub wip_dir: String,
    /// Directory holding reviewed/approved files.
    pub publish_dir: String,
    /// Segment under wip/publish holding global assets.
    pub assets_dir: String,
    /// Segment under wip/publish holding per-shot output.
    pub sequence_dir: String,
    /// Path segments recognised as the sequence marker in scene paths.
    pub sequence_markers: Vec<String>,
    /// Department subdirectory that stores source scene files.
    pub source_dir: String,
    /// Department subdirectory that stores exported caches.
    pub caches_dir: String,
    /// Cache format directory for Alembic exports.
    pub alembic_dir: String,
    /// Cache format directory for FBX exports.
    pub fbx_dir: String,
    /// Department that owns layout (camera) caches.
    pub layout_department: String,
    /// Department that owns character animation caches.
    pub animation_department: String,
    /// File extensions recognised as asset versions during scans.
    pub source_extensions: Vec<String>,
    /// Zero padding width for generated version tags.
    pub version_pad: usize,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        ProjectConfig::default().into_layout()
    }
}

impl ProjectLayout {
    /// Top-level directory name of a project area.
    pub fn area_dir(&self, area: ProjectArea) -> &str {
        match area {
            ProjectArea::Wip => &self.wip_dir,
            ProjectArea::Publish => &self.publish_dir,
        }
    }

    /// `<area>/assets/<type>` directory of a global category.
    pub fn type_dir(&self, root: &Path, area: ProjectArea, asset_type: &AssetType) -> PathBuf {
        root.join(self.area_dir(area))
            .join(&self.assets_dir)
            .join(asset_type.dir_name())
    }

    /// Root directory of one global asset (`<area>/assets/<type>/<name>`).
    pub fn asset_dir(&self, root: &Path, area: ProjectArea, identity: &AssetIdentity) -> PathBuf {
        self.type_dir(root, area, &identity.asset_type)
            .join(&identity.base_name)
    }

    /// `<area>/sequence` directory holding every sequence of the project.
    pub fn sequence_root(&self, root: &Path, area: ProjectArea) -> PathBuf {
        root.join(self.area_dir(area)).join(&self.sequence_dir)
    }

    /// Cache department of a shot-scoped type: layout caches come from the
    /// layout department, character caches from animation.
    pub fn cache_department(&self, asset_type: &AssetType) -> &str {
        match asset_type {
            AssetType::Layout => &self.layout_department,
            _ => &self.animation_department,
        }
    }

    /// Alembic cache directory of a shot for a shot-scoped type
    /// (`<area>/sequence/<seq>/<shot>/<dept>/caches/alembic`).
    pub fn shot_cache_dir(
        &self,
        root: &Path,
        area: ProjectArea,
        shot: &ShotContext,
        asset_type: &AssetType,
    ) -> PathBuf {
        self.sequence_root(root, area)
            .join(&shot.sequence)
            .join(&shot.shot)
            .join(self.cache_department(asset_type))
            .join(&self.caches_dir)
            .join(&self.alembic_dir)
    }

    /// Convention root that an asset version's relative path joins onto.
    pub fn identity_root(
        &self,
        root: &Path,
        area: ProjectArea,
        identity: &AssetIdentity,
        shot: Option<&ShotContext>,
    ) -> Result<PathBuf, CatalogError> {
        if identity.asset_type.is_shot_scoped() {
            let shot = shot.ok_or_else(|| CatalogError::AmbiguousContext {
                reason: format!(
                    "resolving {} assets requires an open shot scene",
                    identity.asset_type
                ),
            })?;
            Ok(self.shot_cache_dir(root, area, shot, &identity.asset_type))
        } else {
            Ok(self.asset_dir(root, area, identity))
        }
    }

    /// `<area>/assets/<type>/<name>/<dept>/source` directory of an asset.
    pub fn asset_source_dir(
        &self,
        root: &Path,
        area: ProjectArea,
        identity: &AssetIdentity,
        department: &str,
    ) -> PathBuf {
        self.asset_dir(root, area, identity)
            .join(department)
            .join(&self.source_dir)
    }

    /// Cache export directory of an asset
    /// (`<area>/assets/<type>/<name>/<dept>/caches/<format>`).
    pub fn asset_cache_dir(
        &self,
        root: &Path,
        area: ProjectArea,
        identity: &AssetIdentity,
        department: &str,
        format_dir: &str,
    ) -> PathBuf {
        self.asset_dir(root, area, identity)
            .join(department)
            .join(&self.caches_dir)
            .join(format_dir)
    }

    /// Whether a file extension participates in version scans.
    pub fn is_source_extension(&self, extension: &str) -> bool {
        self.source_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(extension))
    }

    /// Zero-padded version tag for generated filenames, e.g. 7 -> `v007`.
    pub fn version_tag(&self, number: u32) -> String {
        format!("v{number:0width$}", width = self.version_pad)
    }
}
