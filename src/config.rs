//! Project configuration loader describing the directory convention.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::project::ProjectLayout;

const DEFAULT_CONFIG_FILE: &str = "catalog.config.json";

/// Discoverable configuration naming every segment of the directory
/// convention. All fields default to the fixed pipeline convention so a
/// missing or malformed file degrades to sensible behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory holding work-in-progress scene files.
    pub wip_dir: String,
    /// Directory holding reviewed/approved files, the source of truth for
    /// downstream consumption.
    pub publish_dir: String,
    /// Segment under wip/publish holding global assets.
    pub assets_dir: String,
    /// Segment under publish holding per-shot output.
    pub sequence_dir: String,
    /// Path segments recognised as the sequence marker when deriving a shot
    /// context from a scene path.
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
    /// Name of the optional asset-type selection file in the project root.
    pub selection_file: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            wip_dir: "wip".into(),
            publish_dir: "publish".into(),
            assets_dir: "assets".into(),
            sequence_dir: "sequence".into(),
            sequence_markers: vec!["sequence".into(), "sequences".into()],
            source_dir: "source".into(),
            caches_dir: "caches".into(),
            alembic_dir: "alembic".into(),
            fbx_dir: "fbx".into(),
            layout_department: "layout".into(),
            animation_department: "animation".into(),
            source_extensions: vec![
                "ma".into(),
                "mb".into(),
                "abc".into(),
                "fbx".into(),
                "usd".into(),
                "usda".into(),
                "usdc".into(),
            ],
            version_pad: 3,
            selection_file: "catalog.local.json".into(),
        }
    }
}

impl ProjectConfig {
    /// Attempt to load configuration from the project root.
    ///
    /// When the configuration file does not exist or fails to parse we fall
    /// back to the default convention so callers can continue operating.
    pub fn discover(project_root: &Path) -> Self {
        let candidate = project_root.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Convert the configuration into an owned layout description.
    pub fn into_layout(self) -> ProjectLayout {
        ProjectLayout {
            wip_dir: self.wip_dir,
            publish_dir: self.publish_dir,
            assets_dir: self.assets_dir,
            sequence_dir: self.sequence_dir,
            sequence_markers: self.sequence_markers,
            source_dir: self.source_dir,
            caches_dir: self.caches_dir,
            alembic_dir: self.alembic_dir,
            fbx_dir: self.fbx_dir,
            layout_department: self.layout_department,
            animation_department: self.animation_department,
            source_extensions: self.source_extensions,
            version_pad: self.version_pad,
        }
    }

    /// Path of the optional asset-type selection file in the project root.
    pub fn selection_file_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.selection_file)
    }
}
