//! Shot context derived from the currently open scene path.

use std::path::Path;

use crate::error::CatalogError;
use crate::project::ProjectLayout;

/// The (sequence, shot) pair the currently open scene belongs to.
///
/// Recomputed on every resolver invocation since the open scene may change
/// between calls.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShotContext {
    /// Sequence directory name, e.g. `seq010`.
    pub sequence: String,
    /// Shot directory name, e.g. `sh020`.
    pub shot: String,
}

impl ShotContext {
    /// Build a shot context from already-known names.
    pub fn new(sequence: impl Into<String>, shot: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            shot: shot.into(),
        }
    }

    /// Derive the shot context from an open scene path.
    ///
    /// The scene path is relativised against the project root when possible,
    /// then its segments are searched for a sequence marker; the two segments
    /// after the marker name the sequence and the shot.
    pub fn from_scene_path(
        layout: &ProjectLayout,
        root: &Path,
        scene_path: &Path,
    ) -> Result<Self, CatalogError> {
        let relative = scene_path.strip_prefix(root).unwrap_or(scene_path);

        let segments: Vec<String> = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().to_string())
            .collect();

        let marker_index = segments
            .iter()
            .position(|segment| layout.sequence_markers.iter().any(|m| m == segment))
            .ok_or_else(|| CatalogError::AmbiguousContext {
                reason: format!(
                    "scene path {} has no sequence segment",
                    scene_path.display()
                ),
            })?;

        match (
            segments.get(marker_index + 1),
            segments.get(marker_index + 2),
        ) {
            (Some(sequence), Some(shot)) => Ok(Self::new(sequence, shot)),
            _ => Err(CatalogError::AmbiguousContext {
                reason: format!(
                    "scene path {} ends before naming a sequence and shot",
                    scene_path.display()
                ),
            }),
        }
    }
}
