//! Resolution of a catalog selection to an absolute path.

use std::path::PathBuf;

use crate::error::CatalogError;
use crate::models::{AssetIdentity, AssetVersion, Catalog};

/// Which version of an asset a caller wants resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// The highest version the catalog knows about.
    Latest,
    /// An explicit label exactly as produced by the scan: either a version
    /// file name or its `v<digits>` tag.
    Label(String),
}

/// Resolve a catalog selection to an absolute path under the project root.
///
/// The path is built from the catalog's root, the convention segments for the
/// identity's type and the relative path recorded at scan time. No component
/// comes from free-form caller input, so a selection cannot escape the
/// project tree.
pub fn resolve_version(
    catalog: &Catalog,
    identity: &AssetIdentity,
    selector: &VersionSelector,
) -> Result<PathBuf, CatalogError> {
    let versions = catalog
        .versions(identity)
        .ok_or_else(|| CatalogError::AssetNotFound {
            identity: identity.clone(),
        })?;

    let version = match selector {
        VersionSelector::Latest => versions.first(),
        VersionSelector::Label(label) => {
            versions.iter().find(|version| version_matches(version, label))
        }
    }
    .ok_or_else(|| CatalogError::VersionNotFound {
        identity: identity.clone(),
        label: match selector {
            VersionSelector::Latest => "latest".to_string(),
            VersionSelector::Label(label) => label.clone(),
        },
    })?;

    let base = catalog.layout().identity_root(
        catalog.root(),
        catalog.area(),
        identity,
        catalog.shot(),
    )?;
    Ok(base.join(&version.relative_path))
}

fn version_matches(version: &AssetVersion, label: &str) -> bool {
    version.file_name == label || version.tag.as_deref() == Some(label)
}
