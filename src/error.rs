//! Error taxonomy for catalog scans and version resolution.
//!
//! Missing convention directories are not represented here at all: the scan
//! treats them as "no assets yet" and returns empty results. Everything else
//! propagates to the caller, which owns user-facing presentation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::AssetIdentity;

/// Convenience alias for results produced by the resolver.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced by catalog scans and version resolution.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested operation needs a shot context that could not be
    /// derived, e.g. no scene is open or the scene path does not sit under
    /// the sequence tree. Fatal to the current request.
    #[error("cannot determine shot context: {reason}")]
    AmbiguousContext {
        /// Why the shot could not be determined.
        reason: String,
    },

    /// An I/O failure (other than absence) occurred while traversing the
    /// project tree. The scan aborts so no partial catalog escapes.
    #[error("failed to read {}: {source}", .path.display())]
    Scan {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The selected asset is not present in the catalog; the caller should
    /// rescan before retrying.
    #[error("asset not found in catalog: {identity}")]
    AssetNotFound {
        /// Identity that was looked up.
        identity: AssetIdentity,
    },

    /// The selected version label does not match any scanned version of the
    /// asset.
    #[error("version {label:?} not found for {identity}")]
    VersionNotFound {
        /// Identity whose versions were searched.
        identity: AssetIdentity,
        /// Label that failed to match.
        label: String,
    },
}
