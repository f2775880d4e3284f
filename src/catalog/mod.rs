//! Catalog construction and version resolution split into focused submodules.

mod resolve;
mod scanning;

pub use resolve::{resolve_version, VersionSelector};
pub use scanning::{list_shots, scan_catalog};
