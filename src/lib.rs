#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod project;
pub mod selection;
pub mod shot;
pub mod version;
pub mod workspace;

pub use catalog::{list_shots, resolve_version, scan_catalog, VersionSelector};
pub use config::ProjectConfig;
pub use error::{CatalogError, CatalogResult};
pub use models::{AssetIdentity, AssetType, AssetVersion, Catalog, ProjectArea};
pub use project::ProjectLayout;
pub use selection::{TypeInclusion, TypeSelection};
pub use shot::ShotContext;
pub use version::{extract_version, ParsedName};
pub use workspace::{next_version, PublishPlan, SavePlan};
