//! Versioned saves into the wip tree and promotion into the publish tree.
//!
//! This is the filesystem half of the save/publish workflow. Writing the
//! scene file and running cache exports belong to the host editor; this
//! module only decides where those files go, bumps version counters and
//! mirrors a saved file into the publish tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::{AssetIdentity, ProjectArea};
use crate::project::ProjectLayout;
use crate::version::extract_version;

/// Next available version number for `<base>_v<NNN>.<ext>` files in `dir`.
///
/// Returns the highest existing version plus one, or 1 when the directory
/// does not exist yet. Gaps in the sequence are never reused. Any read
/// failure other than absence propagates, so a momentarily unreadable
/// directory can never restart the count and overwrite an existing version.
pub fn next_version(dir: &Path, base_name: &str, extension: &str) -> Result<u32> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(1),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", dir.display()))
        }
    };

    let mut highest = 0;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        let extension_matches = Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if !extension_matches {
            continue;
        }

        let parsed = extract_version(&file_name);
        if parsed.base_name == base_name {
            highest = highest.max(parsed.number);
        }
    }

    Ok(highest + 1)
}

/// A pending versioned save into the wip tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePlan {
    /// Directory the file will be written into.
    pub directory: PathBuf,
    /// Versioned file name, e.g. `bucket_v003.ma`.
    pub file_name: String,
    /// Version number the save will create.
    pub number: u32,
}

impl SavePlan {
    /// Plan the next save of an asset's department source file under
    /// `wip/assets/<type>/<name>/<dept>/source/`.
    pub fn next(
        layout: &ProjectLayout,
        root: &Path,
        identity: &AssetIdentity,
        department: &str,
        extension: &str,
    ) -> Result<Self> {
        let directory = layout.asset_source_dir(root, ProjectArea::Wip, identity, department);
        let number = next_version(&directory, &identity.base_name, extension)?;
        let file_name = format!(
            "{}_{}.{}",
            identity.base_name,
            layout.version_tag(number),
            extension
        );
        Ok(Self {
            directory,
            file_name,
            number,
        })
    }

    /// Absolute path the host editor should save to.
    pub fn target_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Create the wip directory tree ahead of the host save.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.directory)
            .with_context(|| format!("failed to create {}", self.directory.display()))
    }
}

/// A pending promotion of a saved wip file into the publish tree.
///
/// Holds the publish destination for the source file plus the cache paths the
/// host editor should export to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPlan {
    /// Saved wip file to promote.
    pub source_file: PathBuf,
    /// Destination under `publish/.../<dept>/source/`.
    pub published_file: PathBuf,
    /// Alembic cache path the host should export to.
    pub alembic_target: PathBuf,
    /// FBX cache path the host should export to.
    pub fbx_target: PathBuf,
}

impl PublishPlan {
    /// Plan the publish of a completed save.
    pub fn for_save(
        layout: &ProjectLayout,
        root: &Path,
        identity: &AssetIdentity,
        department: &str,
        save: &SavePlan,
    ) -> Self {
        let published_file = layout
            .asset_source_dir(root, ProjectArea::Publish, identity, department)
            .join(&save.file_name);

        let stem = Path::new(&save.file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| save.file_name.clone());

        let alembic_target = layout
            .asset_cache_dir(
                root,
                ProjectArea::Publish,
                identity,
                department,
                &layout.alembic_dir,
            )
            .join(format!("{stem}.abc"));
        let fbx_target = layout
            .asset_cache_dir(
                root,
                ProjectArea::Publish,
                identity,
                department,
                &layout.fbx_dir,
            )
            .join(format!("{stem}.fbx"));

        Self {
            source_file: save.target_path(),
            published_file,
            alembic_target,
            fbx_target,
        }
    }

    /// Create the publish directories and copy the saved file across.
    ///
    /// The cache exports themselves are host side effects; this only
    /// guarantees their target directories exist.
    pub fn apply(&self) -> Result<()> {
        let parents = [
            self.published_file.parent(),
            self.alembic_target.parent(),
            self.fbx_target.parent(),
        ];
        for dir in parents.into_iter().flatten() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        fs::copy(&self.source_file, &self.published_file).with_context(|| {
            format!(
                "failed to copy {} to {}",
                self.source_file.display(),
                self.published_file.display()
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use crate::models::AssetType;

    fn write_file(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"scene").unwrap();
    }

    #[test]
    fn first_version_in_missing_directory_is_one() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nothing/here");
        assert_eq!(next_version(&missing, "bucket", "ma").unwrap(), 1);
    }

    #[test]
    fn next_version_follows_the_highest() {
        let dir = tempdir().unwrap();
        write_file(&dir.path().join("bucket_v001.ma"));
        write_file(&dir.path().join("bucket_v002.ma"));
        assert_eq!(next_version(dir.path(), "bucket", "ma").unwrap(), 3);
    }

    #[test]
    fn gaps_are_not_reused() {
        let dir = tempdir().unwrap();
        write_file(&dir.path().join("bucket_v001.ma"));
        write_file(&dir.path().join("bucket_v003.ma"));
        assert_eq!(next_version(dir.path(), "bucket", "ma").unwrap(), 4);
    }

    #[test]
    fn other_bases_and_extensions_are_ignored() {
        let dir = tempdir().unwrap();
        write_file(&dir.path().join("bucket_v005.mb"));
        write_file(&dir.path().join("barrel_v009.ma"));
        write_file(&dir.path().join("bucket.ma"));
        assert_eq!(next_version(dir.path(), "bucket", "ma").unwrap(), 1);
    }

    #[test]
    fn unreadable_directory_is_an_error_not_version_one() {
        let dir = tempdir().unwrap();
        // A regular file where the source directory should be: read_dir
        // fails with something other than NotFound, which must propagate
        // instead of restarting the count at 1.
        let clash = dir.path().join("source");
        write_file(&clash);

        assert!(next_version(&clash, "bucket", "ma").is_err());
    }

    #[test]
    fn save_plan_targets_the_wip_source_dir() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let layout = ProjectLayout::default();
        let identity = AssetIdentity::new(AssetType::Prop, "bucket");

        let plan = SavePlan::next(&layout, root, &identity, "model", "ma").unwrap();
        assert_eq!(plan.number, 1);
        assert_eq!(plan.file_name, "bucket_v001.ma");
        assert_eq!(
            plan.target_path(),
            root.join("wip/assets/prop/bucket/model/source/bucket_v001.ma")
        );

        plan.ensure_dirs().unwrap();
        assert!(plan.directory.is_dir());
    }

    #[test]
    fn successive_save_plans_bump_the_version() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let layout = ProjectLayout::default();
        let identity = AssetIdentity::new(AssetType::Prop, "bucket");

        let first = SavePlan::next(&layout, root, &identity, "model", "ma").unwrap();
        first.ensure_dirs().unwrap();
        write_file(&first.target_path());

        let second = SavePlan::next(&layout, root, &identity, "model", "ma").unwrap();
        assert_eq!(second.number, 2);
        assert_eq!(second.file_name, "bucket_v002.ma");
    }

    #[test]
    fn save_plans_surface_wip_read_failures() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let layout = ProjectLayout::default();
        let identity = AssetIdentity::new(AssetType::Prop, "bucket");

        // Block the source directory with a regular file.
        write_file(&root.join("wip/assets/prop/bucket/model/source"));

        assert!(SavePlan::next(&layout, root, &identity, "model", "ma").is_err());
    }

    #[test]
    fn publish_plan_mirrors_save_and_names_cache_targets() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let layout = ProjectLayout::default();
        let identity = AssetIdentity::new(AssetType::Prop, "bucket");

        let save = SavePlan::next(&layout, root, &identity, "model", "ma").unwrap();
        save.ensure_dirs().unwrap();
        write_file(&save.target_path());

        let publish = PublishPlan::for_save(&layout, root, &identity, "model", &save);
        assert_eq!(
            publish.published_file,
            root.join("publish/assets/prop/bucket/model/source/bucket_v001.ma")
        );
        assert_eq!(
            publish.alembic_target,
            root.join("publish/assets/prop/bucket/model/caches/alembic/bucket_v001.abc")
        );
        assert_eq!(
            publish.fbx_target,
            root.join("publish/assets/prop/bucket/model/caches/fbx/bucket_v001.fbx")
        );

        publish.apply().unwrap();
        assert!(publish.published_file.is_file());
        assert!(publish.alembic_target.parent().unwrap().is_dir());
        assert!(publish.fbx_target.parent().unwrap().is_dir());
    }

    #[test]
    fn apply_fails_when_the_saved_file_is_missing() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let layout = ProjectLayout::default();
        let identity = AssetIdentity::new(AssetType::Prop, "bucket");

        let save = SavePlan::next(&layout, root, &identity, "model", "ma").unwrap();
        let publish = PublishPlan::for_save(&layout, root, &identity, "model", &save);
        assert!(publish.apply().is_err());
    }
}
