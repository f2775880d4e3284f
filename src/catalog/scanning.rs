//! Directory scanning that builds the asset catalog.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::CatalogError;
use crate::models::{AssetIdentity, AssetType, AssetVersion, Catalog, ProjectArea};
use crate::project::ProjectLayout;
use crate::shot::ShotContext;
use crate::version::extract_version;

/// Walk one area of the project tree and build a catalog for the requested
/// asset types. Repeated types are scanned once.
///
/// Missing convention directories yield zero entries for that type; any other
/// I/O failure aborts the whole scan so callers never observe a partial
/// catalog. Shot-scoped types require a shot context and fail with
/// [`CatalogError::AmbiguousContext`] without one.
pub fn scan_catalog(
    root: &Path,
    area: ProjectArea,
    shot: Option<&ShotContext>,
    types: &[AssetType],
    layout: &ProjectLayout,
) -> Result<Catalog, CatalogError> {
    let mut entries: BTreeMap<AssetIdentity, Vec<AssetVersion>> = BTreeMap::new();
    let mut scanned: BTreeSet<&AssetType> = BTreeSet::new();

    for asset_type in types {
        if !scanned.insert(asset_type) {
            continue;
        }
        if asset_type.is_shot_scoped() {
            let shot = shot.ok_or_else(|| CatalogError::AmbiguousContext {
                reason: format!("scanning {asset_type} assets requires an open shot scene"),
            })?;
            scan_shot_caches(root, area, shot, asset_type, layout, &mut entries)?;
        } else {
            scan_area_assets(root, area, asset_type, layout, &mut entries)?;
        }
    }

    for versions in entries.values_mut() {
        sort_versions(versions);
    }

    Ok(Catalog::new(
        root.to_path_buf(),
        area,
        layout.clone(),
        shot.cloned(),
        entries,
    ))
}

/// List every `<sequence>/<shot>` pair present in one area's sequence tree,
/// sorted. A project with no sequence directory yet has no shots.
pub fn list_shots(
    root: &Path,
    area: ProjectArea,
    layout: &ProjectLayout,
) -> Result<Vec<ShotContext>, CatalogError> {
    let sequence_root = layout.sequence_root(root, area);
    let mut shots = Vec::new();

    for sequence in subdirectories(&sequence_root)? {
        for shot in subdirectories(&sequence_root.join(&sequence))? {
            shots.push(ShotContext::new(sequence.clone(), shot));
        }
    }

    shots.sort();
    Ok(shots)
}

/// Non-hidden subdirectory names of `dir`; an absent directory is empty.
fn subdirectories(dir: &Path) -> Result<Vec<String>, CatalogError> {
    let mut names = Vec::new();

    let dir_entries = match fs::read_dir(dir) {
        Ok(iter) => iter,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("nothing under {}", dir.display());
            return Ok(names);
        }
        Err(err) => return Err(scan_err(dir, err)),
    };

    for entry in dir_entries {
        let entry = entry.map_err(|err| scan_err(dir, err))?;
        if !entry.file_type().map_err(|err| scan_err(dir, err))?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }

    Ok(names)
}

/// Per-asset ordering guarantee: version number descending, ties broken by
/// filename descending, so unversioned files (number 0) sort last.
fn sort_versions(versions: &mut [AssetVersion]) {
    versions.sort_by(|a, b| {
        b.number
            .cmp(&a.number)
            .then_with(|| b.file_name.cmp(&a.file_name))
    });
}

fn scan_err(path: &Path, source: io::Error) -> CatalogError {
    CatalogError::Scan {
        path: path.to_path_buf(),
        source,
    }
}

/// Every regular file in the shot's alembic cache directory is a candidate
/// version; the identity's base name comes from stripping the version suffix.
fn scan_shot_caches(
    root: &Path,
    area: ProjectArea,
    shot: &ShotContext,
    asset_type: &AssetType,
    layout: &ProjectLayout,
    entries: &mut BTreeMap<AssetIdentity, Vec<AssetVersion>>,
) -> Result<(), CatalogError> {
    let cache_dir = layout.shot_cache_dir(root, area, shot, asset_type);
    let dir_entries = match fs::read_dir(&cache_dir) {
        Ok(iter) => iter,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("no caches published under {}", cache_dir.display());
            return Ok(());
        }
        Err(err) => return Err(scan_err(&cache_dir, err)),
    };

    for entry in dir_entries {
        let entry = entry.map_err(|err| scan_err(&cache_dir, err))?;
        if !entry.file_type().map_err(|err| scan_err(&cache_dir, err))?.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') {
            continue;
        }

        let parsed = extract_version(&file_name);
        let identity = AssetIdentity::new(asset_type.clone(), parsed.base_name);
        entries.entry(identity).or_default().push(AssetVersion {
            relative_path: PathBuf::from(&file_name),
            file_name,
            number: parsed.number,
            tag: parsed.tag,
        });
    }

    Ok(())
}

/// Each immediate subdirectory of `<area>/assets/<type>/` is an asset; its
/// versions come from a recursive walk of the department source directories.
fn scan_area_assets(
    root: &Path,
    area: ProjectArea,
    asset_type: &AssetType,
    layout: &ProjectLayout,
    entries: &mut BTreeMap<AssetIdentity, Vec<AssetVersion>>,
) -> Result<(), CatalogError> {
    let type_dir = layout.type_dir(root, area, asset_type);
    let dir_entries = match fs::read_dir(&type_dir) {
        Ok(iter) => iter,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("no assets under {}", type_dir.display());
            return Ok(());
        }
        Err(err) => return Err(scan_err(&type_dir, err)),
    };

    for entry in dir_entries {
        let entry = entry.map_err(|err| scan_err(&type_dir, err))?;
        if !entry.file_type().map_err(|err| scan_err(&type_dir, err))?.is_dir() {
            continue;
        }
        let base_name = entry.file_name().to_string_lossy().to_string();
        if base_name.starts_with('.') {
            continue;
        }

        // An asset directory with no versions yet is still an asset.
        let versions = collect_asset_versions(&entry.path(), layout)?;
        let identity = AssetIdentity::new(asset_type.clone(), base_name);
        entries.entry(identity).or_default().extend(versions);
    }

    Ok(())
}

fn collect_asset_versions(
    asset_dir: &Path,
    layout: &ProjectLayout,
) -> Result<Vec<AssetVersion>, CatalogError> {
    let mut versions = Vec::new();

    let departments = match fs::read_dir(asset_dir) {
        Ok(iter) => iter,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(versions),
        Err(err) => return Err(scan_err(asset_dir, err)),
    };

    for department in departments {
        let department = department.map_err(|err| scan_err(asset_dir, err))?;
        if !department.file_type().map_err(|err| scan_err(asset_dir, err))?.is_dir() {
            continue;
        }

        let source_dir = department.path().join(&layout.source_dir);
        if !source_dir.is_dir() {
            continue;
        }

        for walked in WalkDir::new(&source_dir) {
            let walked = walked.map_err(|err| CatalogError::Scan {
                path: source_dir.clone(),
                source: io::Error::from(err),
            })?;
            if !walked.file_type().is_file() {
                continue;
            }

            let recognised = walked
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| layout.is_source_extension(ext));
            if !recognised {
                continue;
            }

            let file_name = walked.file_name().to_string_lossy().to_string();
            let relative_path = walked
                .path()
                .strip_prefix(asset_dir)
                .unwrap_or_else(|_| walked.path())
                .to_path_buf();

            let parsed = extract_version(&file_name);
            versions.push(AssetVersion {
                file_name,
                number: parsed.number,
                tag: parsed.tag,
                relative_path,
            });
        }
    }

    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"scene").unwrap();
    }

    #[test]
    fn orders_shot_cache_versions_descending() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let caches = root.join("publish/sequence/seq010/sh020/animation/caches/alembic");
        write_file(&caches.join("hero_v001.ma"));
        write_file(&caches.join("hero_v003.ma"));
        write_file(&caches.join("hero_v002.ma"));

        let shot = ShotContext::new("seq010", "sh020");
        let layout = ProjectLayout::default();
        let catalog = scan_catalog(
            root,
            ProjectArea::Publish,
            Some(&shot),
            &[AssetType::Character],
            &layout,
        )
        .unwrap();

        let identity = AssetIdentity::new(AssetType::Character, "hero");
        assert_eq!(
            catalog.version_labels(&identity),
            vec!["hero_v003.ma", "hero_v002.ma", "hero_v001.ma"]
        );
    }

    #[test]
    fn shot_scoped_scan_without_context_is_ambiguous() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::default();

        for asset_type in [AssetType::Layout, AssetType::Character] {
            let err = scan_catalog(dir.path(), ProjectArea::Publish, None, &[asset_type], &layout)
                .unwrap_err();
            assert!(matches!(err, CatalogError::AmbiguousContext { .. }));
        }
    }

    #[test]
    fn missing_type_directory_yields_empty_catalog() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::default();

        let catalog = scan_catalog(
            dir.path(),
            ProjectArea::Publish,
            None,
            &[AssetType::Prop],
            &layout,
        )
        .unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn global_assets_come_from_subdirectories() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let bucket = root.join("publish/assets/prop/bucket");
        write_file(&bucket.join("model/source/bucket_v001.ma"));
        write_file(&bucket.join("model/source/bucket_v002.ma"));
        write_file(&bucket.join("rig/source/bucket_v001.mb"));
        write_file(&bucket.join("model/source/notes.txt"));
        fs::create_dir_all(root.join("publish/assets/prop/barrel")).unwrap();

        let layout = ProjectLayout::default();
        let catalog =
            scan_catalog(root, ProjectArea::Publish, None, &[AssetType::Prop], &layout).unwrap();

        assert_eq!(
            catalog.asset_labels(),
            vec!["prop/barrel", "prop/bucket"]
        );

        let bucket_id = AssetIdentity::new(AssetType::Prop, "bucket");
        let versions = catalog.versions(&bucket_id).unwrap();
        assert_eq!(versions.len(), 3);
        assert_eq!(versions[0].file_name, "bucket_v002.ma");
        assert_eq!(
            versions[0].relative_path,
            PathBuf::from("model/source/bucket_v002.ma")
        );

        let barrel_id = AssetIdentity::new(AssetType::Prop, "barrel");
        assert_eq!(catalog.versions(&barrel_id), Some(&[][..]));
    }

    #[test]
    fn repeated_types_are_scanned_once() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("publish/assets/prop/bucket/model/source/bucket_v001.ma"));

        let layout = ProjectLayout::default();
        let catalog = scan_catalog(
            root,
            ProjectArea::Publish,
            None,
            &[AssetType::Prop, AssetType::Prop],
            &layout,
        )
        .unwrap();

        let identity = AssetIdentity::new(AssetType::Prop, "bucket");
        assert_eq!(catalog.version_labels(&identity), vec!["bucket_v001.ma"]);
    }

    #[test]
    fn wip_scans_read_the_wip_tree() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("wip/assets/prop/bucket/model/source/bucket_v004.ma"));
        write_file(&root.join("publish/assets/prop/bucket/model/source/bucket_v002.ma"));

        let layout = ProjectLayout::default();
        let identity = AssetIdentity::new(AssetType::Prop, "bucket");

        let wip =
            scan_catalog(root, ProjectArea::Wip, None, &[AssetType::Prop], &layout).unwrap();
        assert_eq!(wip.version_labels(&identity), vec!["bucket_v004.ma"]);
        assert_eq!(wip.area(), ProjectArea::Wip);

        let published =
            scan_catalog(root, ProjectArea::Publish, None, &[AssetType::Prop], &layout).unwrap();
        assert_eq!(published.version_labels(&identity), vec!["bucket_v002.ma"]);
    }

    #[test]
    fn unversioned_files_sort_after_versioned_ones() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let chair = root.join("publish/assets/set/chair");
        write_file(&chair.join("model/source/chair.ma"));
        write_file(&chair.join("model/source/chair_v001.ma"));

        let layout = ProjectLayout::default();
        let catalog =
            scan_catalog(root, ProjectArea::Publish, None, &[AssetType::Set], &layout).unwrap();

        let identity = AssetIdentity::new(AssetType::Set, "chair");
        assert_eq!(
            catalog.version_labels(&identity),
            vec!["chair_v001.ma", "chair.ma"]
        );

        let versions = catalog.versions(&identity).unwrap();
        assert_eq!(versions[1].number, 0);
        assert_eq!(versions[1].tag, None);
    }

    #[test]
    fn equal_numbers_break_ties_by_filename_descending() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let caches = root.join("publish/sequence/seq010/sh020/layout/caches/alembic");
        write_file(&caches.join("cam_v002.abc"));
        write_file(&caches.join("cam_v02.abc"));

        let shot = ShotContext::new("seq010", "sh020");
        let layout = ProjectLayout::default();
        let catalog = scan_catalog(
            root,
            ProjectArea::Publish,
            Some(&shot),
            &[AssetType::Layout],
            &layout,
        )
        .unwrap();

        let identity = AssetIdentity::new(AssetType::Layout, "cam");
        assert_eq!(
            catalog.version_labels(&identity),
            vec!["cam_v02.abc", "cam_v002.abc"]
        );
    }

    #[test]
    fn repeated_scans_are_stable() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let bucket = root.join("publish/assets/prop/bucket");
        write_file(&bucket.join("model/source/bucket_v001.ma"));
        write_file(&bucket.join("model/source/bucket_v003.ma"));
        write_file(&bucket.join("model/source/bucket_v002.ma"));

        let layout = ProjectLayout::default();
        let identity = AssetIdentity::new(AssetType::Prop, "bucket");

        let first =
            scan_catalog(root, ProjectArea::Publish, None, &[AssetType::Prop], &layout).unwrap();
        let second =
            scan_catalog(root, ProjectArea::Publish, None, &[AssetType::Prop], &layout).unwrap();

        assert_eq!(first.asset_labels(), second.asset_labels());
        assert_eq!(
            first.version_labels(&identity),
            second.version_labels(&identity)
        );
    }

    #[test]
    fn mixed_global_and_shot_scoped_scan() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("publish/assets/set/diner/model/source/diner_v001.ma"));
        write_file(&root.join(
            "publish/sequence/seq010/sh020/animation/caches/alembic/hero_v004.abc",
        ));

        let shot = ShotContext::new("seq010", "sh020");
        let layout = ProjectLayout::default();
        let catalog = scan_catalog(
            root,
            ProjectArea::Publish,
            Some(&shot),
            &[AssetType::Set, AssetType::Character],
            &layout,
        )
        .unwrap();

        assert_eq!(
            catalog.asset_labels(),
            vec!["character/hero", "set/diner"]
        );
    }

    #[test]
    fn lists_shots_across_sequences_sorted() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("publish/sequence/seq020/sh010")).unwrap();
        fs::create_dir_all(root.join("publish/sequence/seq010/sh030")).unwrap();
        fs::create_dir_all(root.join("publish/sequence/seq010/sh010")).unwrap();
        // Stray files next to shot directories are not shots.
        write_file(&root.join("publish/sequence/seq010/readme.txt"));

        let layout = ProjectLayout::default();
        let shots = list_shots(root, ProjectArea::Publish, &layout).unwrap();

        assert_eq!(
            shots,
            vec![
                ShotContext::new("seq010", "sh010"),
                ShotContext::new("seq010", "sh030"),
                ShotContext::new("seq020", "sh010"),
            ]
        );
    }

    #[test]
    fn missing_sequence_tree_has_no_shots() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::default();

        let shots = list_shots(dir.path(), ProjectArea::Publish, &layout).unwrap();
        assert!(shots.is_empty());
    }
}
