//! Command-line front end over the catalog resolver, mirroring the queries a
//! host-editor tool would issue: list assets, list versions, resolve a
//! selection, plan the next versioned save.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::warn;

use pipeline_catalog::catalog::{list_shots, resolve_version, scan_catalog, VersionSelector};
use pipeline_catalog::config::ProjectConfig;
use pipeline_catalog::models::{AssetIdentity, AssetType, ProjectArea};
use pipeline_catalog::selection::{default_types, TypeSelection};
use pipeline_catalog::shot::ShotContext;
use pipeline_catalog::workspace::SavePlan;
use pipeline_catalog::ProjectLayout;

#[derive(Parser)]
#[command(
    name = "pipeline-catalog",
    about = "Asset and version discovery for convention-based project trees",
    version
)]
struct Cli {
    /// Project root containing the wip/ and publish/ trees.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Path of the currently open scene, used to derive the shot context for
    /// shot-scoped asset types.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Which half of the project tree to read: wip or publish.
    #[arg(long, default_value = "publish")]
    area: ProjectArea,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available assets for the enabled asset types.
    Assets {
        /// Asset types to include; defaults to the standard filter set
        /// narrowed by the project's selection file.
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<String>,
    },
    /// List available versions of one asset, newest first.
    Versions {
        /// Asset label in `<type>/<name>` form.
        asset: String,
    },
    /// Resolve an asset selection to an absolute file path.
    Resolve {
        /// Asset label in `<type>/<name>` form.
        asset: String,
        /// Version label as printed by `versions`; latest when omitted.
        #[arg(long)]
        version: Option<String>,
    },
    /// List every sequence/shot pair present in the project.
    Shots,
    /// Print the next versioned wip save path for an asset.
    NextVersion {
        /// Asset label in `<type>/<name>` form.
        asset: String,
        /// Department the file belongs to.
        #[arg(long, default_value = "model")]
        department: String,
        /// File extension of the saved scene.
        #[arg(long, default_value = "ma")]
        extension: String,
    },
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = ProjectConfig::discover(&cli.root);
    let selection_path = config.selection_file_path(&cli.root);
    let layout = config.into_layout();
    let shot = derive_shot(&layout, &cli.root, cli.scene.as_deref());

    match cli.command {
        Command::Assets { types } => {
            let types = requested_types(types, &selection_path)?;
            let catalog = scan_catalog(&cli.root, cli.area, shot.as_ref(), &types, &layout)?;
            for label in catalog.asset_labels() {
                println!("{label}");
            }
        }
        Command::Versions { asset } => {
            let identity = parse_identity(&asset)?;
            let catalog = scan_catalog(
                &cli.root,
                cli.area,
                shot.as_ref(),
                std::slice::from_ref(&identity.asset_type),
                &layout,
            )?;
            for label in catalog.version_labels(&identity) {
                println!("{label}");
            }
        }
        Command::Resolve { asset, version } => {
            let identity = parse_identity(&asset)?;
            let catalog = scan_catalog(
                &cli.root,
                cli.area,
                shot.as_ref(),
                std::slice::from_ref(&identity.asset_type),
                &layout,
            )?;
            let selector = match version {
                Some(label) => VersionSelector::Label(label),
                None => VersionSelector::Latest,
            };
            let path = resolve_version(&catalog, &identity, &selector)?;
            println!("{}", path.display());
        }
        Command::Shots => {
            for shot in list_shots(&cli.root, cli.area, &layout)? {
                println!("{}/{}", shot.sequence, shot.shot);
            }
        }
        Command::NextVersion {
            asset,
            department,
            extension,
        } => {
            let identity = parse_identity(&asset)?;
            let plan = SavePlan::next(&layout, &cli.root, &identity, &department, &extension)?;
            println!("{}", plan.target_path().display());
        }
    }

    Ok(())
}

/// Shot context is best effort at this level: a scene that does not sit under
/// the sequence tree simply yields no context, and shot-scoped scans will
/// report the ambiguity themselves.
fn derive_shot(layout: &ProjectLayout, root: &Path, scene: Option<&Path>) -> Option<ShotContext> {
    let scene = scene?;
    match ShotContext::from_scene_path(layout, root, scene) {
        Ok(shot) => Some(shot),
        Err(err) => {
            warn!("{err}");
            None
        }
    }
}

fn requested_types(names: Vec<String>, selection_path: &Path) -> Result<Vec<AssetType>> {
    if names.is_empty() {
        let selection = TypeSelection::load_from_path(selection_path)
            .with_context(|| format!("failed to load {}", selection_path.display()))?;
        return Ok(selection.filter(default_types()));
    }

    Ok(names
        .iter()
        .map(|name| AssetType::parse(name))
        .collect())
}

fn parse_identity(label: &str) -> Result<AssetIdentity> {
    AssetIdentity::parse_label(label)
        .ok_or_else(|| anyhow!("expected an asset label in <type>/<name> form, got {label:?}"))
}
