use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use fc_core::file_kind::is_croppable_image;
use fc_core::{ChooserConfig, ContentRef, ContentType, ResolvedLocation};
use filechooser::{load_config, wire_dependencies, ChooserDeps};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "filechooser-probe")]
#[command(about = "Resolve, mint and classify content references", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Host package id, overriding the configured one
    #[arg(short, long, global = true)]
    package: Option<String>,

    /// Index a directory into a content collection, as COLLECTION=DIR
    #[arg(long = "index", global = true, value_parser = parse_index_arg)]
    indexes: Vec<(ContentRef, PathBuf)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a reference to a local path
    Resolve {
        reference: ContentRef,
        /// Content-type hint (image, video, audio, text, file)
        #[arg(long)]
        hint: Option<ContentType>,
    },
    /// Mint a shareable reference for an existing file
    Mint { path: PathBuf },
    /// Report whether a file can be handed to the crop step
    Classify { path: PathBuf },
}

fn parse_index_arg(arg: &str) -> Result<(ContentRef, PathBuf)> {
    let (collection, dir) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected COLLECTION=DIR, got {arg}"))?;
    let collection = ContentRef::parse(collection)
        .with_context(|| format!("invalid collection reference: {collection}"))?;
    Ok((collection, PathBuf::from(dir)))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    filechooser::init_tracing_subscriber()?;

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ChooserConfig::empty(),
    };
    if let Some(package) = &cli.package {
        config.package_id = package.clone();
    }
    let deps = wire_dependencies(&config).context("failed to wire chooser dependencies")?;
    for (collection, dir) in &cli.indexes {
        let count = deps
            .index
            .index_directory(collection, dir)
            .with_context(|| format!("failed to index {}", dir.display()))?;
        tracing::info!(%collection, dir = %dir.display(), count, "indexed directory");
    }

    let report = match cli.command {
        Commands::Resolve { reference, hint } => run_resolve(&deps, &reference, hint),
        Commands::Mint { path } => run_mint(&deps, &path)?,
        Commands::Classify { path } => run_classify(&deps, &path),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_resolve(deps: &ChooserDeps, reference: &ContentRef, hint: Option<ContentType>) -> Value {
    let location = match deps.resolver.resolve(reference, hint) {
        Some(ResolvedLocation::Path(path)) => json!({ "path": path }),
        Some(ResolvedLocation::DisplayId(id)) => json!({ "display_id": id }),
        None => Value::Null,
    };
    json!({
        "reference": reference.as_str(),
        "hint": hint.map(|h| h.mime()),
        "location": location,
    })
}

fn run_mint(deps: &ChooserDeps, path: &Path) -> Result<Value> {
    let path = std::path::absolute(path)
        .with_context(|| format!("failed to make {} absolute", path.display()))?;
    let Some(reference) = deps.minter.mint_existing(&path, &deps.authority) else {
        bail!("no file at {}", path.display());
    };
    Ok(json!({
        "path": path,
        "authority": deps.authority,
        "reference": reference.as_str(),
        "provider_minted": reference.is_content(),
    }))
}

fn run_classify(deps: &ChooserDeps, path: &Path) -> Value {
    let in_private_storage = deps.storage.is_private(path);
    json!({
        "path": path,
        "exists": path.exists(),
        "croppable_image": is_croppable_image(path),
        "private": in_private_storage,
    })
}
