//! NALCMS STAC generator
//!
//! Generates STAC 1.0.0 Collections and Items for the NALCMS land cover datasets.
//!
//! Usage:
//!     nalcms-stac create-collection stac/
//!     nalcms-stac create-collection stac/ --group-by region --cog-dir cogs/
//!     nalcms-stac create-item --region NA --resolution 30 --year 2010-2015 --source cog.tif items/
//!     nalcms-stac tables --output tables.json
//!     nalcms-stac validate stac/

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nalcms_stac::catalog::write_json;
use nalcms_stac::constants::STAC_VERSION;
use nalcms_stac::{build_catalog, create_item, validate_catalog, Grouping, Severity, StacCatalog, Tables};

// =============================================================================
// CLI Definition
// =============================================================================

#[derive(Parser)]
#[command(name = "nalcms-stac")]
#[command(about = "Generate STAC metadata for NALCMS land cover datasets")]
struct Cli {
    /// JSON tables file replacing the built-in dataset tables
    #[arg(long, global = true, env = "NALCMS_TABLES")]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the root collection with its sub-collections and items
    CreateCollection {
        /// Output directory for the catalog
        destination: PathBuf,

        /// How the root collection's children are grouped
        #[arg(long, value_enum, default_value_t = GroupBy::Period)]
        group_by: GroupBy,

        /// Directory of COGs named `{item_id}.tif` used as data assets
        #[arg(long)]
        cog_dir: Option<PathBuf>,

        /// Base URL for absolute self links
        #[arg(short, long, env = "STAC_BASE_URL")]
        base_url: Option<String>,
    },
    /// Create a single item
    CreateItem {
        /// Region code (NA, CAN, USA, MEX)
        #[arg(long)]
        region: String,

        /// Resolution in meters
        #[arg(long)]
        resolution: u32,

        /// Year, or `start-end` for a change map
        #[arg(long)]
        year: String,

        /// Local COG used as the data asset instead of the remote archive
        #[arg(long)]
        source: Option<String>,

        /// Output directory for the item JSON
        destination: PathBuf,
    },
    /// Print or save the active dataset tables as JSON
    Tables {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a written catalog
    Validate {
        /// Catalog directory
        catalog_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GroupBy {
    Period,
    Region,
}

impl From<GroupBy> for Grouping {
    fn from(group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::Period => Grouping::Period,
            GroupBy::Region => Grouping::Region,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn load_tables(path: Option<&Path>) -> Result<Tables> {
    match path {
        Some(path) => Tables::from_path(path)
            .with_context(|| format!("Failed to load tables from {:?}", path)),
        None => Ok(Tables::builtin()),
    }
}

/// Map item ids to the `{item_id}.tif` files found in `dir`.
fn find_cogs(dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut sources = BTreeMap::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))? {
        let path = entry?.path();
        let is_tif = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"))
            .unwrap_or(false);
        if !is_tif {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            debug!("Found COG {:?}", path);
            sources.insert(stem.to_string_lossy().into_owned(), path.to_string_lossy().into_owned());
        }
    }
    Ok(sources)
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let tables = load_tables(cli.tables.as_deref())?;

    match cli.command {
        Commands::CreateCollection {
            destination,
            group_by,
            cog_dir,
            base_url,
        } => {
            let sources = match cog_dir {
                Some(ref dir) => find_cogs(dir)?,
                None => BTreeMap::new(),
            };
            info!("Using {} local COGs", sources.len());

            let catalog = build_catalog(&tables, group_by.into(), &sources)
                .context("Failed to build catalog")?;
            let summary = catalog
                .write_to_dir(&destination, base_url.as_deref())
                .with_context(|| format!("Failed to write catalog to {:?}", destination))?;

            println!("=== NALCMS STAC (v{}) ===", STAC_VERSION);
            println!("Collections: {}", summary.collections);
            println!("Items: {}", summary.items);
            println!("Written to {:?}", destination);
        }

        Commands::CreateItem {
            region,
            resolution,
            year,
            source,
            destination,
        } => {
            let item = create_item(&tables, &region, resolution, &year, source.as_deref())
                .with_context(|| format!("Invalid dataset {} {}m {}", region, resolution, year))?;

            match item {
                Some(item) => {
                    let path = destination.join(format!("{}.json", item.id));
                    write_json(&path, &item)
                        .with_context(|| format!("Failed to write item to {:?}", path))?;
                    println!("Wrote {:?}", path);
                }
                None => {
                    println!(
                        "No NALCMS dataset for region {} at {} m for {}",
                        region, resolution, year
                    );
                }
            }
        }

        Commands::Tables { output } => {
            let json = serde_json::to_string_pretty(&tables)?;
            match output {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Wrote {} datasets to {:?}", tables.datasets.len(), path);
                }
                None => println!("{}", json),
            }
        }

        Commands::Validate { catalog_dir } => {
            println!("=== STAC Validator (v{}) ===\n", STAC_VERSION);
            println!("Validating {:?}...", catalog_dir);

            let catalog = StacCatalog::load_from_dir(&catalog_dir)
                .with_context(|| format!("Failed to load catalog from {:?}", catalog_dir))?;
            let issues = validate_catalog(&catalog);

            println!("\n=== Validation Results ===");
            println!("Collections: {}", catalog.children.len() + 1);
            println!("Items: {}", catalog.item_count());
            println!("Issues found: {}", issues.len());

            for issue in issues.iter().take(30) {
                println!("  - [{:?}] {}: {}", issue.severity, issue.id, issue.message);
            }
            if issues.len() > 30 {
                println!("  ... and {} more", issues.len() - 30);
            }

            if issues.iter().any(|i| i.severity == Severity::Error) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
