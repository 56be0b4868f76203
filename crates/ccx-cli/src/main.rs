use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use ccx_dyna::{CodecConfig, ExportReport};
use ccx_model::{Mesh, MeshStatistics};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ccx-cli")]
#[command(about = "CalculiX mesh to LS-DYNA keyword deck converter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a mesh as `<stem>.dyn`
    Export {
        /// Mesh source (.inp deck or .json mesh store)
        mesh: PathBuf,

        /// Output stem; `.dyn` is appended
        stem: PathBuf,

        /// Codec options (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Omit `$TYPE` markers and reproduce the plain legacy layout
        #[arg(long)]
        legacy: bool,
    },

    /// Read an LS-DYNA deck back into a mesh
    Import {
        /// Input .dyn deck
        deck: PathBuf,

        /// Save the decoded mesh store as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Codec options (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print mesh statistics
    Summary {
        /// Mesh source (.inp deck or .json mesh store)
        mesh: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<CodecConfig> {
    match path {
        Some(path) => CodecConfig::load(path)
            .with_context(|| format!("failed to load codec config {}", path.display())),
        None => Ok(CodecConfig::default()),
    }
}

/// Load a mesh store, chosen by extension: `.json` is a saved store,
/// anything else is parsed as a CalculiX input deck.
fn load_mesh(path: &Path) -> Result<Mesh> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mesh = if is_json {
        ccx_model::load_mesh(path)?
    } else {
        ccx_model::inp::read_mesh_file(path)?
    };
    Ok(mesh)
}

fn write_statistics(out: &mut impl Write, stats: &MeshStatistics) -> io::Result<()> {
    writeln!(out, "{}", stats.format())
}

fn print_report(path: &Path, report: &ExportReport) {
    println!("written: {}", path.display());
    println!("nodes_written: {}", report.nodes_written);
    println!("elements_written: {}", report.elements_written);
    println!("elements_skipped: {}", report.elements_skipped);
    if report.fields_widened > 0 {
        println!("fields_widened: {}", report.fields_widened);
    }
    for diagnostic in &report.diagnostics {
        println!("  element {}: {}", diagnostic.element, diagnostic.reason);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Export {
            mesh,
            stem,
            config,
            legacy,
        } => {
            let mut options = load_config(config.as_deref())?.encode;
            if legacy {
                options.type_markers = false;
            }
            let source = load_mesh(&mesh)
                .with_context(|| format!("failed to read mesh {}", mesh.display()))?;
            let (path, report) = ccx_dyna::export_to_stem(&source, &stem, &options)?;
            tracing::info!(
                source = %mesh.display(),
                output = %path.display(),
                complete = report.is_complete(),
                "export finished"
            );
            print_report(&path, &report);
        }
        Commands::Import { deck, json, config } => {
            let options = load_config(config.as_deref())?.decode;
            let mesh = ccx_dyna::import_file(&deck, &options)
                .with_context(|| format!("failed to import {}", deck.display()))?;
            tracing::info!(
                deck = %deck.display(),
                nodes = mesh.node_count(),
                elements = mesh.element_count(),
                "import finished"
            );
            write_statistics(&mut io::stdout().lock(), &mesh.statistics())?;
            if let Some(out) = json {
                ccx_model::save_mesh(&out, &mesh)
                    .with_context(|| format!("failed to save {}", out.display()))?;
                println!("saved: {}", out.display());
            }
        }
        Commands::Summary { mesh } => {
            let source = load_mesh(&mesh)
                .with_context(|| format!("failed to read mesh {}", mesh.display()))?;
            write_statistics(&mut io::stdout().lock(), &source.statistics())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
