//! Command line interface.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use sheetmeta_core::storage::{read_metadata, read_workbook, to_json_string, write_analysis};
use sheetmeta_core::terms::{raw_labels, styled_labels, term_inventory};
use sheetmeta_core::{ExtractConfig, Workbook, analyze, build_dependency_graph, extract_metadata};

#[derive(Parser)]
#[command(
    name = "sheetmeta",
    version,
    about = "Reconstruct tables, rows and formula dependencies from a spreadsheet cell dump"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show debug logging on stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Extraction settings (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore the per-user config file
    #[arg(long, global = true)]
    no_default_config: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Write metadata.json and dependency_graph.json for a dump
    Extract {
        /// Workbook dump (JSON)
        dump: PathBuf,
        /// Output directory (default: the dump's directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Print the dependency graph of an existing metadata.json
    Graph {
        /// Metadata file written by `extract`
        metadata: PathBuf,
    },
    /// Print the sheet names of a dump
    Sheets { dump: PathBuf },
    /// Print the label texts of each sheet
    Labels {
        dump: PathBuf,
        /// Select labels by cell styling instead of by column
        #[arg(long)]
        styled: bool,
    },
    /// Print every (term, table, sheet) triple of a dump
    Terms { dump: PathBuf },
}

/// Install the stderr log subscriber.
///
/// `--verbose`/`--quiet` win over `RUST_LOG`; without either the default is `warn`.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        let config = ExtractConfig::resolve(self.config.as_deref(), !self.no_default_config)
            .context("Failed to load config")?;
        tracing::debug!("Using config: {:?}", config);

        match &self.command {
            Command::Extract { dump, output } => {
                let workbook = load_workbook(dump)?;
                let analysis = analyze(&workbook, &config);
                let dir = output.clone().unwrap_or_else(|| default_output_dir(dump));
                let (metadata_path, graph_path) = write_analysis(&dir, &analysis)
                    .with_context(|| format!("Failed to write results to {}", dir.display()))?;
                println!("Wrote {}", metadata_path.display());
                println!("Wrote {}", graph_path.display());
            }
            Command::Graph { metadata } => {
                let mut metadata = read_metadata(metadata)
                    .with_context(|| format!("Failed to read {}", metadata.display()))?;
                metadata.refresh_dependencies();
                print!("{}", to_json_string(&build_dependency_graph(&metadata))?);
            }
            Command::Sheets { dump } => {
                let workbook = load_workbook(dump)?;
                print!("{}", to_json_string(&workbook.sheet_names())?);
            }
            Command::Labels { dump, styled } => {
                let workbook = load_workbook(dump)?;
                let labels = if *styled {
                    styled_labels(&workbook, &config)
                } else {
                    raw_labels(&workbook, &config)
                };
                print!("{}", to_json_string(&labels)?);
            }
            Command::Terms { dump } => {
                let workbook = load_workbook(dump)?;
                let metadata = extract_metadata(&workbook, &config);
                print!("{}", to_json_string(&term_inventory(&metadata))?);
            }
        }
        Ok(())
    }
}

fn load_workbook(path: &Path) -> Result<Workbook> {
    read_workbook(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn default_output_dir(dump: &Path) -> PathBuf {
    match dump.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir() {
        assert_eq!(default_output_dir(Path::new("dump.json")), PathBuf::from("."));
        assert_eq!(
            default_output_dir(Path::new("/data/model/dump.json")),
            PathBuf::from("/data/model")
        );
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sheetmeta", "extract", "dump.json", "-o", "out", "--verbose"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Extract { .. }));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["sheetmeta", "-v", "-q", "sheets", "d.json"]).is_err());
    }
}
