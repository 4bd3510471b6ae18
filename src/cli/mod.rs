pub mod commands;
pub mod formatter;

use crate::core::config::{load_config, Config};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "seqatoms",
    version,
    about = "Protein structure ingestion and alignment search",
    long_about = "seqatoms extracts sequences and atom positions from PDB/mmCIF files into a \
                  searchable dataset, builds an MMseqs2 target database from it, and picks the \
                  best-aligned reference structure for each query sequence."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,

    /// Configuration file
    #[arg(short = 'c', long, global = true, env = "SEQATOMS_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract structure files into a dataset and build its target database
    BuildDb(commands::build_db::BuildDbArgs),

    /// Search query sequences against a dataset and keep the best alignments
    Search(commands::search::SearchArgs),

    /// Align queries against the hits of an existing prefilter table
    AlignTable(commands::align_table::AlignTableArgs),
}

/// Tracing level selected by repeated `-v` flags
pub fn log_level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub verbose: u8,
}

impl CommandContext {
    /// Load the config file if one was given; `--threads` overrides it
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        if cli.threads != 0 {
            config.performance.threads = cli.threads;
        }
        Ok(Self {
            config,
            verbose: cli.verbose,
        })
    }

    pub fn workers(&self) -> usize {
        self.config.performance.worker_count()
    }
}
