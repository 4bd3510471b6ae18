use crate::cli::commands::{job_alignment_config, print_search_report};
use crate::cli::formatter::{self, print_section, print_success};
use crate::cli::CommandContext;
use crate::core::paths::{DataLayout, DatasetPaths, ALIGNMENTS, DEFAULT_DATASET_NAME};
use crate::core::search::{load_query_sequences, read_hit_table, AlignmentSearch, TargetSequences};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct AlignTableArgs {
    /// Prefilter hit table (tab-separated, BLAST m8 columns)
    #[arg(long, value_name = "FILE")]
    pub hits: PathBuf,

    /// Query sequences (FASTA, optionally gzipped)
    #[arg(short, long, value_name = "FILE")]
    pub query: PathBuf,

    /// Dataset holding the target sequences
    #[arg(short, long, default_value = DEFAULT_DATASET_NAME)]
    pub name: String,

    /// Job directory for the result artifact
    #[arg(long, value_name = "DIR")]
    pub job: PathBuf,
}

pub fn run(args: AlignTableArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    formatter::init();

    let config = &ctx.config;
    let layout = DataLayout::new(&config.paths.data_root);
    let targets = TargetSequences::new(DatasetPaths::new(layout.seq_atoms_dataset(&args.name)));
    let alignment = job_alignment_config(&args.job, &config.alignment)?;

    let queries = load_query_sequences(&args.query)
        .with_context(|| format!("reading queries from {}", args.query.display()))?;
    let hits = read_hit_table(&args.hits)
        .with_context(|| format!("reading hit table {}", args.hits.display()))?;

    print_section(&format!("Aligning {} prefilter hits", hits.len()));
    let search = AlignmentSearch::new(alignment).with_workers(ctx.workers());
    let (_, report) = search.get_or_compute(&args.job, &queries, hits, &targets)?;

    print_search_report(&report);
    print_success(&format!(
        "Best alignments written to {}",
        args.job.join(ALIGNMENTS).display()
    ));
    Ok(())
}
