use crate::cli::commands::{job_alignment_config, print_search_report};
use crate::cli::formatter::{self, print_section, print_success};
use crate::cli::CommandContext;
use crate::core::paths::{DataLayout, DatasetPaths, ALIGNMENTS, DEFAULT_DATASET_NAME};
use crate::core::search::{AlignmentSearch, TargetSequences};
use crate::tools::Mmseqs;
use crate::utils::files::latest_target_database;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query sequences (FASTA, optionally gzipped)
    #[arg(short, long, value_name = "FILE")]
    pub query: PathBuf,

    /// Dataset to search against
    #[arg(short, long, default_value = DEFAULT_DATASET_NAME)]
    pub name: String,

    /// Job directory; holds intermediate databases and the result artifact
    #[arg(long, value_name = "DIR")]
    pub job: PathBuf,
}

pub fn run(args: SearchArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    formatter::init();

    let artifact = args.job.join(ALIGNMENTS);
    if let Some((_, report)) = AlignmentSearch::cached_result(&args.job)? {
        print_search_report(&report);
        print_success(&format!("Best alignments already in {}", artifact.display()));
        return Ok(());
    }

    let config = &ctx.config;
    let layout = DataLayout::new(&config.paths.data_root);
    let target_db = latest_target_database(&layout.mmseqs_databases(&args.name))
        .with_context(|| format!("dataset '{}' has no target database", args.name))?;
    let targets = TargetSequences::new(DatasetPaths::new(layout.seq_atoms_dataset(&args.name)));
    let alignment = job_alignment_config(&args.job, &config.alignment)?;

    print_section(&format!("Searching {}", args.query.display()));
    let search = AlignmentSearch::new(alignment).with_workers(ctx.workers());
    let engine = Mmseqs::new(&config.paths.mmseqs_binary);
    let (_, report) = search.run_job(&engine, &args.query, &target_db, &targets, &args.job)?;

    print_search_report(&report);
    print_success(&format!("Best alignments written to {}", artifact.display()));
    Ok(())
}
