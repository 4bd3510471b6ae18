use crate::cli::formatter::{
    self, format_number, print_outcome_table, print_section, print_stats_table, print_success,
    print_warning,
};
use crate::cli::CommandContext;
use crate::core::ingestion::IngestionOrchestrator;
use crate::core::paths::{DataLayout, DatasetPaths, DEFAULT_DATASET_NAME};
use crate::tools::Mmseqs;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BuildDbArgs {
    /// Folders containing structure files (default: <data_root>/structure_files)
    #[arg(short, long, num_args = 1.., value_name = "DIR")]
    pub input: Vec<PathBuf>,

    /// Name of the dataset and target database
    #[arg(short, long, default_value = DEFAULT_DATASET_NAME)]
    pub name: String,

    /// Re-process structures that already have atom files
    #[arg(long)]
    pub overwrite: bool,

    /// Truncate chains longer than this many residues (overrides config)
    #[arg(long, value_name = "RESIDUES")]
    pub max_chain_length: Option<usize>,
}

pub fn run(args: BuildDbArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    formatter::init();

    let config = &ctx.config;
    let layout = DataLayout::new(&config.paths.data_root);
    let inputs = if args.input.is_empty() {
        vec![layout.structure_files()]
    } else {
        args.input
    };

    let mut ingestion = config.ingestion.clone();
    if let Some(max) = args.max_chain_length {
        ingestion.max_chain_length = max;
    }

    let dataset = DatasetPaths::new(layout.seq_atoms_dataset(&args.name));
    let orchestrator = IngestionOrchestrator::new(dataset, &ingestion)?
        .with_workers(ctx.workers())
        .with_overwrite(args.overwrite);
    let engine = Mmseqs::new(&config.paths.mmseqs_binary);

    print_section(&format!("Building dataset '{}'", args.name));
    let report = orchestrator.execute(&inputs, &engine, &layout.mmseqs_databases(&args.name))?;

    if report.discovered == 0 {
        print_warning("No structure files found");
        return Ok(());
    }

    print_stats_table(
        "Ingestion",
        vec![
            ("Structure files found", format_number(report.discovered)),
            ("Already processed", format_number(report.duplicates)),
            ("Processed", format_number(report.processed)),
            ("Succeeded", format_number(report.succeeded)),
            ("Sequence files merged", format_number(report.merged_files)),
        ],
    );
    print_outcome_table(&report.tally);

    if let Some(database) = report.database {
        print_success(&format!("Target database ready at {}", database.display()));
    }
    Ok(())
}
