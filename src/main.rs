use clap::Parser;
use colored::*;
use seqatoms::cli::{commands, log_level_for, CommandContext, Cli, Commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins, then SEQATOMS_LOG, then the -v count
    let log_level =
        std::env::var("SEQATOMS_LOG").unwrap_or_else(|_| log_level_for(cli.verbose).to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<seqatoms::SeqAtomsError>() {
            Some(seqatoms::SeqAtomsError::Config(_)) => 2,
            Some(seqatoms::SeqAtomsError::Io(_)) => 3,
            Some(seqatoms::SeqAtomsError::Parse(_))
            | Some(seqatoms::SeqAtomsError::Read(_))
            | Some(seqatoms::SeqAtomsError::Alignment(_)) => 4,
            Some(seqatoms::SeqAtomsError::Tool(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = CommandContext::from_cli(&cli)?;

    if cli.verbose > 0 {
        eprintln!("Using {} threads", ctx.workers());
    }

    match cli.command {
        Commands::BuildDb(args) => commands::build_db::run(args, &ctx),
        Commands::Search(args) => commands::search::run(args, &ctx),
        Commands::AlignTable(args) => commands::align_table::run(args, &ctx),
    }
}
