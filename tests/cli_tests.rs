/// Command-level tests: each command must honour its short-circuits before
/// touching the external prefilter binary
mod common;

use common::*;
use seqatoms::cli::commands::build_db::{self, BuildDbArgs};
use seqatoms::cli::commands::search::{self, SearchArgs};
use seqatoms::cli::CommandContext;
use seqatoms::core::config::Config;
use seqatoms::core::paths::ALIGNMENTS;
use seqatoms::SeqAtomsError;

/// Context rooted in the test environment with no usable mmseqs binary
fn context(env: &TestEnvironment) -> CommandContext {
    let mut config = Config::default();
    config.paths.data_root = env.path("data");
    config.paths.mmseqs_binary = env.path("missing/mmseqs");
    config.performance.threads = 1;
    CommandContext { config, verbose: 0 }
}

#[test]
fn test_search_with_cached_artifact_needs_no_database_or_binary() {
    let env = TestEnvironment::new();
    let job = env.dir("job");
    write_file(&job.join(ALIGNMENTS), "{}");

    let args = SearchArgs {
        query: env.path("query.faa"),
        name: "default".to_string(),
        job,
    };

    search::run(args, &context(&env)).unwrap();
}

#[test]
fn test_search_cache_miss_without_database_fails() {
    let env = TestEnvironment::new();
    let args = SearchArgs {
        query: env.path("query.faa"),
        name: "default".to_string(),
        job: env.path("job"),
    };

    assert!(search::run(args, &context(&env)).is_err());
}

#[test]
fn test_build_db_with_no_inputs_exits_cleanly() {
    let env = TestEnvironment::new();
    let args = BuildDbArgs {
        input: vec![env.dir("empty")],
        name: "default".to_string(),
        overwrite: false,
        max_chain_length: None,
    };

    build_db::run(args, &context(&env)).unwrap();
    assert!(!env.path("data/mmseqs_db").exists());
}

#[test]
fn test_build_db_with_inputs_reports_missing_binary() {
    let env = TestEnvironment::new();
    let input = env.dir("structures");
    write_file(&input.join("1abc.pdb"), &pdb_text(12, 3));
    let args = BuildDbArgs {
        input: vec![input],
        name: "default".to_string(),
        overwrite: false,
        max_chain_length: None,
    };

    let err = build_db::run(args, &context(&env)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SeqAtomsError>(),
        Some(SeqAtomsError::Tool(_))
    ));
}
