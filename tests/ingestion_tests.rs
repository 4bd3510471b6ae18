/// End-to-end tests for structure ingestion and the target database build
mod common;

use common::*;
use pretty_assertions::assert_eq;
use seqatoms::core::atoms::{read_atoms, AtomEncoder};
use seqatoms::core::config::IngestionConfig;
use seqatoms::core::ingestion::{IngestionOrchestrator, IngestionOutcome};
use seqatoms::core::paths::DatasetPaths;
use seqatoms::SeqAtomsError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn orchestrator(env: &TestEnvironment, max_chain_length: usize) -> IngestionOrchestrator {
    let config = IngestionConfig {
        max_chain_length,
        ..Default::default()
    };
    IngestionOrchestrator::new(DatasetPaths::new(env.path("dataset")), &config)
        .unwrap()
        .with_workers(2)
        .with_silent(true)
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn test_successful_ingestion_writes_artifacts() {
    let env = TestEnvironment::new();
    let input = env.dir("structures");
    write_file(&input.join("1abc.pdb"), &pdb_text(12, 3));
    write_file(&input.join("nested/2def.cif"), &mmcif_text(10, 2));

    let engine = RecordingEngine::default();
    let orch = orchestrator(&env, 2500);
    let report = orch.execute(&[input], &engine, &env.path("mmseqs_db")).unwrap();

    assert_eq!(report.discovered, 2);
    assert_eq!(report.tally.count(&IngestionOutcome::Succeed), 2);

    let dataset = orch.dataset();
    let faa = std::fs::read_to_string(dataset.sequence_file("1abc")).unwrap();
    assert_eq!(faa, format!(">1abc\n{}\n", expected_sequence(12)));

    let atoms = read_atoms(&dataset.atoms_file("1abc")).unwrap();
    assert_eq!(atoms.boundaries.len(), 13);
    assert_eq!(atoms.positions.len(), 36);
    assert_eq!(atoms.boundaries[12], 36);

    let cif_atoms = read_atoms(&dataset.atoms_file("2def")).unwrap();
    assert_eq!(cif_atoms.boundaries.len(), 11);

    // Merged corpus holds both records, byte for byte
    let merged = std::fs::read_to_string(dataset.merged_sequences()).unwrap();
    assert!(merged.contains(">1abc\n"));
    assert!(merged.contains(">2def\n"));

    let calls = engine.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].starts_with("createdb"));
    assert!(calls[0].ends_with("targetDB"));
    assert!(calls[1].starts_with("createindex"));
    assert!(report.database.unwrap().ends_with("targetDB"));
}

#[test]
fn test_short_chain_creates_no_files() {
    let env = TestEnvironment::new();
    let input = env.dir("structures");
    write_file(&input.join("dna1.pdb"), &pdb_text(8, 2));

    let orch = orchestrator(&env, 2500);
    let report = orch
        .execute(&[input], &RecordingEngine::default(), &env.path("mmseqs_db"))
        .unwrap();

    assert_eq!(report.tally.count(&IngestionOutcome::TooShort), 1);
    assert!(!orch.dataset().sequence_file("dna1").exists());
    assert!(!orch.dataset().atoms_file("dna1").exists());
}

#[test]
fn test_long_chain_is_truncated() {
    let env = TestEnvironment::new();
    let input = env.dir("structures");
    write_file(&input.join("long.pdb"), &pdb_text(30, 2));

    let orch = orchestrator(&env, 20);
    let report = orch
        .execute(&[input], &RecordingEngine::default(), &env.path("mmseqs_db"))
        .unwrap();

    assert_eq!(report.tally.count(&IngestionOutcome::SucceedTruncated(20)), 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(
        report.tally.lines(),
        vec!["\t1 succeed, but sequences and contact maps got truncated to 20"]
    );

    let faa = std::fs::read_to_string(orch.dataset().sequence_file("long")).unwrap();
    assert_eq!(faa, format!(">long\n{}\n", expected_sequence(20)));
    let atoms = read_atoms(&orch.dataset().atoms_file("long")).unwrap();
    assert_eq!(atoms.boundaries.len(), 21);
    assert_eq!(atoms.boundaries[20], 40);
    assert_eq!(atoms.positions.len(), 40);
}

#[test]
fn test_second_run_is_idempotent() {
    let env = TestEnvironment::new();
    let input = env.dir("structures");
    for id in ["1abc", "2def", "3ghi"] {
        write_file(&input.join(format!("{}.pdb", id)), &pdb_text(10, 1));
    }
    let databases = env.path("mmseqs_db");
    let orch = orchestrator(&env, 2500);

    let first = orch
        .execute(&[input.clone()], &RecordingEngine::default(), &databases)
        .unwrap();
    assert_eq!(first.tally.count(&IngestionOutcome::Succeed), 3);
    let atoms_before = count_files(&orch.dataset().atoms_dir());

    let second = orch
        .execute(&[input], &RecordingEngine::default(), &databases)
        .unwrap();

    assert_eq!(second.duplicates, 3);
    assert_eq!(second.processed, 0);
    assert_eq!(second.tally.total(), 0);
    assert_eq!(count_files(&orch.dataset().atoms_dir()), atoms_before);
}

#[test]
fn test_overwrite_reprocesses() {
    let env = TestEnvironment::new();
    let input = env.dir("structures");
    write_file(&input.join("1abc.pdb"), &pdb_text(10, 1));
    let databases = env.path("mmseqs_db");

    orchestrator(&env, 2500)
        .execute(&[input.clone()], &RecordingEngine::default(), &databases)
        .unwrap();
    let report = orchestrator(&env, 2500)
        .with_overwrite(true)
        .execute(&[input], &RecordingEngine::default(), &databases)
        .unwrap();

    assert_eq!(report.duplicates, 0);
    assert_eq!(report.processed, 1);
}

#[test]
fn test_gzip_inputs() {
    let env = TestEnvironment::new();
    let input = env.dir("structures");
    write_gz_file(&input.join("1abc.pdb.gz"), &pdb_text(11, 2));
    write_gz_file(&input.join("2def.cif.gz"), &mmcif_text(9, 1));
    write_gz_file(&input.join("pdb3ghi.ent.gz"), &pdb_text(9, 1));

    let orch = orchestrator(&env, 2500);
    let report = orch
        .execute(&[input], &RecordingEngine::default(), &env.path("mmseqs_db"))
        .unwrap();

    assert_eq!(report.tally.count(&IngestionOutcome::Succeed), 3);
    assert!(orch.dataset().atoms_file("1abc").exists());
    assert!(orch.dataset().atoms_file("2def").exists());
    assert!(orch.dataset().atoms_file("pdb3ghi").exists());
}

#[test]
fn test_bad_files_do_not_abort_batch() {
    let env = TestEnvironment::new();
    let input = env.dir("structures");
    write_file(&input.join("good.pdb"), &pdb_text(10, 1));
    write_file(&input.join("empty.pdb"), "HEADER    NOTHING HERE\nEND\n");
    write_file(
        &input.join("broken.pdb"),
        "ATOM      1  CA  GLY A   1       1.000   abc     1.000  1.00  0.00           C\n",
    );
    // Not gzip despite the suffix
    write_file(&input.join("fake.cif.gz"), "data_FAKE\n");

    let orch = orchestrator(&env, 2500);
    let report = orch
        .execute(&[input], &RecordingEngine::default(), &env.path("mmseqs_db"))
        .unwrap();

    assert_eq!(report.processed, 4);
    assert_eq!(report.tally.count(&IngestionOutcome::Succeed), 1);
    assert_eq!(report.tally.count(&IngestionOutcome::FileReadError), 3);
    assert!(orch.dataset().atoms_file("good").exists());
}

struct FlakyEncoder {
    calls: AtomicUsize,
}

impl AtomEncoder for FlakyEncoder {
    fn encode(&self, _: &[[f32; 3]], _: &[i32], output: &Path) -> seqatoms::Result<()> {
        if output.file_stem().and_then(|s| s.to_str()) == Some("bad") {
            std::fs::write(output, b"half")?;
            return Err(SeqAtomsError::Write("simulated failure".to_string()));
        }
        if output.file_stem().and_then(|s| s.to_str()) == Some("boom") {
            panic!("encoder crashed");
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::fs::write(output, b"ok")?;
        Ok(())
    }
}

#[test]
fn test_write_failures_and_panics_are_isolated() {
    let env = TestEnvironment::new();
    let input = env.dir("structures");
    for id in ["good", "bad", "boom"] {
        write_file(&input.join(format!("{}.pdb", id)), &pdb_text(10, 1));
    }

    let encoder = Arc::new(FlakyEncoder {
        calls: AtomicUsize::new(0),
    });
    let orch = orchestrator(&env, 2500).with_encoder(encoder.clone());
    let report = orch
        .execute(&[input], &RecordingEngine::default(), &env.path("mmseqs_db"))
        .unwrap();

    assert_eq!(report.tally.count(&IngestionOutcome::Succeed), 1);
    assert_eq!(report.tally.count(&IngestionOutcome::FileProcessError), 2);
    assert_eq!(encoder.calls.load(Ordering::SeqCst), 1);
    for id in ["bad", "boom"] {
        assert!(!orch.dataset().sequence_file(id).exists());
        assert!(!orch.dataset().atoms_file(id).exists());
    }
}

#[test]
fn test_no_structure_files_skips_downstream() {
    let env = TestEnvironment::new();
    let input = env.dir("empty");
    let engine = RecordingEngine::default();

    let report = orchestrator(&env, 2500)
        .execute(&[input, PathBuf::from("/nonexistent/input")], &engine, &env.path("mmseqs_db"))
        .unwrap();

    assert_eq!(report.discovered, 0);
    assert!(report.database.is_none());
    assert!(engine.calls().is_empty());
    assert!(!env.path("mmseqs_db").exists());
}

#[test]
fn test_no_structure_files_skip_engine_version_check() {
    let env = TestEnvironment::new();
    let engine = RecordingEngine::unavailable();

    let report = orchestrator(&env, 2500)
        .execute(&[env.dir("empty")], &engine, &env.path("mmseqs_db"))
        .unwrap();

    assert_eq!(report.discovered, 0);
}

#[test]
fn test_unavailable_engine_fails_before_processing() {
    let env = TestEnvironment::new();
    let input = env.dir("structures");
    write_file(&input.join("1abc.pdb"), &pdb_text(12, 3));

    let orch = orchestrator(&env, 2500);
    let result = orch.execute(&[input], &RecordingEngine::unavailable(), &env.path("mmseqs_db"));

    assert!(matches!(result, Err(SeqAtomsError::Tool(_))));
    assert!(!orch.dataset().atoms_file("1abc").exists());
}

#[test]
fn test_unwritable_dataset_is_config_error() {
    let env = TestEnvironment::new();
    // A regular file where the dataset directory should go
    let blocker = write_file(&env.path("blocker"), "");
    let orch = IngestionOrchestrator::new(
        DatasetPaths::new(blocker.join("dataset")),
        &IngestionConfig::default(),
    )
    .unwrap();

    let result = orch.execute(&[env.dir("in")], &RecordingEngine::default(), &env.path("db"));
    assert!(matches!(result, Err(SeqAtomsError::Config(_))));
}
