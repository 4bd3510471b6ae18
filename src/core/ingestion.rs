//! Structure-file ingestion: discovery, deduplication, the parallel
//! extraction fan-out and the database build that follows it.

use crate::bio::structure::{read_structure_file, STRUCTURE_SUFFIXES};
use crate::core::atoms::{AtomEncoder, BinaryAtomEncoder, EncoderSession};
use crate::core::config::IngestionConfig;
use crate::core::dataset::DatasetWriter;
use crate::core::paths::{DatasetPaths, ATOMS_SUFFIX, SEQUENCE_SUFFIX, TARGET_DB_NAME};
use crate::core::residue_groups::{Reduction, ResidueGroupReducer};
use crate::tools::PrefilterEngine;
use crate::utils::files::{create_unix_timestamp_folder, merge_files_binary};
use crate::utils::parallel::build_pool;
use crate::utils::progress::task_progress;
use crate::{Result, SeqAtomsError};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of ingesting one structure file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IngestionOutcome {
    Succeed,
    SucceedTruncated(usize),
    TooShort,
    FileReadError,
    FileProcessError,
}

impl fmt::Display for IngestionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestionOutcome::Succeed => write!(f, "SUCCEED"),
            IngestionOutcome::SucceedTruncated(limit) => write!(
                f,
                "succeed, but sequences and contact maps got truncated to {}",
                limit
            ),
            IngestionOutcome::TooShort => {
                write!(f, "sequences too short, probably DNA or corrupted")
            }
            IngestionOutcome::FileReadError => write!(f, "file reading exceptions"),
            IngestionOutcome::FileProcessError => write!(f, "file processing exceptions"),
        }
    }
}

impl IngestionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            IngestionOutcome::Succeed | IngestionOutcome::SucceedTruncated(_)
        )
    }
}

/// Outcome counts keyed by outcome text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    counts: BTreeMap<String, usize>,
}

impl OutcomeTally {
    pub fn count(&self, outcome: &IngestionOutcome) -> usize {
        self.counts.get(&outcome.to_string()).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// `"\t{count} {outcome}"` per distinct outcome, sorted by outcome text
    pub fn lines(&self) -> Vec<String> {
        self.counts
            .iter()
            .map(|(outcome, count)| format!("\t{} {}", count, outcome))
            .collect()
    }
}

pub fn summarize<'a, I>(outcomes: I) -> OutcomeTally
where
    I: IntoIterator<Item = &'a IngestionOutcome>,
{
    let mut tally = OutcomeTally::default();
    for outcome in outcomes {
        *tally.counts.entry(outcome.to_string()).or_insert(0) += 1;
    }
    tally
}

/// Drop every discovered id that already has an atoms file. Returns how many
/// were removed.
pub fn dedupe(existing: &HashSet<String>, discovered: &mut IndexMap<String, PathBuf>) -> usize {
    let before = discovered.len();
    discovered.retain(|protein_id, _| !existing.contains(protein_id));
    before - discovered.len()
}

/// Find every structure file under the input roots, keyed by protein id.
/// Later files win when two map to the same id.
pub fn discover(input_paths: &[PathBuf]) -> Result<IndexMap<String, PathBuf>> {
    let mut files = IndexMap::new();

    for root in input_paths {
        if !root.exists() {
            tracing::warn!("input folder {} does not exist", root.display());
            continue;
        }
        let root_str = root.to_str().ok_or_else(|| {
            SeqAtomsError::Config(format!("non UTF-8 input path: {}", root.display()))
        })?;
        let escaped = glob::Pattern::escape(root_str);

        for (suffix, _, _) in STRUCTURE_SUFFIXES {
            let pattern = format!("{}/**/*{}", escaped, suffix);
            let entries = glob::glob(&pattern)
                .map_err(|e| SeqAtomsError::Config(format!("bad pattern {}: {}", pattern, e)))?;

            let mut found = 0usize;
            for entry in entries {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        tracing::warn!("skipping unreadable path: {}", e);
                        continue;
                    }
                };
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if name.len() <= suffix.len() {
                    continue;
                }
                let protein_id = name[..name.len() - suffix.len()].to_string();
                files.insert(protein_id, path);
                found += 1;
            }

            if found > 0 {
                tracing::info!("Found {} {} files in {}", found, suffix, root.display());
            }
        }
    }

    Ok(files)
}

/// Summary of one ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    pub discovered: usize,
    pub duplicates: usize,
    pub processed: usize,
    /// Files that produced both artifacts, truncated or not
    pub succeeded: usize,
    pub tally: OutcomeTally,
    pub merged_files: usize,
    /// Target database built at the end of the run
    pub database: Option<PathBuf>,
}

pub struct IngestionOrchestrator {
    dataset: DatasetPaths,
    reducer: ResidueGroupReducer,
    encoder: Arc<dyn AtomEncoder>,
    workers: usize,
    overwrite: bool,
    silent: bool,
}

impl IngestionOrchestrator {
    pub fn new(dataset: DatasetPaths, config: &IngestionConfig) -> Result<Self> {
        if config.max_chain_length == 0 {
            return Err(SeqAtomsError::Config(
                "max_chain_length must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            dataset,
            reducer: ResidueGroupReducer::new(config.min_residue_groups, config.max_chain_length),
            encoder: Arc::new(BinaryAtomEncoder::new()),
            workers: 0,
            overwrite: false,
            silent: false,
        })
    }

    pub fn with_encoder(mut self, encoder: Arc<dyn AtomEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Worker count, 0 = one per CPU
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn dataset(&self) -> &DatasetPaths {
        &self.dataset
    }

    /// Protein ids that already have a completed atoms file
    pub fn existing_ids(&self) -> Result<HashSet<String>> {
        let pattern = format!(
            "{}/**/*.{}",
            glob::Pattern::escape(&self.dataset.atoms_dir().to_string_lossy()),
            ATOMS_SUFFIX
        );
        let entries = glob::glob(&pattern)
            .map_err(|e| SeqAtomsError::Config(format!("bad pattern {}: {}", pattern, e)))?;

        Ok(entries
            .filter_map(|entry| entry.ok())
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect())
    }

    /// Extract one structure file into the dataset. Never fails: every error
    /// becomes an outcome.
    pub fn process_file(&self, writer: &DatasetWriter<'_>, path: &Path) -> IngestionOutcome {
        let record = match read_structure_file(path) {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("exception while reading file {}: {:#}", path.display(), e);
                return IngestionOutcome::FileReadError;
            }
        };

        let reduced = match self.reducer.reduce(&record) {
            Reduction::Accepted(reduced) => reduced,
            Reduction::TooShort { groups } => {
                tracing::debug!("{}: only {} residue groups", path.display(), groups);
                return IngestionOutcome::TooShort;
            }
        };

        if let Err(e) = writer.write(&reduced) {
            tracing::error!(
                "exception during file processing {}: {:#}",
                path.display(),
                e
            );
            return IngestionOutcome::FileProcessError;
        }

        match reduced.truncated {
            Some(limit) => IngestionOutcome::SucceedTruncated(limit),
            None => IngestionOutcome::Succeed,
        }
    }

    /// Process every file on a dedicated pool. Results come back in input
    /// order, whatever order workers finish in.
    pub fn run(&self, files: &IndexMap<String, PathBuf>) -> Result<Vec<(String, IngestionOutcome)>> {
        let pool = build_pool(self.workers)?;
        let session = EncoderSession::open(self.encoder.as_ref())?;
        let writer = DatasetWriter::new(&self.dataset, session.encoder());
        let pb = task_progress(files.len(), "Processing structure files", self.silent);

        let tasks: Vec<(&String, &PathBuf)> = files.iter().collect();
        let outcomes = pool.install(|| {
            tasks
                .par_iter()
                .map(|&(protein_id, path)| {
                    let outcome =
                        catch_unwind(AssertUnwindSafe(|| self.process_file(&writer, path)))
                            .unwrap_or_else(|_| {
                                tracing::error!("worker panicked on {}", path.display());
                                writer.discard(protein_id);
                                IngestionOutcome::FileProcessError
                            });
                    pb.inc(1);
                    (protein_id.clone(), outcome)
                })
                .collect::<Vec<_>>()
        });

        pb.finish_and_clear();
        Ok(outcomes)
    }

    /// Merge all sequence files and build a fresh, indexed target database.
    pub fn assemble(&self, engine: &dyn PrefilterEngine, databases: &Path) -> Result<(PathBuf, usize)> {
        let pattern = format!(
            "{}/**/*.{}",
            glob::Pattern::escape(&self.dataset.sequences_dir().to_string_lossy()),
            SEQUENCE_SUFFIX
        );
        let sequence_files: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| SeqAtomsError::Config(format!("bad pattern {}: {}", pattern, e)))?
            .filter_map(|entry| entry.ok())
            .collect();

        tracing::info!(
            "Merging {} sequence files for {}",
            sequence_files.len(),
            engine.name()
        );
        let merged = self.dataset.merged_sequences();
        merge_files_binary(&sequence_files, &merged)?;

        let folder = create_unix_timestamp_folder(databases)?;
        let database = folder.join(TARGET_DB_NAME);
        tracing::info!("Creating new target database {}", folder.display());
        engine.create_db(&merged, &database)?;
        tracing::info!("Indexing new target database {}", folder.display());
        engine.create_index(&database)?;

        Ok((database, sequence_files.len()))
    }

    /// Full stage A: discover, dedupe, process, tally, then build the database.
    pub fn execute(
        &self,
        input_paths: &[PathBuf],
        engine: &dyn PrefilterEngine,
        databases: &Path,
    ) -> Result<IngestionReport> {
        self.dataset.create()?;
        tracing::info!(
            "Sequences and atom positions will be stored in {}",
            self.dataset.root().display()
        );

        let mut files = discover(input_paths)?;
        let mut report = IngestionReport {
            discovered: files.len(),
            ..Default::default()
        };

        if files.is_empty() {
            tracing::info!("No structure files found");
            return Ok(report);
        }
        let version = engine.version()?;
        tracing::debug!("using {} {}", engine.name(), version);

        if !self.overwrite {
            let existing = self.existing_ids()?;
            tracing::info!("Found {} already processed structures", existing.len());
            report.duplicates = dedupe(&existing, &mut files);
            tracing::info!("Found {} duplicated IDs", report.duplicates);
        }

        tracing::info!("Processing {} files", files.len());
        let outcomes = self.run(&files)?;
        report.processed = outcomes.len();
        report.succeeded = outcomes.iter().filter(|(_, o)| o.is_success()).count();
        report.tally = summarize(outcomes.iter().map(|(_, outcome)| outcome));
        for line in report.tally.lines() {
            tracing::info!("{}", line);
        }

        let (database, merged_files) = self.assemble(engine, databases)?;
        report.merged_files = merged_files;
        report.database = Some(database);
        Ok(report)
    }
}
