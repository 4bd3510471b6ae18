//! Alignment search: filter prefilter hits, align the survivors in parallel,
//! keep the best alignment per query and cache the result per job.

pub mod cache;
pub mod filter;
pub mod hits;
pub mod selector;
pub mod targets;

pub use cache::AlignmentResultCache;
pub use filter::{AlignmentFilter, FilterResult};
pub use hits::{read_hit_table, AlignmentCandidate};
pub use selector::{BestAlignment, BestAlignmentMap, BestHitSelector};
pub use targets::{load_query_sequences, SequenceLookup, TargetSequences};

use crate::bio::alignment::{NeedlemanWunsch, PairwiseAligner, PairwiseAlignment};
use crate::core::config::AlignmentConfig;
use crate::core::paths::{ALIGNMENTS, QUERY_DB_NAME, RESULT_DB_NAME, SEARCH_RESULTS};
use crate::tools::PrefilterEngine;
use crate::utils::parallel::build_pool;
use crate::utils::progress::task_progress;
use crate::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

/// Counts for one alignment job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    /// Result came from an existing artifact; all other counts are zero
    pub cached: bool,
    pub total_hits: usize,
    pub filtered_out: usize,
    pub aligned: usize,
    pub unresolved: usize,
    /// Alignments that panicked; logged and left out of selection
    pub failed: usize,
    pub below_identity_floor: usize,
    pub selected: usize,
}

/// One unit of pairwise work. Scoring is shared through the aligner.
struct AlignmentTask<'a> {
    query_id: &'a str,
    target_id: &'a str,
    query: Arc<Vec<u8>>,
    target: Arc<Vec<u8>>,
}

pub struct AlignmentSearch {
    config: AlignmentConfig,
    aligner: Arc<dyn PairwiseAligner>,
    workers: usize,
    silent: bool,
}

impl AlignmentSearch {
    pub fn new(config: AlignmentConfig) -> Self {
        let aligner = Arc::new(NeedlemanWunsch::new(config.scoring()));
        Self {
            config,
            aligner,
            workers: 0,
            silent: false,
        }
    }

    pub fn with_aligner(mut self, aligner: Arc<dyn PairwiseAligner>) -> Self {
        self.aligner = aligner;
        self
    }

    /// Worker count, 0 = one per CPU
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Return the job's cached best alignments, computing and storing them
    /// first if the artifact does not exist yet.
    pub fn get_or_compute(
        &self,
        job_path: &Path,
        queries: &HashMap<String, Vec<u8>>,
        candidates: Vec<AlignmentCandidate>,
        targets: &dyn SequenceLookup,
    ) -> Result<(BestAlignmentMap, SearchReport)> {
        let cache = AlignmentResultCache::new(job_path.join(ALIGNMENTS));
        if let Some(hit) = Self::cached(&cache)? {
            return Ok(hit);
        }
        self.config.validate()?;

        let (best, report) = self.compute(queries, candidates, targets)?;
        cache.store(&best)?;
        Ok((best, report))
    }

    /// Best alignments already stored in the job directory, if any
    pub fn cached_result(job_path: &Path) -> Result<Option<(BestAlignmentMap, SearchReport)>> {
        Self::cached(&AlignmentResultCache::new(job_path.join(ALIGNMENTS)))
    }

    fn cached(cache: &AlignmentResultCache) -> Result<Option<(BestAlignmentMap, SearchReport)>> {
        let Some(best) = cache.load()? else {
            return Ok(None);
        };
        tracing::info!("Using cached alignments from {}", cache.path().display());
        let report = SearchReport {
            cached: true,
            selected: best.len(),
            ..Default::default()
        };
        Ok(Some((best, report)))
    }

    fn compute(
        &self,
        queries: &HashMap<String, Vec<u8>>,
        candidates: Vec<AlignmentCandidate>,
        targets: &dyn SequenceLookup,
    ) -> Result<(BestAlignmentMap, SearchReport)> {
        let mut report = SearchReport {
            total_hits: candidates.len(),
            ..Default::default()
        };
        tracing::info!("Prefilter search output is {} long", candidates.len());

        let query_ids: HashSet<String> = queries.keys().cloned().collect();
        let filtered = AlignmentFilter::from(&self.config).filter(candidates, &query_ids);
        report.filtered_out = filtered.dropped;
        tracing::info!(
            "Filtered {} prefilter matches. Total alignments to check {}",
            filtered.dropped,
            filtered.retained.len()
        );

        let tasks = self.resolve_tasks(&filtered.retained, queries, targets);
        report.unresolved = filtered.retained.len() - tasks.len();

        let alignments = self.align_all(&tasks)?;
        report.failed = alignments.iter().filter(|a| a.is_none()).count();
        report.aligned = alignments.len() - report.failed;

        let selection = BestHitSelector::new(self.config.min_sequence_identity).select(
            tasks
                .iter()
                .zip(alignments)
                .filter_map(|(task, alignment)| {
                    alignment.map(|alignment| (task.query_id, task.target_id, alignment))
                }),
        );
        report.below_identity_floor = selection.below_identity_floor;
        report.selected = selection.best.len();

        Ok((selection.best, report))
    }

    /// Pair every candidate with its sequences, in candidate order. Rows whose
    /// sequences cannot be found are logged and skipped.
    fn resolve_tasks<'a>(
        &self,
        candidates: &'a [AlignmentCandidate],
        queries: &HashMap<String, Vec<u8>>,
        targets: &dyn SequenceLookup,
    ) -> Vec<AlignmentTask<'a>> {
        let mut query_memo: HashMap<&str, Arc<Vec<u8>>> = HashMap::new();
        let mut target_memo: HashMap<&str, Option<Arc<Vec<u8>>>> = HashMap::new();
        let mut tasks = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let query = match queries.get(&candidate.query_id) {
                Some(sequence) => query_memo
                    .entry(candidate.query_id.as_str())
                    .or_insert_with(|| Arc::new(sequence.clone()))
                    .clone(),
                None => {
                    tracing::warn!("query {} has no sequence", candidate.query_id);
                    continue;
                }
            };
            let target = target_memo
                .entry(candidate.target_id.as_str())
                .or_insert_with(|| targets.sequence(&candidate.target_id).map(Arc::new))
                .clone();
            let Some(target) = target else {
                tracing::warn!(
                    "dropping hit {} -> {}: target sequence not found",
                    candidate.query_id,
                    candidate.target_id
                );
                continue;
            };

            tasks.push(AlignmentTask {
                query_id: &candidate.query_id,
                target_id: &candidate.target_id,
                query,
                target,
            });
        }

        tasks
    }

    /// Align every task on a dedicated pool, results in task order. A task
    /// that panics yields `None` without disturbing the others.
    fn align_all(&self, tasks: &[AlignmentTask<'_>]) -> Result<Vec<Option<PairwiseAlignment>>> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let pool = build_pool(self.workers)?;
        let pb = task_progress(tasks.len(), "Aligning candidates", self.silent);
        let aligner = self.aligner.as_ref();

        let alignments = pool.install(|| {
            tasks
                .par_iter()
                .map(|task| {
                    let alignment =
                        catch_unwind(AssertUnwindSafe(|| aligner.align(&task.query, &task.target)))
                            .map_err(|_| {
                                tracing::error!(
                                    "alignment of {} against {} panicked",
                                    task.query_id,
                                    task.target_id
                                );
                            })
                            .ok();
                    pb.inc(1);
                    alignment
                })
                .collect::<Vec<_>>()
        });

        pb.finish_and_clear();
        Ok(alignments)
    }

    /// Full stage B for one job: prefilter search of the query FASTA against a
    /// target database, then `get_or_compute` on the resulting hit table.
    pub fn run_job(
        &self,
        engine: &dyn PrefilterEngine,
        query_fasta: &Path,
        target_db: &Path,
        targets: &dyn SequenceLookup,
        job_path: &Path,
    ) -> Result<(BestAlignmentMap, SearchReport)> {
        if let Some(hit) = Self::cached_result(job_path)? {
            return Ok(hit);
        }
        let version = engine.version()?;
        tracing::debug!("using {} {}", engine.name(), version);

        std::fs::create_dir_all(job_path)?;
        let queries = load_query_sequences(query_fasta)?;

        let query_db = job_path.join(QUERY_DB_NAME);
        let result_db = job_path.join(RESULT_DB_NAME);
        let hit_table = job_path.join(SEARCH_RESULTS);

        engine.create_db(query_fasta, &query_db)?;
        tracing::info!("Searching {} against {}", query_fasta.display(), target_db.display());
        engine.search(&query_db, target_db, &result_db)?;
        engine.convert_alignments(&query_db, target_db, &result_db, &hit_table)?;

        let candidates = read_hit_table(&hit_table)?;
        self.get_or_compute(job_path, &queries, candidates, targets)
    }
}
