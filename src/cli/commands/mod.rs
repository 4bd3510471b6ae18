pub mod align_table;
pub mod build_db;
pub mod search;

use crate::cli::formatter::{format_number, print_stats_table};
use crate::core::config::AlignmentConfig;
use crate::core::paths::JOB_CONFIG;
use crate::core::search::SearchReport;
use std::path::Path;

/// Alignment settings for a job: its `job_config.json` when present,
/// otherwise the `[alignment]` section of the loaded config
pub(crate) fn job_alignment_config(
    job: &Path,
    fallback: &AlignmentConfig,
) -> anyhow::Result<AlignmentConfig> {
    let path = job.join(JOB_CONFIG);
    if path.is_file() {
        tracing::info!("Using job configuration {}", path.display());
        Ok(AlignmentConfig::load_job_config(&path)?)
    } else {
        Ok(fallback.clone())
    }
}

pub(crate) fn print_search_report(report: &SearchReport) {
    if report.cached {
        print_stats_table(
            "Alignment search (cached)",
            vec![("Queries with a best alignment", format_number(report.selected))],
        );
        return;
    }
    print_stats_table(
        "Alignment search",
        vec![
            ("Prefilter hits", format_number(report.total_hits)),
            ("Filtered out", format_number(report.filtered_out)),
            ("Missing sequences", format_number(report.unresolved)),
            ("Aligned", format_number(report.aligned)),
            ("Failed alignments", format_number(report.failed)),
            ("Below identity floor", format_number(report.below_identity_floor)),
            ("Queries with a best alignment", format_number(report.selected)),
        ],
    );
}
