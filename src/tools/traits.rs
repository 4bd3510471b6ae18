/// Trait definitions for external tool abstractions
///
/// The prefilter engine builds sequence databases and produces the hit
/// table that alignment search consumes. Implementations can be swapped
/// for testing without spawning external processes.
use crate::Result;
use std::path::Path;

/// Common interface for k-mer prefilter search tools
pub trait PrefilterEngine: Send + Sync {
    /// Build a protein database from a FASTA file
    fn create_db(&self, sequences: &Path, database: &Path) -> Result<()>;

    /// Build the search index of an existing database
    fn create_index(&self, database: &Path) -> Result<()>;

    /// Search a query database against a target database
    fn search(&self, query_db: &Path, target_db: &Path, result_db: &Path) -> Result<()>;

    /// Convert a result database into a tab-separated hit table
    fn convert_alignments(
        &self,
        query_db: &Path,
        target_db: &Path,
        result_db: &Path,
        output: &Path,
    ) -> Result<()>;

    /// Report the engine version; fails when the engine cannot run at all
    fn version(&self) -> Result<String>;

    /// Get the name of this engine
    fn name(&self) -> &str;
}
