use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static DEFAULT_DATA_ROOT: OnceLock<PathBuf> = OnceLock::new();

/// Dataset name used when none is given
pub const DEFAULT_DATASET_NAME: &str = "default";
/// Folder holding per-protein sequence files
pub const SEQUENCES: &str = "seq";
/// Folder holding per-protein atom files
pub const ATOMS: &str = "atom";
pub const SEQUENCE_SUFFIX: &str = "faa";
pub const ATOMS_SUFFIX: &str = "bin";
/// Concatenation of every sequence file of a dataset
pub const MERGED_SEQUENCES: &str = "merged_sequences.faa";
pub const TARGET_DB_NAME: &str = "targetDB";
pub const QUERY_DB_NAME: &str = "queryDB";
pub const RESULT_DB_NAME: &str = "resultDB";
/// Best-alignment artifact inside a job directory
pub const ALIGNMENTS: &str = "alignments.json";
pub const JOB_CONFIG: &str = "job_config.json";
pub const SEARCH_RESULTS: &str = "mmseqs_search_results.m8";

/// Get the default data root
/// Checks SEQATOMS_DATA_ROOT environment variable, falls back to /data
pub fn default_data_root() -> PathBuf {
    DEFAULT_DATA_ROOT
        .get_or_init(|| {
            std::env::var("SEQATOMS_DATA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/data"))
        })
        .clone()
}

/// Every pipeline folder, derived from one data root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn structure_files(&self) -> PathBuf {
        self.root.join("structure_files")
    }

    pub fn query(&self) -> PathBuf {
        self.root.join("query")
    }

    pub fn workspace(&self) -> PathBuf {
        self.root.join("workspace")
    }

    pub fn seq_atoms_dataset(&self, name: &str) -> PathBuf {
        self.root.join("seq_atoms_dataset").join(name)
    }

    pub fn mmseqs_databases(&self, name: &str) -> PathBuf {
        self.root.join("mmseqs_db").join(name)
    }
}

/// Layout of one sequence/atoms dataset directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    root: PathBuf,
}

impl DatasetPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sequences_dir(&self) -> PathBuf {
        self.root.join(SEQUENCES)
    }

    pub fn atoms_dir(&self) -> PathBuf {
        self.root.join(ATOMS)
    }

    pub fn sequence_file(&self, protein_id: &str) -> PathBuf {
        self.sequences_dir()
            .join(format!("{}.{}", protein_id, SEQUENCE_SUFFIX))
    }

    pub fn atoms_file(&self, protein_id: &str) -> PathBuf {
        self.atoms_dir().join(format!("{}.{}", protein_id, ATOMS_SUFFIX))
    }

    pub fn merged_sequences(&self) -> PathBuf {
        self.root.join(MERGED_SEQUENCES)
    }

    /// Create the dataset folders; failure here is fatal for a run
    pub fn create(&self) -> Result<(), crate::SeqAtomsError> {
        for dir in [self.root.clone(), self.sequences_dir(), self.atoms_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                crate::SeqAtomsError::Config(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }
}
