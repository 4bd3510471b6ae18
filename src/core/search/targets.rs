/// Sequence sources for the alignment stage
use crate::bio::fasta::parse_fasta;
use crate::core::paths::DatasetPaths;
use crate::{Result, SeqAtomsError};
use std::collections::HashMap;
use std::path::Path;

/// Resolve a sequence by id; `None` when it is unknown or unreadable
pub trait SequenceLookup: Sync {
    fn sequence(&self, id: &str) -> Option<Vec<u8>>;
}

impl SequenceLookup for HashMap<String, Vec<u8>> {
    fn sequence(&self, id: &str) -> Option<Vec<u8>> {
        self.get(id).cloned()
    }
}

/// Target sequences read on demand from a dataset's `seq/{id}.faa` files
#[derive(Debug, Clone)]
pub struct TargetSequences {
    dataset: DatasetPaths,
}

impl TargetSequences {
    pub fn new(dataset: DatasetPaths) -> Self {
        Self { dataset }
    }

    pub fn load(&self, id: &str) -> Result<Vec<u8>> {
        let path = self.dataset.sequence_file(id);
        parse_fasta(&path)?
            .into_iter()
            .next()
            .map(|record| record.sequence)
            .ok_or_else(|| SeqAtomsError::Parse(format!("empty sequence file {}", path.display())))
    }
}

impl SequenceLookup for TargetSequences {
    fn sequence(&self, id: &str) -> Option<Vec<u8>> {
        match self.load(id) {
            Ok(sequence) => Some(sequence),
            Err(e) => {
                tracing::warn!("target {} unavailable: {}", id, e);
                None
            }
        }
    }
}

/// Query sequences keyed by FASTA id; a repeated id keeps the last record
pub fn load_query_sequences<P: AsRef<Path>>(path: P) -> Result<HashMap<String, Vec<u8>>> {
    let records = parse_fasta(path.as_ref())?;
    if records.is_empty() {
        return Err(SeqAtomsError::Config(format!(
            "no query sequences in {}",
            path.as_ref().display()
        )));
    }
    Ok(records
        .into_iter()
        .map(|record| (record.id, record.sequence))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_target_lookup() {
        let dir = TempDir::new().unwrap();
        let dataset = DatasetPaths::new(dir.path());
        dataset.create().unwrap();
        std::fs::write(dataset.sequence_file("1abc"), ">1abc\nMKTAYIAKQR\n").unwrap();

        let targets = TargetSequences::new(dataset);
        assert_eq!(targets.sequence("1abc"), Some(b"MKTAYIAKQR".to_vec()));
        assert_eq!(targets.sequence("missing"), None);
    }

    #[test]
    fn test_load_queries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("query.faa");
        std::fs::write(&path, ">q1 first\nMKT\nAYI\n>q2\nQRQ\n").unwrap();

        let queries = load_query_sequences(&path).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries["q1"], b"MKTAYI".to_vec());
    }

    #[test]
    fn test_empty_query_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("query.faa");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(load_query_sequences(&path), Err(SeqAtomsError::Config(_))));
    }
}
