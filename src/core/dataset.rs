/// Writes reduced structures into a sequence/atoms dataset
use crate::bio::fasta::write_fasta_record;
use crate::bio::sequence::Sequence;
use crate::core::atoms::AtomEncoder;
use crate::core::paths::DatasetPaths;
use crate::core::residue_groups::ReducedRecord;
use crate::SeqAtomsError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct DatasetWriter<'a> {
    paths: &'a DatasetPaths,
    encoder: &'a dyn AtomEncoder,
}

impl<'a> DatasetWriter<'a> {
    pub fn new(paths: &'a DatasetPaths, encoder: &'a dyn AtomEncoder) -> Self {
        Self { paths, encoder }
    }

    /// Write both artifacts of a record. On failure neither file is left behind.
    pub fn write(&self, record: &ReducedRecord) -> Result<(), SeqAtomsError> {
        let sequence_path = self.paths.sequence_file(&record.protein_id);
        let atoms_path = self.paths.atoms_file(&record.protein_id);

        let result = self
            .write_sequence(record, &sequence_path)
            .and_then(|_| {
                self.encoder
                    .encode(&record.positions, &record.boundaries, &atoms_path)
            });

        if let Err(e) = result {
            self.discard(&record.protein_id);
            return Err(SeqAtomsError::Write(format!(
                "{}: {}",
                record.protein_id, e
            )));
        }
        Ok(())
    }

    fn write_sequence(&self, record: &ReducedRecord, path: &Path) -> Result<(), SeqAtomsError> {
        let sequence = Sequence::new(record.protein_id.clone(), record.sequence.clone());
        let mut writer = BufWriter::new(File::create(path)?);
        write_fasta_record(&mut writer, &sequence)?;
        writer.flush()?;
        Ok(())
    }

    /// Remove whatever artifacts exist for a protein id
    pub fn discard(&self, protein_id: &str) {
        for path in [
            self.paths.sequence_file(protein_id),
            self.paths.atoms_file(protein_id),
        ] {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!("removed partial artifact {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("could not remove {}: {}", path.display(), e),
            }
        }
    }
}
