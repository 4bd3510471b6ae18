use crate::core::search::selector::BestAlignmentMap;
use crate::{Result, SeqAtomsError};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The per-job best-alignment artifact. Once written it is never recomputed.
#[derive(Debug, Clone)]
pub struct AlignmentResultCache {
    path: PathBuf,
}

impl AlignmentResultCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<Option<BestAlignmentMap>> {
        if !self.exists() {
            return Ok(None);
        }
        let contents = std::fs::read(&self.path)?;
        let map = serde_json::from_slice(&contents).map_err(|e| {
            SeqAtomsError::Serialization(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(Some(map))
    }

    /// Write to a temporary file beside the artifact, then rename it into place
    pub fn store(&self, alignments: &BestAlignmentMap) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, alignments)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| SeqAtomsError::Io(e.error))?;
        Ok(())
    }
}
