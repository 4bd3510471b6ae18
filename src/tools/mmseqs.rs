use crate::tools::traits::PrefilterEngine;
use crate::{Result, SeqAtomsError};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// MMseqs2 command-line integration
#[derive(Debug, Clone)]
pub struct Mmseqs {
    binary_path: PathBuf,
}

impl Default for Mmseqs {
    fn default() -> Self {
        Self::new("mmseqs")
    }
}

impl Mmseqs {
    pub fn new<P: Into<PathBuf>>(binary_path: P) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    fn run<I, S>(&self, module: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.binary_path);
        cmd.arg(module).args(args);
        tracing::debug!("running {:?}", cmd);

        let output = cmd.output().map_err(|e| self.spawn_error(module, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SeqAtomsError::Tool(format!(
                "mmseqs {} failed with exit code {:?}: {}",
                module,
                output.status.code(),
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn spawn_error(&self, module: &str, e: std::io::Error) -> SeqAtomsError {
        SeqAtomsError::Tool(format!(
            "failed to run {} {}: {}",
            self.binary_path.display(),
            module,
            e
        ))
    }

    fn scratch_dir() -> Result<TempDir> {
        TempDir::new()
            .map_err(|e| SeqAtomsError::Tool(format!("cannot create mmseqs tmp dir: {}", e)))
    }
}

impl PrefilterEngine for Mmseqs {
    fn create_db(&self, sequences: &Path, database: &Path) -> Result<()> {
        tracing::info!(
            "creating mmseqs database {} from {}",
            database.display(),
            sequences.display()
        );
        self.run(
            "createdb",
            [
                sequences.as_os_str(),
                database.as_os_str(),
                OsStr::new("--dbtype"),
                OsStr::new("1"),
            ],
        )
    }

    fn create_index(&self, database: &Path) -> Result<()> {
        let tmp = Self::scratch_dir()?;
        tracing::info!("indexing mmseqs database {}", database.display());
        self.run("createindex", [database.as_os_str(), tmp.path().as_os_str()])
    }

    fn search(&self, query_db: &Path, target_db: &Path, result_db: &Path) -> Result<()> {
        let tmp = Self::scratch_dir()?;
        self.run(
            "search",
            [
                query_db.as_os_str(),
                target_db.as_os_str(),
                result_db.as_os_str(),
                tmp.path().as_os_str(),
            ],
        )
    }

    fn convert_alignments(
        &self,
        query_db: &Path,
        target_db: &Path,
        result_db: &Path,
        output: &Path,
    ) -> Result<()> {
        self.run(
            "convertalis",
            [
                query_db.as_os_str(),
                target_db.as_os_str(),
                result_db.as_os_str(),
                output.as_os_str(),
            ],
        )
    }

    fn version(&self) -> Result<String> {
        let output = Command::new(&self.binary_path)
            .arg("version")
            .output()
            .map_err(|e| self.spawn_error("version", e))?;

        if !output.status.success() {
            return Err(SeqAtomsError::Tool("mmseqs version returned error".to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn name(&self) -> &str {
        "mmseqs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_tool_error() {
        let engine = Mmseqs::new("/nonexistent/mmseqs-binary");
        let result = engine.create_db(Path::new("a.faa"), Path::new("db"));
        assert!(matches!(result, Err(SeqAtomsError::Tool(_))));
    }

    #[test]
    fn test_version_of_missing_binary_is_tool_error() {
        let engine = Mmseqs::new("/nonexistent/mmseqs-binary");
        assert!(matches!(engine.version(), Err(SeqAtomsError::Tool(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_tool_error() {
        // `false` ignores its arguments and exits 1
        let engine = Mmseqs::new("false");
        let result = engine.create_index(Path::new("db"));
        match result {
            Err(SeqAtomsError::Tool(msg)) => assert!(msg.contains("createindex")),
            other => panic!("expected tool error, got {:?}", other),
        }
    }
}
