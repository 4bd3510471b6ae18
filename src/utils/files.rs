/// File helpers shared by the ingestion and search pipelines
use crate::core::paths::TARGET_DB_NAME;
use crate::{Result, SeqAtomsError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Concatenate files byte for byte into `output`, in the given order
pub fn merge_files_binary<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<u64> {
    let mut writer = BufWriter::new(File::create(output)?);
    let mut total = 0u64;
    for input in inputs {
        let mut reader = File::open(input.as_ref())?;
        total += std::io::copy(&mut reader, &mut writer)?;
    }
    writer.flush()?;
    Ok(total)
}

/// Create `<parent>/<unix seconds>` and return it
pub fn create_unix_timestamp_folder(parent: &Path) -> Result<PathBuf> {
    let mut timestamp = chrono::Utc::now().timestamp();
    let mut folder = parent.join(timestamp.to_string());
    // Two builds within the same second get consecutive folders
    while folder.exists() {
        timestamp += 1;
        folder = parent.join(timestamp.to_string());
    }
    std::fs::create_dir_all(&folder)?;
    Ok(folder)
}

/// Newest `<timestamp>/targetDB` under a database folder
pub fn latest_target_database(databases: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(databases).map_err(|e| {
        SeqAtomsError::Config(format!(
            "no target databases in {}: {}",
            databases.display(),
            e
        ))
    })?;

    let newest = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<i64>().ok())
        })
        .max();

    match newest {
        Some(timestamp) => Ok(databases.join(timestamp.to_string()).join(TARGET_DB_NAME)),
        None => Err(SeqAtomsError::Config(format!(
            "no target databases in {}",
            databases.display()
        ))),
    }
}
