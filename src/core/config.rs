use crate::bio::alignment::MatchMismatch;
use crate::core::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub ingestion: IngestionConfig,
    pub alignment: AlignmentConfig,
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root under which every pipeline folder lives
    pub data_root: PathBuf,
    /// `mmseqs` executable; looked up on PATH when relative
    pub mmseqs_binary: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Chains with more residue groups are truncated to this many
    pub max_chain_length: usize,
    /// Chains with fewer residue groups are rejected
    pub min_residue_groups: usize,
}

/// Thresholds and scoring used by one alignment search job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub min_bit_score: f64,
    pub max_e_value: f64,
    pub min_identity: f64,
    pub match_score: f64,
    pub mismatch_score: f64,
    pub gap_open: f64,
    pub gap_continuation: f64,
    /// Pairwise alignments at or below this identity are discarded
    pub min_sequence_identity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Worker count, 0 = one per CPU
    pub threads: usize,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_root: paths::default_data_root(),
            mmseqs_binary: PathBuf::from("mmseqs"),
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_chain_length: 2500,
            min_residue_groups: 9,
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            min_bit_score: 0.0,
            max_e_value: 0.001,
            min_identity: 0.5,
            match_score: 2.0,
            mismatch_score: -1.0,
            gap_open: -0.5,
            gap_continuation: -0.1,
            min_sequence_identity: 0.3,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { threads: 0 }
    }
}

impl AlignmentConfig {
    pub fn scoring(&self) -> MatchMismatch {
        MatchMismatch::new(self.match_score, self.mismatch_score)
            .with_gap_penalties(self.gap_open, self.gap_continuation)
    }

    /// Scores must be finite and gap penalties non-positive
    pub fn validate(&self) -> Result<(), crate::SeqAtomsError> {
        let scores = [
            ("match_score", self.match_score),
            ("mismatch_score", self.mismatch_score),
            ("gap_open", self.gap_open),
            ("gap_continuation", self.gap_continuation),
        ];
        if let Some((name, _)) = scores.iter().find(|(_, v)| !v.is_finite()) {
            return Err(crate::SeqAtomsError::Alignment(format!(
                "{} must be a finite number",
                name
            )));
        }
        if self.gap_open > 0.0 || self.gap_continuation > 0.0 {
            return Err(crate::SeqAtomsError::Alignment(format!(
                "gap penalties must be zero or negative, got open {} continuation {}",
                self.gap_open, self.gap_continuation
            )));
        }
        Ok(())
    }

    /// Load a per-job `job_config.json`; absent fields keep their defaults
    pub fn load_job_config<P: AsRef<Path>>(path: P) -> Result<Self, crate::SeqAtomsError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&contents).map_err(|e| {
            crate::SeqAtomsError::Config(format!(
                "Failed to parse job config {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }
}

impl PerformanceConfig {
    pub fn worker_count(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::SeqAtomsError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::SeqAtomsError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), crate::SeqAtomsError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::SeqAtomsError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
