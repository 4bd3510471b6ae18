//! Common test utilities for seqatoms integration tests
//!
//! Fixture writers for PDB and mmCIF files plus test doubles for the
//! external collaborators.
#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use seqatoms::tools::PrefilterEngine;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Residue names cycled through when building fixtures
pub const RESIDUES: [&str; 20] = [
    "MET", "LYS", "THR", "ALA", "TYR", "ILE", "ALA", "LYS", "GLN", "ARG", "GLN", "ILE", "SER",
    "PHE", "VAL", "LYS", "GLY", "LEU", "TRP", "HIS",
];

/// Test environment that manages temporary directories and cleanup
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        TestEnvironment {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get a path within the test environment
    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Create a directory (and parents) inside the environment
    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        std::fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }
}

fn residue_name(i: usize) -> &'static str {
    RESIDUES[i % RESIDUES.len()]
}

/// One-letter sequence the fixtures below should reduce to
pub fn expected_sequence(residues: usize) -> String {
    (0..residues)
        .map(|i| match residue_name(i) {
            "MET" => 'M',
            "LYS" => 'K',
            "THR" => 'T',
            "ALA" => 'A',
            "TYR" => 'Y',
            "ILE" => 'I',
            "GLN" => 'Q',
            "ARG" => 'R',
            "SER" => 'S',
            "PHE" => 'F',
            "VAL" => 'V',
            "GLY" => 'G',
            "LEU" => 'L',
            "TRP" => 'W',
            "HIS" => 'H',
            _ => 'X',
        })
        .collect()
}

/// Fixed-column ATOM record
pub fn pdb_atom_line(serial: usize, name: &str, residue: &str, chain: char, seq: usize, xyz: [f32; 3]) -> String {
    format!(
        "ATOM  {:>5} {:<4}{:1}{:>3} {:1}{:>4}{:1}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
        serial, name, ' ', residue, chain, seq, ' ', xyz[0], xyz[1], xyz[2], 1.0, 0.0, "C"
    )
}

/// PDB text with `residues` residues of `atoms_per_residue` atoms each
pub fn pdb_text(residues: usize, atoms_per_residue: usize) -> String {
    let mut text = String::from("HEADER    TEST STRUCTURE\n");
    let names = [" N", " CA", " C", " O"];
    let mut serial = 1;
    for r in 0..residues {
        for a in 0..atoms_per_residue {
            let xyz = [r as f32, a as f32, (r + a) as f32 * 0.5];
            text.push_str(&pdb_atom_line(serial, names[a % names.len()], residue_name(r), 'A', r + 1, xyz));
            text.push('\n');
            serial += 1;
        }
    }
    text.push_str("TER\nEND\n");
    text
}

/// mmCIF text with the same layout as [`pdb_text`]
pub fn mmcif_text(residues: usize, atoms_per_residue: usize) -> String {
    let mut text = String::from(
        "data_TEST\n#\nloop_\n_atom_site.group_PDB\n_atom_site.id\n_atom_site.label_atom_id\n\
         _atom_site.label_alt_id\n_atom_site.label_comp_id\n_atom_site.label_asym_id\n\
         _atom_site.label_seq_id\n_atom_site.pdbx_PDB_ins_code\n_atom_site.Cartn_x\n\
         _atom_site.Cartn_y\n_atom_site.Cartn_z\n_atom_site.pdbx_PDB_model_num\n",
    );
    let mut serial = 1;
    for r in 0..residues {
        for a in 0..atoms_per_residue {
            text.push_str(&format!(
                "ATOM {} CA . {} A {} ? {:.3} {:.3} {:.3} 1\n",
                serial,
                residue_name(r),
                r + 1,
                r as f32,
                a as f32,
                (r + a) as f32 * 0.5
            ));
            serial += 1;
        }
    }
    text.push_str("#\n");
    text
}

pub fn write_file(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    std::fs::write(path, contents).expect("Failed to write fixture");
    path.to_path_buf()
}

pub fn write_gz_file(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    let file = std::fs::File::create(path).expect("Failed to create fixture");
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(contents.as_bytes()).expect("Failed to compress fixture");
    encoder.finish().expect("Failed to finish gzip stream");
    path.to_path_buf()
}

/// Prefilter engine that records its calls and writes a canned hit table
#[derive(Default)]
pub struct RecordingEngine {
    pub calls: Mutex<Vec<String>>,
    pub hit_table: Option<String>,
    /// Fail the version check, as a missing binary would
    pub unavailable: bool,
}

impl RecordingEngine {
    pub fn with_hit_table(table: &str) -> Self {
        Self {
            hit_table: Some(table.to_string()),
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PrefilterEngine for RecordingEngine {
    fn create_db(&self, sequences: &Path, database: &Path) -> seqatoms::Result<()> {
        self.record(format!("createdb {} {}", sequences.display(), database.display()));
        Ok(())
    }

    fn create_index(&self, database: &Path) -> seqatoms::Result<()> {
        self.record(format!("createindex {}", database.display()));
        Ok(())
    }

    fn search(&self, query_db: &Path, target_db: &Path, result_db: &Path) -> seqatoms::Result<()> {
        self.record(format!(
            "search {} {} {}",
            query_db.display(),
            target_db.display(),
            result_db.display()
        ));
        Ok(())
    }

    fn convert_alignments(
        &self,
        _query_db: &Path,
        _target_db: &Path,
        _result_db: &Path,
        output: &Path,
    ) -> seqatoms::Result<()> {
        self.record(format!("convertalis {}", output.display()));
        std::fs::write(output, self.hit_table.clone().unwrap_or_default())?;
        Ok(())
    }

    fn version(&self) -> seqatoms::Result<String> {
        if self.unavailable {
            return Err(seqatoms::SeqAtomsError::Tool("engine not installed".to_string()));
        }
        Ok("recording".to_string())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
