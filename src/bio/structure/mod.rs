//! Protein structure file decoding.
//!
//! Both supported formats reduce to the same flat per-atom list: residue
//! name, position and a residue group id that never decreases in file order.
//! Decompression is picked by the `.gz` suffix alone.

pub mod mmcif;
pub mod pdb;

use crate::SeqAtomsError;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Supported structure formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureFormat {
    /// Fixed-column PDB records (`.pdb`, `.ent`)
    Pdb,
    /// PDBx/mmCIF `_atom_site` tables (`.cif`)
    Mmcif,
}

/// Every recognised file suffix, with the format it selects and whether the
/// file is gzip-compressed.
pub const STRUCTURE_SUFFIXES: [(&str, StructureFormat, bool); 6] = [
    (".pdb", StructureFormat::Pdb, false),
    (".pdb.gz", StructureFormat::Pdb, true),
    (".cif", StructureFormat::Mmcif, false),
    (".cif.gz", StructureFormat::Mmcif, true),
    (".ent", StructureFormat::Pdb, false),
    (".ent.gz", StructureFormat::Pdb, true),
];

/// What a file name says about its contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureFileKind {
    pub format: StructureFormat,
    pub compressed: bool,
    pub suffix: &'static str,
    pub protein_id: String,
}

impl StructureFormat {
    /// Resolve a file name to its format, compression and protein id.
    pub fn detect(file_name: &str) -> Option<StructureFileKind> {
        STRUCTURE_SUFFIXES
            .iter()
            .find(|(suffix, _, _)| file_name.len() > suffix.len() && file_name.ends_with(suffix))
            .map(|&(suffix, format, compressed)| StructureFileKind {
                format,
                compressed,
                suffix,
                protein_id: file_name[..file_name.len() - suffix.len()].to_string(),
            })
    }

    pub fn from_path(path: &Path) -> Option<StructureFileKind> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(Self::detect)
    }

    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Vec<Atom>, SeqAtomsError> {
        match self {
            StructureFormat::Pdb => pdb::parse_pdb(reader),
            StructureFormat::Mmcif => mmcif::parse_mmcif(reader),
        }
    }
}

/// A single atom as emitted by a parser
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Three-letter residue name
    pub residue: String,
    pub position: [f32; 3],
    pub group_id: u32,
}

/// All atoms extracted from one structure file
#[derive(Debug, Clone)]
pub struct StructureRecord {
    pub protein_id: String,
    pub atoms: Vec<Atom>,
}

impl StructureRecord {
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.atoms.iter().map(|a| a.position).collect()
    }
}

/// Issues residue group ids: a new id every time the residue key changes.
#[derive(Debug, Default)]
pub(crate) struct GroupTracker {
    current_key: Option<(String, String, String)>,
    next_id: u32,
}

impl GroupTracker {
    pub(crate) fn group_for(&mut self, chain: &str, seq_num: &str, insertion: &str) -> u32 {
        let same = matches!(
            &self.current_key,
            Some((c, s, i)) if c == chain && s == seq_num && i == insertion
        );
        if !same {
            self.current_key = Some((chain.to_string(), seq_num.to_string(), insertion.to_string()));
            self.next_id += 1;
        }
        self.next_id - 1
    }
}

/// Read and decode a structure file, decompressing `.gz` transparently.
pub fn read_structure_file(path: &Path) -> Result<StructureRecord, SeqAtomsError> {
    let kind = StructureFormat::from_path(path).ok_or_else(|| {
        SeqAtomsError::Read(format!("unrecognised structure file suffix: {}", path.display()))
    })?;

    let file = File::open(path)
        .map_err(|e| SeqAtomsError::Read(format!("{}: {}", path.display(), e)))?;

    let atoms = if kind.compressed {
        kind.format.parse(BufReader::new(GzDecoder::new(file)))?
    } else {
        kind.format.parse(BufReader::new(file))?
    };

    if atoms.is_empty() {
        return Err(SeqAtomsError::Parse(format!(
            "no ATOM records found in {}",
            path.display()
        )));
    }

    Ok(StructureRecord {
        protein_id: kind.protein_id,
        atoms,
    })
}

pub(crate) fn read_error(e: std::io::Error) -> SeqAtomsError {
    SeqAtomsError::Read(e.to_string())
}
