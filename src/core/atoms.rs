//! Binary atom files consumed by the contact-map predictor.
//!
//! Layout, little-endian: `u32` boundary count, `u32` atom count, the
//! boundaries as `i32`, then `x y z` as `f32` for every atom.

use crate::SeqAtomsError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Writes atom positions and residue boundaries for one protein.
pub trait AtomEncoder: Send + Sync {
    /// One-time setup, called before any worker encodes
    fn initialize(&self) -> Result<(), SeqAtomsError> {
        Ok(())
    }

    fn encode(
        &self,
        positions: &[[f32; 3]],
        boundaries: &[i32],
        output: &Path,
    ) -> Result<(), SeqAtomsError>;
}

#[derive(Debug, Default)]
pub struct BinaryAtomEncoder {
    initialized: AtomicBool,
}

impl BinaryAtomEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AtomEncoder for BinaryAtomEncoder {
    fn initialize(&self) -> Result<(), SeqAtomsError> {
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    fn encode(
        &self,
        positions: &[[f32; 3]],
        boundaries: &[i32],
        output: &Path,
    ) -> Result<(), SeqAtomsError> {
        if !self.initialized.load(Ordering::Acquire) {
            return Err(SeqAtomsError::Write(
                "atom encoder used before initialization".to_string(),
            ));
        }

        let file = File::create(output)?;
        let mut writer = BufWriter::new(file);

        writer.write_u32::<LittleEndian>(boundaries.len() as u32)?;
        writer.write_u32::<LittleEndian>(positions.len() as u32)?;
        for &boundary in boundaries {
            writer.write_i32::<LittleEndian>(boundary)?;
        }
        for position in positions {
            for &coordinate in position {
                writer.write_f32::<LittleEndian>(coordinate)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

/// Encoder initialised for the duration of one ingestion run
pub struct EncoderSession<'a> {
    encoder: &'a dyn AtomEncoder,
}

impl<'a> EncoderSession<'a> {
    pub fn open(encoder: &'a dyn AtomEncoder) -> Result<Self, SeqAtomsError> {
        encoder.initialize()?;
        tracing::debug!("atom encoder initialized");
        Ok(Self { encoder })
    }

    pub fn encoder(&self) -> &'a dyn AtomEncoder {
        self.encoder
    }
}

impl Drop for EncoderSession<'_> {
    fn drop(&mut self) {
        tracing::debug!("atom encoder session closed");
    }
}

/// Contents of an atom file
#[derive(Debug, Clone, PartialEq)]
pub struct AtomsFile {
    pub boundaries: Vec<i32>,
    pub positions: Vec<[f32; 3]>,
}

pub fn read_atoms(path: &Path) -> Result<AtomsFile, SeqAtomsError> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let boundary_count = reader.read_u32::<LittleEndian>()? as usize;
    let atom_count = reader.read_u32::<LittleEndian>()? as usize;

    // Header counts must account for the whole file before anything is allocated
    let expected = 8 + 4 * boundary_count as u64 + 12 * atom_count as u64;
    if expected != file_len {
        return Err(SeqAtomsError::Parse(format!(
            "{}: header declares {} boundaries and {} atoms ({} bytes) but file has {} bytes",
            path.display(),
            boundary_count,
            atom_count,
            expected,
            file_len
        )));
    }

    let mut boundaries = Vec::with_capacity(boundary_count);
    for _ in 0..boundary_count {
        boundaries.push(reader.read_i32::<LittleEndian>()?);
    }
    let mut positions = Vec::with_capacity(atom_count);
    for _ in 0..atom_count {
        positions.push([
            reader.read_f32::<LittleEndian>()?,
            reader.read_f32::<LittleEndian>()?,
            reader.read_f32::<LittleEndian>()?,
        ]);
    }

    Ok(AtomsFile {
        boundaries,
        positions,
    })
}
