/// Collapse per-atom records into residue groups
use crate::bio::residues::one_letter_code;
use crate::bio::structure::StructureRecord;
use std::collections::HashSet;

/// A structure reduced to its residue groups, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedRecord {
    pub protein_id: String,
    /// One letter per retained residue group
    pub sequence: Vec<u8>,
    /// First atom index of every retained group, plus one closing index
    pub boundaries: Vec<i32>,
    /// Atom positions up to the closing boundary
    pub positions: Vec<[f32; 3]>,
    /// Set to the chain-length limit when groups were cut off
    pub truncated: Option<usize>,
}

impl ReducedRecord {
    pub fn group_count(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reduction {
    Accepted(ReducedRecord),
    /// Fewer groups than the minimum; probably nucleic acid or a broken file
    TooShort { groups: usize },
}

#[derive(Debug, Clone)]
pub struct ResidueGroupReducer {
    min_groups: usize,
    max_chain_length: usize,
}

impl Default for ResidueGroupReducer {
    fn default() -> Self {
        Self::new(9, 2500)
    }
}

impl ResidueGroupReducer {
    pub fn new(min_groups: usize, max_chain_length: usize) -> Self {
        Self {
            min_groups,
            max_chain_length,
        }
    }

    pub fn with_max_chain_length(mut self, max_chain_length: usize) -> Self {
        self.max_chain_length = max_chain_length;
        self
    }

    pub fn max_chain_length(&self) -> usize {
        self.max_chain_length
    }

    pub fn reduce(&self, record: &StructureRecord) -> Reduction {
        let starts = group_starts(record);

        if starts.len() < self.min_groups {
            return Reduction::TooShort {
                groups: starts.len(),
            };
        }

        let (kept, closing, truncated) = if starts.len() > self.max_chain_length {
            (
                &starts[..self.max_chain_length],
                starts[self.max_chain_length],
                Some(self.max_chain_length),
            )
        } else {
            (&starts[..], record.atoms.len(), None)
        };

        let sequence = kept
            .iter()
            .map(|&i| one_letter_code(&record.atoms[i].residue))
            .collect();

        let boundaries = kept
            .iter()
            .copied()
            .chain(std::iter::once(closing))
            .map(|i| i as i32)
            .collect();

        let positions = record.atoms[..closing]
            .iter()
            .map(|a| a.position)
            .collect();

        Reduction::Accepted(ReducedRecord {
            protein_id: record.protein_id.clone(),
            sequence,
            boundaries,
            positions,
            truncated,
        })
    }
}

/// First atom index of each distinct group id, ascending
pub fn group_starts(record: &StructureRecord) -> Vec<usize> {
    let mut seen = HashSet::new();
    let mut starts: Vec<usize> = record
        .atoms
        .iter()
        .enumerate()
        .filter(|(_, atom)| seen.insert(atom.group_id))
        .map(|(i, _)| i)
        .collect();
    starts.sort_unstable();
    starts
}
