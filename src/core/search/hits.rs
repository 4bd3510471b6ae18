//! Prefilter hit tables (BLAST m8 layout, as written by `convertalis`)

use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One row of the hit table. Field order follows the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentCandidate {
    pub query_id: String,
    pub target_id: String,
    /// Fraction of identical positions reported by the prefilter
    pub percent_identity: f64,
    pub alignment_length: u32,
    pub mismatches: u32,
    pub gap_openings: u32,
    pub query_start: u32,
    pub query_end: u32,
    pub target_start: u32,
    pub target_end: u32,
    pub e_value: f64,
    pub bit_score: f64,
}

impl AlignmentCandidate {
    /// Row with only the fields the filter looks at; the rest zeroed
    pub fn new(
        query_id: impl Into<String>,
        target_id: impl Into<String>,
        bit_score: f64,
        e_value: f64,
        percent_identity: f64,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            target_id: target_id.into(),
            percent_identity,
            alignment_length: 0,
            mismatches: 0,
            gap_openings: 0,
            query_start: 0,
            query_end: 0,
            target_start: 0,
            target_end: 0,
            e_value,
            bit_score,
        }
    }
}

pub fn read_hit_table<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentCandidate>> {
    let file = std::fs::File::open(path.as_ref())?;
    parse_hit_table(file)
}

pub fn parse_hit_table<R: Read>(reader: R) -> Result<Vec<AlignmentCandidate>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(reader);

    let mut candidates = Vec::new();
    for row in reader.deserialize() {
        candidates.push(row?);
    }
    Ok(candidates)
}
