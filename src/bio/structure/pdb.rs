//! PDB format parser.
//!
//! Reads `ATOM` records of the first model. Alternate locations other than
//! blank or `A` are skipped so each atom is seen once.

use super::{read_error, Atom, GroupTracker};
use crate::SeqAtomsError;
use std::io::BufRead;

pub fn parse_pdb<R: BufRead>(reader: R) -> Result<Vec<Atom>, SeqAtomsError> {
    let mut atoms = Vec::new();
    let mut groups = GroupTracker::default();

    for line in reader.lines() {
        let line = line.map_err(read_error)?;

        if line.starts_with("ENDMDL") {
            break;
        }
        if !line.starts_with("ATOM") {
            continue;
        }

        let alt_loc = safe_slice(&line, 16, 17);
        if alt_loc != " " && alt_loc != "A" && !alt_loc.is_empty() {
            continue;
        }

        let position = parse_coordinates(&line)?;
        let residue = safe_slice(&line, 17, 20).trim().to_string();
        let chain = safe_slice(&line, 21, 22);
        let seq_num = safe_slice(&line, 22, 26).trim();
        let insertion = safe_slice(&line, 26, 27).trim();

        let group_id = groups.group_for(chain, seq_num, insertion);
        atoms.push(Atom {
            residue,
            position,
            group_id,
        });
    }

    Ok(atoms)
}

fn parse_coordinates(line: &str) -> Result<[f32; 3], SeqAtomsError> {
    if line.len() < 54 {
        return Err(SeqAtomsError::Parse(format!(
            "ATOM record too short ({} chars): {}",
            line.len(),
            line
        )));
    }

    let mut position = [0f32; 3];
    for (axis, start) in [30usize, 38, 46].into_iter().enumerate() {
        let field = safe_slice(line, start, start + 8).trim();
        position[axis] = field
            .parse::<f32>()
            .map_err(|e| SeqAtomsError::Parse(format!("bad coordinate '{}': {}", field, e)))?;
    }
    Ok(position)
}

/// Column slice that tolerates short lines and non-ASCII bytes.
fn safe_slice(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}
