//! PDBx/mmCIF parser.
//!
//! Only the `_atom_site` loop is read. Rows are kept when `group_PDB` is
//! `ATOM` and they belong to the first model listed.

use super::{read_error, Atom, GroupTracker};
use crate::SeqAtomsError;
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::{char, multispace0},
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};
use std::io::BufRead;

/// Parse one mmCIF value: quoted with `'` or `"`, or a bare word
fn token(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_till(|c| c == '\''), char('\'')),
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
        take_till1(|c: char| c.is_whitespace()),
    ))(input)
}

fn tokenize(line: &str) -> Result<Vec<&str>, SeqAtomsError> {
    let (rest, tokens) = many0(preceded(multispace0, token))(line)
        .map_err(|e| SeqAtomsError::Parse(format!("bad mmCIF row '{}': {:?}", line, e)))?;
    if !rest.trim().is_empty() {
        return Err(SeqAtomsError::Parse(format!("trailing data in mmCIF row: {}", rest)));
    }
    Ok(tokens)
}

/// Column positions of the `_atom_site` fields we use
struct AtomSiteColumns {
    count: usize,
    group: Option<usize>,
    residue: usize,
    x: usize,
    y: usize,
    z: usize,
    chain: Option<usize>,
    seq_num: Option<usize>,
    insertion: Option<usize>,
    alt_id: Option<usize>,
    model: Option<usize>,
}

impl AtomSiteColumns {
    fn from_fields(fields: &[String]) -> Result<Self, SeqAtomsError> {
        let find = |name: &str| fields.iter().position(|f| f == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                SeqAtomsError::Parse(format!("missing _atom_site.{} column", name))
            })
        };

        Ok(Self {
            count: fields.len(),
            group: find("group_PDB"),
            residue: find("label_comp_id")
                .or_else(|| find("auth_comp_id"))
                .ok_or_else(|| SeqAtomsError::Parse("missing residue name column".to_string()))?,
            x: require("Cartn_x")?,
            y: require("Cartn_y")?,
            z: require("Cartn_z")?,
            chain: find("label_asym_id").or_else(|| find("auth_asym_id")),
            seq_num: find("label_seq_id").or_else(|| find("auth_seq_id")),
            insertion: find("pdbx_PDB_ins_code"),
            alt_id: find("label_alt_id"),
            model: find("pdbx_PDB_model_num"),
        })
    }
}

#[derive(Debug, PartialEq)]
enum Section {
    Outside,
    AtomSiteFields,
    AtomSiteRows,
    LoopStart,
}

pub fn parse_mmcif<R: BufRead>(reader: R) -> Result<Vec<Atom>, SeqAtomsError> {
    let mut atoms = Vec::new();
    let mut groups = GroupTracker::default();
    let mut section = Section::Outside;
    let mut fields: Vec<String> = Vec::new();
    let mut columns: Option<AtomSiteColumns> = None;
    let mut first_model: Option<String> = None;
    let mut pending: Vec<String> = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(read_error)?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        match section {
            Section::Outside | Section::LoopStart => {
                if trimmed == "loop_" {
                    section = Section::LoopStart;
                } else if section == Section::LoopStart && trimmed.starts_with("_atom_site.") {
                    fields.push(trimmed["_atom_site.".len()..].to_string());
                    section = Section::AtomSiteFields;
                } else {
                    section = Section::Outside;
                }
            }
            Section::AtomSiteFields | Section::AtomSiteRows => {
                if section == Section::AtomSiteFields {
                    if let Some(field) = trimmed.strip_prefix("_atom_site.") {
                        fields.push(field.to_string());
                        continue;
                    }
                    columns = Some(AtomSiteColumns::from_fields(&fields)?);
                    section = Section::AtomSiteRows;
                }
                let Some(cols) = columns.as_ref() else {
                    break;
                };
                let more = collect_row(trimmed, &mut pending, cols.count, &mut |row| {
                    push_row(row, cols, &mut first_model, &mut groups, &mut atoms)
                })?;
                if !more {
                    break;
                }
            }
        }
    }

    Ok(atoms)
}

/// Feed one line of the atom table. Returns `false` once the table ended.
fn collect_row(
    line: &str,
    pending: &mut Vec<String>,
    width: usize,
    on_row: &mut dyn FnMut(&[String]) -> Result<(), SeqAtomsError>,
) -> Result<bool, SeqAtomsError> {
    if line.starts_with('#')
        || line.starts_with("loop_")
        || line.starts_with("data_")
        || line.starts_with('_')
    {
        return Ok(false);
    }

    pending.extend(tokenize(line)?.into_iter().map(str::to_string));
    while pending.len() >= width {
        let row: Vec<String> = pending.drain(..width).collect();
        on_row(&row)?;
    }
    Ok(true)
}

fn push_row(
    row: &[String],
    columns: &AtomSiteColumns,
    first_model: &mut Option<String>,
    groups: &mut GroupTracker,
    atoms: &mut Vec<Atom>,
) -> Result<(), SeqAtomsError> {
    if let Some(group) = columns.group {
        if row[group] != "ATOM" {
            return Ok(());
        }
    }
    if let Some(model) = columns.model {
        match first_model {
            Some(first) if *first != row[model] => return Ok(()),
            Some(_) => {}
            None => *first_model = Some(row[model].clone()),
        }
    }
    if let Some(alt) = columns.alt_id {
        let alt = row[alt].as_str();
        if alt != "." && alt != "?" && alt != "A" {
            return Ok(());
        }
    }

    let mut position = [0f32; 3];
    for (axis, &column) in [columns.x, columns.y, columns.z].iter().enumerate() {
        position[axis] = row[column].parse::<f32>().map_err(|e| {
            SeqAtomsError::Parse(format!("bad coordinate '{}': {}", row[column], e))
        })?;
    }

    let value = |column: Option<usize>| column.map(|c| row[c].as_str()).unwrap_or("");
    let group_id = groups.group_for(
        value(columns.chain),
        value(columns.seq_num),
        value(columns.insertion),
    );

    atoms.push(Atom {
        residue: row[columns.residue].clone(),
        position,
        group_id,
    });
    Ok(())
}
