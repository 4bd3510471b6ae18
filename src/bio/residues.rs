//! Three-letter residue names to one-letter amino-acid codes.

/// Letter emitted for any residue name outside the table.
pub const UNKNOWN_RESIDUE: u8 = b'X';

/// Map a residue name (as found in structure files) to its one-letter code.
///
/// Lookup ignores surrounding whitespace and case. Names outside the table,
/// including nucleotides and ligands, map to [`UNKNOWN_RESIDUE`].
pub fn one_letter_code(residue_name: &str) -> u8 {
    let name = residue_name.trim();
    let mut upper = [0u8; 3];
    if name.len() != 3 {
        return UNKNOWN_RESIDUE;
    }
    for (dst, src) in upper.iter_mut().zip(name.bytes()) {
        *dst = src.to_ascii_uppercase();
    }

    match &upper {
        b"ALA" => b'A',
        b"ARG" => b'R',
        b"ASN" => b'N',
        b"ASP" => b'D',
        b"CYS" => b'C',
        b"GLN" => b'Q',
        b"GLU" => b'E',
        b"GLY" => b'G',
        b"HIS" => b'H',
        b"ILE" => b'I',
        b"LEU" => b'L',
        b"LYS" => b'K',
        b"MET" => b'M',
        b"PHE" => b'F',
        b"PRO" => b'P',
        b"SER" => b'S',
        b"THR" => b'T',
        b"TRP" => b'W',
        b"TYR" => b'Y',
        b"VAL" => b'V',
        b"SEC" => b'U',
        b"PYL" => b'O',
        b"MSE" => b'M',
        b"ASX" => b'B',
        b"GLX" => b'Z',
        _ => UNKNOWN_RESIDUE,
    }
}
