use crate::bio::sequence::Sequence;
use crate::SeqAtomsError;
use flate2::read::GzDecoder;
use memmap2::Mmap;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{line_ending, not_line_ending},
    combinator::{map, opt},
    sequence::preceded,
    IResult,
};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Parse a FASTA header line
fn parse_header(input: &[u8]) -> IResult<&[u8], (&str, Option<&str>)> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, description) = opt(preceded(
        alt((tag(b" "), tag(b"\t"))),
        map(not_line_ending, |s| std::str::from_utf8(s).unwrap_or("")),
    ))(input)?;
    // The last record of a file may lack its trailing newline
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, (id, description)))
}

/// Parse sequence lines until next header or EOF
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (mut rest, _) = opt(line_ending)(rest)?;
        // A bare carriage return is not a line ending; step over it
        if rest.len() == remaining.len() {
            rest = &rest[1..];
        }

        for &c in line {
            if !c.is_ascii_whitespace() {
                sequence.push(c.to_ascii_uppercase());
            }
        }

        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Parse a single FASTA record
fn parse_record(input: &[u8]) -> IResult<&[u8], Sequence> {
    let (input, (id, description)) = parse_header(input)?;
    let (input, sequence) = parse_sequence(input)?;

    let mut seq = Sequence::new(id.to_string(), sequence);
    if let Some(desc) = description {
        seq = seq.with_description(desc.to_string());
    }

    Ok((input, seq))
}

/// Parse a FASTA file into sequences (supports .gz compression)
pub fn parse_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>, SeqAtomsError> {
    let path = path.as_ref();

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        parse_fasta_gzip(path)
    } else {
        parse_fasta_uncompressed(path)
    }
}

fn parse_fasta_uncompressed(path: &Path) -> Result<Vec<Sequence>, SeqAtomsError> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(Vec::new());
    }
    let mmap = unsafe { Mmap::map(&file)? };

    parse_fasta_buffer(&mmap[..])
}

fn parse_fasta_gzip(path: &Path) -> Result<Vec<Sequence>, SeqAtomsError> {
    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut buffer = Vec::new();
    decoder
        .read_to_end(&mut buffer)
        .map_err(|e| SeqAtomsError::Read(format!("{}: {}", path.display(), e)))?;

    parse_fasta_buffer(&buffer)
}

/// Parse FASTA from a byte buffer
pub fn parse_fasta_buffer(buffer: &[u8]) -> Result<Vec<Sequence>, SeqAtomsError> {
    let mut input = buffer;
    let mut sequences = Vec::new();

    while !input.is_empty() {
        while !input.is_empty() && input[0].is_ascii_whitespace() {
            input = &input[1..];
        }

        if input.is_empty() {
            break;
        }

        match parse_record(input) {
            Ok((remaining, seq)) => {
                if !seq.is_empty() {
                    sequences.push(seq);
                }
                input = remaining;
            }
            Err(e) => {
                return Err(SeqAtomsError::Parse(format!("Failed to parse FASTA: {:?}", e)));
            }
        }
    }

    Ok(sequences)
}

/// Write one record as `>{id}\n{sequence}\n`, the sequence kept on a single line
pub fn write_fasta_record<W: Write>(writer: &mut W, seq: &Sequence) -> Result<(), SeqAtomsError> {
    writeln!(writer, "{}", seq.header())?;
    writer.write_all(&seq.sequence)?;
    writer.write_all(b"\n")?;
    Ok(())
}
