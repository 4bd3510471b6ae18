pub mod alignment;
pub mod fasta;
pub mod residues;
pub mod sequence;
pub mod structure;

pub use sequence::Sequence;
