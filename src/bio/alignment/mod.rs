pub mod nw_aligner;
pub mod scoring;

pub use nw_aligner::{sequence_identity, NeedlemanWunsch, PairwiseAlignment};
pub use scoring::{MatchMismatch, ScoringMatrix};

/// Anything able to produce one global alignment for a (query, target) pair.
///
/// Implementations must be free of shared mutable state so candidates can be
/// aligned concurrently.
pub trait PairwiseAligner: Send + Sync {
    fn align(&self, query: &[u8], target: &[u8]) -> PairwiseAlignment;
}

impl<S: ScoringMatrix + Send + Sync> PairwiseAligner for NeedlemanWunsch<S> {
    fn align(&self, query: &[u8], target: &[u8]) -> PairwiseAlignment {
        NeedlemanWunsch::align(self, query, target)
    }
}
