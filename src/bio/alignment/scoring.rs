/// Scoring schemes for pairwise alignment
use serde::{Deserialize, Serialize};

/// Scores are additive: a positive value rewards, a negative value penalises.
pub trait ScoringMatrix {
    fn score(&self, a: u8, b: u8) -> f64;
    /// Score added for the first position of a gap
    fn gap_open(&self) -> f64;
    /// Score added for every further position of the same gap
    fn gap_extend(&self) -> f64;
}

/// Flat match/mismatch scoring with affine gaps.
///
/// A gap of length `n` scores `gap_open + (n - 1) * gap_continuation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchMismatch {
    pub match_score: f64,
    pub mismatch_score: f64,
    pub gap_open: f64,
    pub gap_continuation: f64,
}

impl MatchMismatch {
    pub fn new(match_score: f64, mismatch_score: f64) -> Self {
        Self {
            match_score,
            mismatch_score,
            gap_open: -0.5,
            gap_continuation: -0.1,
        }
    }

    pub fn with_gap_penalties(mut self, gap_open: f64, gap_continuation: f64) -> Self {
        self.gap_open = gap_open;
        self.gap_continuation = gap_continuation;
        self
    }
}

impl Default for MatchMismatch {
    fn default() -> Self {
        Self::new(2.0, -1.0)
    }
}

impl ScoringMatrix for MatchMismatch {
    fn score(&self, a: u8, b: u8) -> f64 {
        if a.eq_ignore_ascii_case(&b) {
            self.match_score
        } else {
            self.mismatch_score
        }
    }

    fn gap_open(&self) -> f64 {
        self.gap_open
    }

    fn gap_extend(&self) -> f64 {
        self.gap_continuation
    }
}
