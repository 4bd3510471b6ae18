/// Needleman-Wunsch global alignment with affine gaps (Gotoh)
use crate::bio::alignment::scoring::ScoringMatrix;
use serde::{Deserialize, Serialize};

pub const GAP: u8 = b'-';

/// One optimal global alignment between a query and a target sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseAlignment {
    pub query_sequence: String,
    pub target_sequence: String,
    pub aligned_query: String,
    pub aligned_target: String,
    pub score: f64,
    /// Identical columns over alignment length, in [0, 1]
    pub sequence_identity: f64,
    pub start: usize,
    pub end: usize,
}

impl PairwiseAlignment {
    pub fn len(&self) -> usize {
        self.aligned_query.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_query.is_empty()
    }
}

/// Fraction of aligned columns whose two symbols are identical, ignoring case
/// as the scoring does.
pub fn sequence_identity(aligned_query: &[u8], aligned_target: &[u8]) -> f64 {
    let length = aligned_query.len();
    if length == 0 {
        return 0.0;
    }
    let matches = aligned_query
        .iter()
        .zip(aligned_target.iter())
        .filter(|(q, t)| q.eq_ignore_ascii_case(t))
        .count();
    matches as f64 / length as f64
}

pub struct NeedlemanWunsch<S: ScoringMatrix> {
    scoring: S,
}

/// Alignment state a cell was reached from.
///
/// Declaration order is the tie-break order: a pair beats a gap in the
/// target, which beats a gap in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pair,
    GapInTarget,
    GapInQuery,
}

#[derive(Debug, Clone, Copy)]
struct Traceback {
    pair: State,
    gap_in_target: State,
    gap_in_query: State,
}

impl Default for Traceback {
    fn default() -> Self {
        Self {
            pair: State::Pair,
            gap_in_target: State::Pair,
            gap_in_query: State::Pair,
        }
    }
}

/// Pick the best of three candidates; earlier candidates win ties.
fn best_of(candidates: [(f64, State); 3]) -> (f64, State) {
    let mut best = candidates[0];
    for &candidate in &candidates[1..] {
        if candidate.0 > best.0 {
            best = candidate;
        }
    }
    best
}

impl<S: ScoringMatrix> NeedlemanWunsch<S> {
    pub fn new(scoring: S) -> Self {
        Self { scoring }
    }

    pub fn scoring(&self) -> &S {
        &self.scoring
    }

    pub fn align(&self, query_seq: &[u8], target_seq: &[u8]) -> PairwiseAlignment {
        let (score, traceback, end_state) = self.fill_matrices(query_seq, target_seq);
        let (aligned_query, aligned_target) =
            self.traceback(&traceback, query_seq, target_seq, end_state);

        let sequence_identity = sequence_identity(&aligned_query, &aligned_target);
        let end = aligned_query.len();

        PairwiseAlignment {
            query_sequence: String::from_utf8_lossy(query_seq).into_owned(),
            target_sequence: String::from_utf8_lossy(target_seq).into_owned(),
            aligned_query: String::from_utf8_lossy(&aligned_query).into_owned(),
            aligned_target: String::from_utf8_lossy(&aligned_target).into_owned(),
            score,
            sequence_identity,
            start: 0,
            end,
        }
    }

    /// Fill the three state matrices row by row, keeping full traceback
    /// pointers but only two rows of scores.
    fn fill_matrices(
        &self,
        query_seq: &[u8],
        target_seq: &[u8],
    ) -> (f64, Vec<Vec<Traceback>>, State) {
        let query_len = query_seq.len();
        let target_len = target_seq.len();
        let gap_open = self.scoring.gap_open();
        let gap_extend = self.scoring.gap_extend();
        let neg_inf = f64::NEG_INFINITY;

        let mut traceback_matrix = vec![vec![Traceback::default(); target_len + 1]; query_len + 1];

        // Row 0: only gaps in the query are possible
        let mut prev_pair = vec![neg_inf; target_len + 1];
        let mut prev_gap_target = vec![neg_inf; target_len + 1];
        let mut prev_gap_query = vec![neg_inf; target_len + 1];
        prev_pair[0] = 0.0;
        for j in 1..=target_len {
            prev_gap_query[j] = gap_open + gap_extend * (j as f64 - 1.0);
            traceback_matrix[0][j].gap_in_query =
                if j == 1 { State::Pair } else { State::GapInQuery };
        }

        let mut cur_pair = vec![neg_inf; target_len + 1];
        let mut cur_gap_target = vec![neg_inf; target_len + 1];
        let mut cur_gap_query = vec![neg_inf; target_len + 1];

        for i in 1..=query_len {
            cur_pair[0] = neg_inf;
            cur_gap_query[0] = neg_inf;
            cur_gap_target[0] = gap_open + gap_extend * (i as f64 - 1.0);
            traceback_matrix[i][0].gap_in_target =
                if i == 1 { State::Pair } else { State::GapInTarget };

            for j in 1..=target_len {
                let substitution = self.scoring.score(query_seq[i - 1], target_seq[j - 1]);
                let (pair_score, pair_from) = best_of([
                    (prev_pair[j - 1], State::Pair),
                    (prev_gap_target[j - 1], State::GapInTarget),
                    (prev_gap_query[j - 1], State::GapInQuery),
                ]);

                let (gap_target_score, gap_target_from) = best_of([
                    (prev_pair[j] + gap_open, State::Pair),
                    (prev_gap_target[j] + gap_extend, State::GapInTarget),
                    (prev_gap_query[j] + gap_open, State::GapInQuery),
                ]);

                let (gap_query_score, gap_query_from) = best_of([
                    (cur_pair[j - 1] + gap_open, State::Pair),
                    (cur_gap_target[j - 1] + gap_open, State::GapInTarget),
                    (cur_gap_query[j - 1] + gap_extend, State::GapInQuery),
                ]);

                cur_pair[j] = pair_score + substitution;
                cur_gap_target[j] = gap_target_score;
                cur_gap_query[j] = gap_query_score;
                traceback_matrix[i][j] = Traceback {
                    pair: pair_from,
                    gap_in_target: gap_target_from,
                    gap_in_query: gap_query_from,
                };
            }

            std::mem::swap(&mut prev_pair, &mut cur_pair);
            std::mem::swap(&mut prev_gap_target, &mut cur_gap_target);
            std::mem::swap(&mut prev_gap_query, &mut cur_gap_query);
        }

        let (score, end_state) = best_of([
            (prev_pair[target_len], State::Pair),
            (prev_gap_target[target_len], State::GapInTarget),
            (prev_gap_query[target_len], State::GapInQuery),
        ]);

        (score, traceback_matrix, end_state)
    }

    fn traceback(
        &self,
        traceback_matrix: &[Vec<Traceback>],
        query_seq: &[u8],
        target_seq: &[u8],
        end_state: State,
    ) -> (Vec<u8>, Vec<u8>) {
        let mut query_aligned = Vec::with_capacity(query_seq.len() + target_seq.len());
        let mut target_aligned = Vec::with_capacity(query_seq.len() + target_seq.len());

        let mut i = query_seq.len();
        let mut j = target_seq.len();
        let mut state = end_state;

        while i > 0 || j > 0 {
            let cell = traceback_matrix[i][j];
            match state {
                State::Pair => {
                    query_aligned.push(query_seq[i - 1]);
                    target_aligned.push(target_seq[j - 1]);
                    state = cell.pair;
                    i -= 1;
                    j -= 1;
                }
                State::GapInTarget => {
                    query_aligned.push(query_seq[i - 1]);
                    target_aligned.push(GAP);
                    state = cell.gap_in_target;
                    i -= 1;
                }
                State::GapInQuery => {
                    query_aligned.push(GAP);
                    target_aligned.push(target_seq[j - 1]);
                    state = cell.gap_in_query;
                    j -= 1;
                }
            }
        }

        query_aligned.reverse();
        target_aligned.reverse();

        (query_aligned, target_aligned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::alignment::scoring::MatchMismatch;

    fn aligner() -> NeedlemanWunsch<MatchMismatch> {
        NeedlemanWunsch::new(MatchMismatch::new(2.0, -1.0).with_gap_penalties(-5.0, -1.0))
    }

    #[test]
    fn test_identical_sequences() {
        let result = aligner().align(b"MKTAYIAKQRQISFVK", b"MKTAYIAKQRQISFVK");
        assert_eq!(result.score, 32.0);
        assert_eq!(result.sequence_identity, 1.0);
        assert_eq!(result.aligned_query, "MKTAYIAKQRQISFVK");
        assert_eq!(result.end, 16);
    }

    #[test]
    fn test_identity_agrees_with_scoring_on_case() {
        let result = aligner().align(b"mkTAY", b"MKtay");
        assert_eq!(result.score, 10.0);
        assert_eq!(result.sequence_identity, 1.0);
    }

    #[test]
    fn test_single_mismatch() {
        let result = aligner().align(b"ACGT", b"AGGT");
        assert_eq!(result.aligned_query, "ACGT");
        assert_eq!(result.aligned_target, "AGGT");
        assert_eq!(result.score, 5.0);
        assert_eq!(result.sequence_identity, 0.75);
    }

    #[test]
    fn test_affine_gap_is_one_block() {
        // One gap of length 2 (-5 - 1) beats two separate gaps (-10)
        let result = aligner().align(b"AAAACCAAAA", b"AAAAAAAA");
        assert_eq!(result.aligned_query, "AAAACCAAAA");
        assert_eq!(result.aligned_target, "AAAA--AAAA");
        assert_eq!(result.score, 16.0 - 6.0);
        assert_eq!(result.sequence_identity, 0.8);
    }

    #[test]
    fn test_end_gaps_are_penalised() {
        let result = aligner().align(b"MKTAY", b"MKTAYGG");
        assert_eq!(result.aligned_query, "MKTAY--");
        assert_eq!(result.score, 10.0 - 6.0);
    }

    #[test]
    fn test_empty_inputs() {
        let result = aligner().align(b"", b"");
        assert_eq!(result.score, 0.0);
        assert!(result.is_empty());
        assert_eq!(result.sequence_identity, 0.0);

        let result = aligner().align(b"MK", b"");
        assert_eq!(result.aligned_target, "--");
        assert_eq!(result.score, -6.0);
    }

    #[test]
    fn test_deterministic_tie_break_prefers_pairs() {
        // "A" vs "C": a mismatch (-1) beats two gaps (-10)
        let result = aligner().align(b"A", b"C");
        assert_eq!(result.aligned_query, "A");
        assert_eq!(result.aligned_target, "C");

        let first = aligner().align(b"GATTACA", b"GCATGCA");
        let second = aligner().align(b"GATTACA", b"GCATGCA");
        assert_eq!(first, second);
    }
}
