use crate::core::config::AlignmentConfig;
use crate::core::search::hits::AlignmentCandidate;
use std::collections::HashSet;

/// Thresholds a prefilter hit must beat before it is aligned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentFilter {
    pub min_bit_score: f64,
    pub max_e_value: f64,
    pub min_identity: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FilterResult {
    /// Surviving rows in their original order
    pub retained: Vec<AlignmentCandidate>,
    pub dropped: usize,
}

impl From<&AlignmentConfig> for AlignmentFilter {
    fn from(config: &AlignmentConfig) -> Self {
        Self {
            min_bit_score: config.min_bit_score,
            max_e_value: config.max_e_value,
            min_identity: config.min_identity,
        }
    }
}

impl AlignmentFilter {
    /// All bounds are strict. NaN fails every comparison and is dropped.
    pub fn accepts(&self, candidate: &AlignmentCandidate, query_ids: &HashSet<String>) -> bool {
        candidate.bit_score > self.min_bit_score
            && candidate.e_value < self.max_e_value
            && candidate.percent_identity > self.min_identity
            && query_ids.contains(&candidate.query_id)
    }

    pub fn filter(
        &self,
        candidates: Vec<AlignmentCandidate>,
        query_ids: &HashSet<String>,
    ) -> FilterResult {
        let total = candidates.len();
        let retained: Vec<_> = candidates
            .into_iter()
            .filter(|c| self.accepts(c, query_ids))
            .collect();

        FilterResult {
            dropped: total - retained.len(),
            retained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> AlignmentFilter {
        AlignmentFilter {
            min_bit_score: 0.0,
            max_e_value: 0.001,
            min_identity: 0.5,
        }
    }

    fn queries() -> HashSet<String> {
        ["q1".to_string()].into_iter().collect()
    }

    #[test]
    fn test_bounds_are_strict() {
        let f = filter();
        let q = queries();
        assert!(f.accepts(&AlignmentCandidate::new("q1", "t", 1.0, 0.0001, 0.6), &q));
        assert!(!f.accepts(&AlignmentCandidate::new("q1", "t", 0.0, 0.0001, 0.6), &q));
        assert!(!f.accepts(&AlignmentCandidate::new("q1", "t", 1.0, 0.001, 0.6), &q));
        assert!(!f.accepts(&AlignmentCandidate::new("q1", "t", 1.0, 0.0001, 0.5), &q));
        assert!(!f.accepts(&AlignmentCandidate::new("q2", "t", 1.0, 0.0001, 0.6), &q));
    }

    #[test]
    fn test_filter_keeps_order_and_counts() {
        let rows = vec![
            AlignmentCandidate::new("q1", "a", 50.0, 1e-10, 0.9),
            AlignmentCandidate::new("q1", "b", 50.0, 0.5, 0.9),
            AlignmentCandidate::new("q1", "c", 40.0, 1e-8, 0.7),
            AlignmentCandidate::new("q9", "d", 40.0, 1e-8, 0.7),
        ];
        let result = filter().filter(rows, &queries());

        assert_eq!(result.dropped, 2);
        let targets: Vec<_> = result.retained.iter().map(|c| c.target_id.as_str()).collect();
        assert_eq!(targets, vec!["a", "c"]);
    }

    #[test]
    fn test_nan_is_dropped() {
        let row = AlignmentCandidate::new("q1", "a", f64::NAN, 1e-10, 0.9);
        assert!(!filter().accepts(&row, &queries()));
    }
}
