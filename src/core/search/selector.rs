use crate::bio::alignment::PairwiseAlignment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best alignment kept for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestAlignment {
    pub target_id: String,
    pub alignment: PairwiseAlignment,
    pub sequence_identity: f64,
}

/// query id -> best alignment, serialised with sorted keys
pub type BestAlignmentMap = BTreeMap<String, BestAlignment>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestHitSelector {
    min_sequence_identity: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub best: BestAlignmentMap,
    pub below_identity_floor: usize,
}

impl BestHitSelector {
    pub fn new(min_sequence_identity: f64) -> Self {
        Self {
            min_sequence_identity,
        }
    }

    /// Reduce `(query id, target id, alignment)` triples, in candidate order.
    /// On equal scores the earlier candidate stays.
    pub fn select<'a, I>(&self, aligned: I) -> Selection
    where
        I: IntoIterator<Item = (&'a str, &'a str, PairwiseAlignment)>,
    {
        let mut selection = Selection::default();

        for (query_id, target_id, alignment) in aligned {
            let identity = alignment.sequence_identity;
            let above_floor = identity > self.min_sequence_identity;
            if !above_floor {
                selection.below_identity_floor += 1;
                continue;
            }

            let replace = match selection.best.get(query_id) {
                Some(current) => alignment.score > current.alignment.score,
                None => true,
            };
            if replace {
                selection.best.insert(
                    query_id.to_string(),
                    BestAlignment {
                        target_id: target_id.to_string(),
                        alignment,
                        sequence_identity: identity,
                    },
                );
            }
        }

        selection
    }
}
