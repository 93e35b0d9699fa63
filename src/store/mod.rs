//! Estimate repository.
//!
//! Estimates are keyed by `estimate_id` only. Two submissions of the same home
//! description share an estimate id and therefore one stored entry; the
//! submission id never participates in lookups.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::EstimateResult;

/// Outcome of an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// An estimate with the same id was already stored; it was kept.
    Duplicate,
}

pub trait EstimateRepository {
    fn insert(&mut self, estimate: EstimateResult) -> InsertOutcome;
    fn get(&self, estimate_id: &str) -> Option<&EstimateResult>;
    fn len(&self) -> usize;
    fn list(&self) -> Vec<&EstimateResult>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store, ordered by estimate id.
#[derive(Debug, Default)]
pub struct InMemoryEstimateStore {
    by_id: BTreeMap<String, EstimateResult>,
}

impl InMemoryEstimateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EstimateRepository for InMemoryEstimateStore {
    fn insert(&mut self, estimate: EstimateResult) -> InsertOutcome {
        if self.by_id.contains_key(&estimate.estimate_id) {
            debug!(
                estimate_id = %estimate.estimate_id,
                submission_id = %estimate.submission_id,
                "estimate already stored"
            );
            return InsertOutcome::Duplicate;
        }
        self.by_id.insert(estimate.estimate_id.clone(), estimate);
        InsertOutcome::Inserted
    }

    fn get(&self, estimate_id: &str) -> Option<&EstimateResult> {
        self.by_id.get(estimate_id)
    }

    fn len(&self) -> usize {
        self.by_id.len()
    }

    fn list(&self) -> Vec<&EstimateResult> {
        self.by_id.values().collect()
    }
}
