use std::collections::{HashMap, HashSet};

use hashlock_core::{Address, SwapId, SwapRecord};
use serde::{Deserialize, Serialize};

/// Pending swaps keyed by their content-addressed identifier.
///
/// A record's presence is what makes a swap pending. `retired` holds the
/// identifiers that may never be initiated again; it only grows when reuse
/// is forbidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRegistry {
    records: HashMap<SwapId, SwapRecord>,
    #[serde(default)]
    retired: HashSet<SwapId>,
}

impl SwapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, id: &SwapId) -> Option<&SwapRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &SwapId) -> bool {
        self.records.contains_key(id)
    }

    pub fn is_retired(&self, id: &SwapId) -> bool {
        self.retired.contains(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &SwapRecord> {
        self.records.values()
    }

    /// Sum of pending amounts in `mint`.
    pub fn pending_total(&self, mint: &Address) -> u128 {
        self.records
            .values()
            .filter(|r| r.mint == *mint)
            .map(|r| r.amount as u128)
            .sum()
    }

    /// Insert iff no record with the same identifier is pending.
    pub(crate) fn insert(&mut self, record: SwapRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.records.insert(record.id, record);
        true
    }

    pub(crate) fn remove(&mut self, id: &SwapId) -> Option<SwapRecord> {
        self.records.remove(id)
    }

    /// Returns whether the identifier was newly retired.
    pub(crate) fn retire(&mut self, id: SwapId) -> bool {
        self.retired.insert(id)
    }

    pub(crate) fn unretire(&mut self, id: &SwapId) {
        self.retired.remove(id);
    }
}
