use std::sync::RwLock;

use hashlock_core::{EventRecord, SwapId};

/// Receives committed events in commit order.
///
/// Called while the ledger's write lock is held, so implementations must not
/// call back into the store.
pub trait EventSink: Send + Sync {
    fn publish(&self, record: &EventRecord);

    /// Feed historical events, e.g. from a journal on startup.
    fn replay(&self, records: &[EventRecord]) {
        for record in records {
            self.publish(record);
        }
    }
}

/// Append-only in-memory event log.
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    records: RwLock<Vec<EventRecord>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.records
            .read()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn for_swap(&self, id: &SwapId) -> Vec<EventRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.event.swap_id() == *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemoryEventLog {
    fn publish(&self, record: &EventRecord) {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashlock_core::{Address, SwapEvent};

    fn refunded(id: u8, sequence: u64) -> EventRecord {
        EventRecord {
            sequence,
            slot: 7,
            event: SwapEvent::Refunded {
                swap_id: SwapId::from_bytes([id; 32]),
                mint: Address::NATIVE,
                initiator: Address::new([2u8; 32]),
                redeemer: Address::new([3u8; 32]),
                secret_hash: hashlock_core::SecretHash::from_bytes([4u8; 32]),
                amount: 1,
                timelock: 5,
            },
        }
    }

    #[test]
    fn test_memory_log_appends() {
        let log = MemoryEventLog::new();
        assert!(log.is_empty());
        log.publish(&refunded(1, 0));
        log.publish(&refunded(2, 1));
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[1].sequence, 1);
    }

    #[test]
    fn test_memory_log_filter_by_swap() {
        let log = MemoryEventLog::new();
        log.replay(&[refunded(1, 0), refunded(2, 1), refunded(1, 2)]);
        let events = log.for_swap(&SwapId::from_bytes([1u8; 32]));
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].sequence, 2);
    }
}
