use dashmap::DashMap;
use hashlock_core::{EventRecord, Secret, SecretHash, Settlement, Slot, SwapEvent, SwapId};
use serde::{Deserialize, Serialize};

use crate::events::EventSink;

/// Secrets revealed by redemptions, looked up by their commitment.
///
/// The counterparty on the other chain watches this to claim its leg.
#[derive(Debug, Default)]
pub struct SecretBoard {
    revealed: DashMap<SecretHash, Secret>,
}

impl SecretBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, secret_hash: &SecretHash) -> Option<Secret> {
        self.revealed.get(secret_hash).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }
}

impl EventSink for SecretBoard {
    fn publish(&self, record: &EventRecord) {
        if let SwapEvent::Redeemed {
            swap_id,
            secret_hash,
            secret,
            ..
        } = &record.event
        {
            self.revealed.insert(*secret_hash, secret.clone());
            tracing::debug!(swap_id = %swap_id, secret_hash = %secret_hash, "Secret revealed");
        }
    }
}

/// How and when a swap was last closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementEntry {
    pub settlement: Settlement,
    pub slot: Slot,
    pub sequence: u64,
}

/// Answers "how did swap X close?" for swaps that are no longer pending.
///
/// Re-initiating an identifier clears its entry.
#[derive(Debug, Default)]
pub struct SettlementIndex {
    settled: DashMap<SwapId, SettlementEntry>,
}

impl SettlementIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SwapId) -> Option<SettlementEntry> {
        self.settled.get(id).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.settled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }
}

impl EventSink for SettlementIndex {
    fn publish(&self, record: &EventRecord) {
        let id = record.event.swap_id();
        match record.event.settlement() {
            Some(settlement) => {
                self.settled.insert(
                    id,
                    SettlementEntry {
                        settlement,
                        slot: record.slot,
                        sequence: record.sequence,
                    },
                );
            }
            None => {
                self.settled.remove(&id);
            }
        }
    }
}
