use chrono::{DateTime, Utc};
use hashlock_core::{Address, Slot, SwapId, TokenAmount};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four escrow operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Initiate,
    Redeem,
    Refund,
    InstantRefund,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initiate => write!(f, "initiate"),
            Self::Redeem => write!(f, "redeem"),
            Self::Refund => write!(f, "refund"),
            Self::InstantRefund => write!(f, "instant_refund"),
        }
    }
}

/// Proof that an operation committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Time-ordered receipt identifier (UUID v7).
    pub receipt_id: Uuid,
    pub swap_id: SwapId,
    pub operation: Operation,
    pub mint: Address,
    pub amount: TokenAmount,
    /// Debited funder for `initiate`, credited recipient otherwise.
    pub party: Address,
    /// Ledger clock reading at commit.
    pub slot: Slot,
    pub committed_at: DateTime<Utc>,
}

impl CommitReceipt {
    pub fn new(
        swap_id: SwapId,
        operation: Operation,
        mint: Address,
        amount: TokenAmount,
        party: Address,
        slot: Slot,
    ) -> Self {
        Self {
            receipt_id: Uuid::now_v7(),
            swap_id,
            operation,
            mint,
            amount,
            party,
            slot,
            committed_at: Utc::now(),
        }
    }
}
