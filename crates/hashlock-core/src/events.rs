use serde::{Deserialize, Serialize};

use crate::types::{Address, Secret, SecretHash, Slot, SwapId, TokenAmount};

/// Observable outcome of a committed escrow operation.
///
/// `Redeemed` carries the secret so that watchers can complete the
/// counter-leg on the other chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwapEvent {
    Initiated {
        swap_id: SwapId,
        mint: Address,
        initiator: Address,
        funder: Address,
        redeemer: Address,
        secret_hash: SecretHash,
        amount: TokenAmount,
        timelock: Slot,
        destination_data: Option<Vec<u8>>,
    },
    Redeemed {
        swap_id: SwapId,
        mint: Address,
        initiator: Address,
        redeemer: Address,
        secret_hash: SecretHash,
        secret: Secret,
        amount: TokenAmount,
        timelock: Slot,
    },
    Refunded {
        swap_id: SwapId,
        mint: Address,
        initiator: Address,
        redeemer: Address,
        secret_hash: SecretHash,
        amount: TokenAmount,
        timelock: Slot,
    },
    InstantRefunded {
        swap_id: SwapId,
        mint: Address,
        initiator: Address,
        redeemer: Address,
        secret_hash: SecretHash,
        amount: TokenAmount,
        timelock: Slot,
    },
}

impl SwapEvent {
    pub fn swap_id(&self) -> SwapId {
        match self {
            Self::Initiated { swap_id, .. }
            | Self::Redeemed { swap_id, .. }
            | Self::Refunded { swap_id, .. }
            | Self::InstantRefunded { swap_id, .. } => *swap_id,
        }
    }

    /// How the swap was closed, or `None` for `Initiated`.
    pub fn settlement(&self) -> Option<Settlement> {
        match self {
            Self::Initiated { .. } => None,
            Self::Redeemed { .. } => Some(Settlement::Redeemed),
            Self::Refunded { .. } => Some(Settlement::Refunded),
            Self::InstantRefunded { .. } => Some(Settlement::InstantRefunded),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Initiated { .. } => "initiated",
            Self::Redeemed { .. } => "redeemed",
            Self::Refunded { .. } => "refunded",
            Self::InstantRefunded { .. } => "instant_refunded",
        }
    }
}

/// Terminal outcome of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    Redeemed,
    Refunded,
    InstantRefunded,
}

impl std::fmt::Display for Settlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redeemed => write!(f, "redeemed"),
            Self::Refunded => write!(f, "refunded"),
            Self::InstantRefunded => write!(f, "instant_refunded"),
        }
    }
}

/// An event stamped with its position in the commit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Strictly increasing across all commits.
    pub sequence: u64,
    /// Clock reading at commit.
    pub slot: Slot,
    pub event: SwapEvent,
}
