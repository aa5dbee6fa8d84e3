use hashlock_core::{CoreError, Slot, SwapId};

/// Escrow-layer errors.
///
/// Every failed operation leaves the ledger exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EscrowError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("timelock {timelock} is not after current time {now}")]
    InvalidTimelock { timelock: Slot, now: Slot },

    #[error("authorization failed: {0}")]
    Authorization(String),

    #[error("swap already pending: {0}")]
    AlreadyExists(SwapId),

    #[error("swap identifier retired: {0}")]
    Retired(SwapId),

    #[error("swap not found: {0}")]
    NotFound(SwapId),

    #[error("secret does not open the commitment of swap {0}")]
    InvalidSecret(SwapId),

    #[error("swap {swap_id} expired at {timelock} (now {now})")]
    Expired {
        swap_id: SwapId,
        timelock: Slot,
        now: Slot,
    },

    #[error("swap {swap_id} is refundable from {timelock} (now {now})")]
    TimelockNotExpired {
        swap_id: SwapId,
        timelock: Slot,
        now: Slot,
    },

    #[error("insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EscrowError {
    /// Stable snake_case name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::InvalidTimelock { .. } => "invalid_timelock",
            Self::Authorization(_) => "authorization",
            Self::AlreadyExists(_) => "already_exists",
            Self::Retired(_) => "retired",
            Self::NotFound(_) => "not_found",
            Self::InvalidSecret(_) => "invalid_secret",
            Self::Expired { .. } => "expired",
            Self::TimelockNotExpired { .. } => "timelock_not_expired",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::ArithmeticOverflow(_) => "arithmetic_overflow",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<CoreError> for EscrowError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount(msg) => Self::InvalidAmount(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}
