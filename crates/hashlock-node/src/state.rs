//! Shared node state, accessible from HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use hashlock_escrow::{EscrowEngine, SecretBoard, SettlementIndex};

use crate::config::ClockKind;
use crate::storage::Storage;

pub struct NodeState {
    pub engine: EscrowEngine,
    pub storage: Arc<Storage>,
    /// Revealed secrets, rebuilt from the journal on startup.
    pub secrets: Arc<SecretBoard>,
    /// Outcomes of closed swaps, rebuilt from the journal on startup.
    pub settlements: Arc<SettlementIndex>,
    pub clock_kind: ClockKind,
    /// When the node started.
    pub start_time: Instant,
}

impl NodeState {
    pub fn new(
        engine: EscrowEngine,
        storage: Arc<Storage>,
        secrets: Arc<SecretBoard>,
        settlements: Arc<SettlementIndex>,
        clock_kind: ClockKind,
    ) -> Self {
        Self {
            engine,
            storage,
            secrets,
            settlements,
            clock_kind,
            start_time: Instant::now(),
        }
    }
}
