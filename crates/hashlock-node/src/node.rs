//! The Hashlock node orchestrator.
//!
//! Opens storage, restores the ledger, rebuilds the event indices and serves
//! the HTTP API.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use hashlock_escrow::{
    Clock, EscrowEngine, EventSink, LedgerState, LedgerStore, SecretBoard, SettlementIndex,
    SlotClock, UnixClock,
};

use crate::config::{ClockKind, ClockConfig, HashlockConfig};
use crate::state::NodeState;
use crate::storage::{SnapshotHook, Storage};

/// The Hashlock node.
pub struct HashlockNode {
    config: HashlockConfig,
    node_state: Option<Arc<NodeState>>,
    api_handle: Option<JoinHandle<Result<()>>>,
}

impl HashlockNode {
    pub fn new(config: HashlockConfig) -> Self {
        Self {
            config,
            node_state: None,
            api_handle: None,
        }
    }

    /// Open storage, restore the ledger and start the HTTP API.
    /// Returns the bound API address.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        tracing::info!("starting Hashlock node");

        let storage = Arc::new(Storage::open(&self.config.storage.data_dir)?);
        tracing::info!(path = %self.config.storage.data_dir.display(), "storage initialized");

        let clock = build_clock(&self.config.clock);
        let node_state = Arc::new(restore_state(&self.config, storage, clock)?);

        let listener = tokio::net::TcpListener::bind(self.config.api_addr()).await?;
        let api_addr = listener.local_addr()?;
        let api_state = node_state.clone();
        self.api_handle = Some(tokio::spawn(async move {
            crate::api::serve(listener, api_state).await
        }));

        self.node_state = Some(node_state);
        Ok(api_addr)
    }

    /// Run until the API server exits.
    pub async fn run(&mut self) -> Result<()> {
        let handle = self
            .api_handle
            .take()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;
        handle.await?
    }

    /// Gracefully shut down the node.
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("shutting down Hashlock node");

        if let Some(handle) = self.api_handle.take() {
            handle.abort();
        }
        if let Some(state) = self.node_state.take() {
            if let Ok(pending) = state.engine.pending_count() {
                tracing::info!(pending, "ledger closed");
            }
        }

        tracing::info!("Hashlock node shut down");
        Ok(())
    }

    pub fn state(&self) -> Option<&Arc<NodeState>> {
        self.node_state.as_ref()
    }
}

pub fn build_clock(config: &ClockConfig) -> Arc<dyn Clock> {
    match config.kind {
        ClockKind::Slot => Arc::new(SlotClock::new(
            config.genesis,
            Duration::from_millis(config.slot_duration_ms),
        )),
        ClockKind::UnixMillis => Arc::new(UnixClock::new()),
    }
}

/// Restore the last ledger snapshot, or create the ledger from the genesis
/// allocations, and rebuild the indices from the journal.
pub fn restore_state(
    config: &HashlockConfig,
    storage: Arc<Storage>,
    clock: Arc<dyn Clock>,
) -> Result<NodeState> {
    let snapshot = storage.load_ledger()?;
    let fresh = snapshot.is_none();
    let ledger = snapshot.unwrap_or_else(LedgerState::new);
    ledger.audit()?;

    let secrets = Arc::new(SecretBoard::new());
    let settlements = Arc::new(SettlementIndex::new());
    let journal = storage.all_events()?;
    secrets.replay(&journal);
    settlements.replay(&journal);
    tracing::info!(
        events = journal.len(),
        pending = ledger.registry.len(),
        revealed = secrets.len(),
        "ledger restored"
    );

    let store = Arc::new(
        LedgerStore::new(ledger)
            .with_hook(Arc::new(SnapshotHook::new(storage.clone())))
            .with_sink(secrets.clone())
            .with_sink(settlements.clone()),
    );

    // Genesis is one commit so a failed allocation leaves the database fresh.
    if fresh {
        store.commit(|tx| {
            for allocation in &config.genesis.allocations {
                tx.credit(&allocation.mint, &allocation.owner, allocation.amount)?;
            }
            Ok(())
        })?;
        tracing::info!(
            allocations = config.genesis.allocations.len(),
            "genesis applied"
        );
    }

    let engine = EscrowEngine::new(store, clock, config.escrow.clone());
    Ok(NodeState::new(
        engine,
        storage,
        secrets,
        settlements,
        config.clock.kind,
    ))
}
