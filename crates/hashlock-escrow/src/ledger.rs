//! Transactional ledger store.
//!
//! All custodial state lives in one [`LedgerState`] behind a single lock.
//! Operations run as [`Transaction`]s: every mutation is journaled and undone
//! if the operation or the commit hook fails, so each operation is
//! all-or-nothing and operations are serialized.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use hashlock_core::{Address, EventRecord, Slot, SwapEvent, SwapId, SwapRecord, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::accounts::AccountBook;
use crate::error::EscrowError;
use crate::events::EventSink;
use crate::registry::SwapRegistry;
use crate::vault::TokenVault;

/// The complete custodial state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub registry: SwapRegistry,
    pub vault: TokenVault,
    pub accounts: AccountBook,
    /// Sequence number of the next emitted event.
    #[serde(default)]
    pub next_sequence: u64,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every mint's custody equals the sum of its pending swaps.
    pub fn audit(&self) -> Result<(), EscrowError> {
        let mints: HashSet<&Address> = self
            .vault
            .mints()
            .map(|(mint, _)| mint)
            .chain(self.registry.records().map(|r| &r.mint))
            .collect();
        for mint in mints {
            let held = self.vault.balance(mint) as u128;
            let expected = self.registry.pending_total(mint);
            if held != expected {
                return Err(EscrowError::Internal(format!(
                    "vault for mint {} holds {}, pending swaps total {}",
                    mint, held, expected
                )));
            }
        }
        Ok(())
    }
}

/// Runs after an operation succeeds and before its effects become visible.
/// An error rolls the transaction back.
pub trait CommitHook: Send + Sync {
    fn before_commit(&self, state: &LedgerState, events: &[EventRecord]) -> Result<(), EscrowError>;
}

#[derive(Debug)]
enum Undo {
    Created(SwapId),
    Destroyed { record: SwapRecord, retired: bool },
    Debited { mint: Address, owner: Address, amount: TokenAmount },
    Credited { mint: Address, owner: Address, amount: TokenAmount },
    Deposited { mint: Address, amount: TokenAmount },
    Withdrawn { mint: Address, amount: TokenAmount },
}

/// Exclusive view of the ledger for one operation.
pub struct Transaction<'a> {
    state: &'a mut LedgerState,
    journal: Vec<Undo>,
    events: Vec<EventRecord>,
    start_sequence: u64,
}

impl<'a> Transaction<'a> {
    fn begin(state: &'a mut LedgerState) -> Self {
        let start_sequence = state.next_sequence;
        Self {
            state,
            journal: Vec::new(),
            events: Vec::new(),
            start_sequence,
        }
    }

    pub fn state(&self) -> &LedgerState {
        self.state
    }

    pub fn find(&self, id: &SwapId) -> Option<&SwapRecord> {
        self.state.registry.find(id)
    }

    pub fn is_retired(&self, id: &SwapId) -> bool {
        self.state.registry.is_retired(id)
    }

    pub fn balance(&self, owner: &Address, mint: &Address) -> TokenAmount {
        self.state.accounts.balance(owner, mint)
    }

    /// Insert a record iff none is pending under its identifier.
    pub fn create(&mut self, record: SwapRecord) -> Result<(), EscrowError> {
        let id = record.id;
        if !self.state.registry.insert(record) {
            return Err(EscrowError::AlreadyExists(id));
        }
        self.journal.push(Undo::Created(id));
        Ok(())
    }

    /// Remove a pending record, optionally retiring its identifier.
    pub fn destroy(&mut self, id: &SwapId, retire: bool) -> Result<SwapRecord, EscrowError> {
        let record = self
            .state
            .registry
            .remove(id)
            .ok_or(EscrowError::NotFound(*id))?;
        let retired = retire && self.state.registry.retire(*id);
        self.journal.push(Undo::Destroyed {
            record: record.clone(),
            retired,
        });
        Ok(record)
    }

    pub fn debit(&mut self, mint: &Address, owner: &Address, amount: TokenAmount) -> Result<(), EscrowError> {
        self.state.accounts.debit(mint, owner, amount)?;
        self.journal.push(Undo::Debited {
            mint: *mint,
            owner: *owner,
            amount,
        });
        Ok(())
    }

    pub fn credit(&mut self, mint: &Address, owner: &Address, amount: TokenAmount) -> Result<(), EscrowError> {
        self.state.accounts.credit(mint, owner, amount)?;
        self.journal.push(Undo::Credited {
            mint: *mint,
            owner: *owner,
            amount,
        });
        Ok(())
    }

    /// Move `amount` from `from`'s account into custody.
    pub fn escrow(&mut self, mint: &Address, from: &Address, amount: TokenAmount) -> Result<(), EscrowError> {
        self.debit(mint, from, amount)?;
        self.state.vault.deposit(mint, amount)?;
        self.journal.push(Undo::Deposited { mint: *mint, amount });
        Ok(())
    }

    /// Move `amount` out of custody into `to`'s account.
    pub fn release(&mut self, mint: &Address, to: &Address, amount: TokenAmount) -> Result<(), EscrowError> {
        self.state.vault.withdraw(mint, amount)?;
        self.journal.push(Undo::Withdrawn { mint: *mint, amount });
        self.credit(mint, to, amount)
    }

    /// Record an event; it reaches the sinks only if the transaction commits.
    pub fn emit(&mut self, slot: Slot, event: SwapEvent) {
        let sequence = self.state.next_sequence;
        self.state.next_sequence += 1;
        self.events.push(EventRecord {
            sequence,
            slot,
            event,
        });
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    fn rollback(mut self) {
        while let Some(undo) = self.journal.pop() {
            match undo {
                Undo::Created(id) => {
                    self.state.registry.remove(&id);
                }
                Undo::Destroyed { record, retired } => {
                    if retired {
                        self.state.registry.unretire(&record.id);
                    }
                    self.state.registry.insert(record);
                }
                Undo::Debited { mint, owner, amount } => {
                    self.state.accounts.reverse_debit(&mint, &owner, amount);
                }
                Undo::Credited { mint, owner, amount } => {
                    self.state.accounts.reverse_credit(&mint, &owner, amount);
                }
                Undo::Deposited { mint, amount } => {
                    self.state.vault.reverse_deposit(&mint, amount);
                }
                Undo::Withdrawn { mint, amount } => {
                    self.state.vault.reverse_withdraw(&mint, amount);
                }
            }
        }
        self.state.next_sequence = self.start_sequence;
    }

    fn finish(self) -> Vec<EventRecord> {
        self.events
    }
}

/// Serializable store holding the ledger state.
///
/// `commit` runs one operation at a time under the write lock; readers see
/// only committed state.
pub struct LedgerStore {
    state: RwLock<LedgerState>,
    hook: Option<Arc<dyn CommitHook>>,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl LedgerStore {
    pub fn new(state: LedgerState) -> Self {
        Self {
            state: RwLock::new(state),
            hook: None,
            sinks: Vec::new(),
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn CommitHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Run `op` as a single all-or-nothing transaction.
    pub fn commit<T, F>(&self, op: F) -> Result<T, EscrowError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, EscrowError>,
    {
        let mut guard = self
            .state
            .write()
            .map_err(|_| EscrowError::Internal("ledger lock poisoned".into()))?;
        let mut tx = Transaction::begin(&mut guard);

        let output = match op(&mut tx) {
            Ok(output) => output,
            Err(err) => {
                tx.rollback();
                return Err(err);
            }
        };

        if let Some(hook) = &self.hook {
            if let Err(err) = hook.before_commit(tx.state(), tx.events()) {
                tracing::error!(error = %err, "Commit hook failed, rolling back");
                tx.rollback();
                return Err(err);
            }
        }

        for record in tx.finish() {
            for sink in &self.sinks {
                sink.publish(&record);
            }
        }
        Ok(output)
    }

    /// Read committed state.
    pub fn read<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> Result<T, EscrowError> {
        let guard = self
            .state
            .read()
            .map_err(|_| EscrowError::Internal("ledger lock poisoned".into()))?;
        Ok(f(&guard))
    }

    /// Credit an account outside any swap, e.g. a genesis allocation.
    pub fn fund(&self, owner: &Address, mint: &Address, amount: TokenAmount) -> Result<(), EscrowError> {
        self.commit(|tx| tx.credit(mint, owner, amount))?;
        tracing::info!(owner = %owner, mint = %mint, amount, "Account funded");
        Ok(())
    }

    pub fn snapshot(&self) -> Result<LedgerState, EscrowError> {
        self.read(|state| state.clone())
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(LedgerState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventLog;
    use hashlock_core::{HashAlgorithm, InitiateRequest, SecretHash};

    const MINT: Address = Address::new([1u8; 32]);
    const ALICE: Address = Address::new([2u8; 32]);
    const BOB: Address = Address::new([3u8; 32]);

    fn record() -> SwapRecord {
        let request = InitiateRequest::builder()
            .mint(MINT)
            .initiator(ALICE)
            .redeemer(BOB)
            .secret_hash(SecretHash::from_bytes([4u8; 32]))
            .amount(10)
            .timelock(100)
            .build()
            .unwrap();
        SwapRecord::from_request(request, HashAlgorithm::Sha256, 0, 0)
    }

    fn refunded(id: SwapId) -> SwapEvent {
        SwapEvent::Refunded {
            swap_id: id,
            mint: MINT,
            initiator: ALICE,
            redeemer: BOB,
            secret_hash: SecretHash::from_bytes([4u8; 32]),
            amount: 10,
            timelock: 100,
        }
    }

    struct FailingHook;

    impl CommitHook for FailingHook {
        fn before_commit(&self, _: &LedgerState, _: &[EventRecord]) -> Result<(), EscrowError> {
            Err(EscrowError::Internal("disk full".into()))
        }
    }

    #[test]
    fn test_commit_applies_changes() {
        let store = LedgerStore::default();
        store.fund(&ALICE, &MINT, 50).unwrap();
        store
            .commit(|tx| {
                tx.create(record())?;
                tx.escrow(&MINT, &ALICE, 10)
            })
            .unwrap();

        let state = store.snapshot().unwrap();
        assert_eq!(state.accounts.balance(&ALICE, &MINT), 40);
        assert_eq!(state.vault.balance(&MINT), 10);
        assert_eq!(state.registry.len(), 1);
        state.audit().unwrap();
    }

    #[test]
    fn test_failed_operation_rolls_back_everything() {
        let store = LedgerStore::default();
        store.fund(&ALICE, &MINT, 5).unwrap();
        let before = store.snapshot().unwrap();

        let result = store.commit(|tx| {
            tx.create(record())?;
            tx.emit(1, refunded(record().id));
            tx.escrow(&MINT, &ALICE, 10)
        });
        assert_eq!(
            result,
            Err(EscrowError::InsufficientFunds { available: 5, required: 10 })
        );
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn test_destroy_rollback_restores_record_and_retirement() {
        let store = LedgerStore::default();
        store.fund(&ALICE, &MINT, 10).unwrap();
        store
            .commit(|tx| {
                tx.create(record())?;
                tx.escrow(&MINT, &ALICE, 10)
            })
            .unwrap();
        let before = store.snapshot().unwrap();
        let id = record().id;

        let result: Result<(), _> = store.commit(|tx| {
            tx.release(&MINT, &BOB, 10)?;
            tx.destroy(&id, true)?;
            Err(EscrowError::Internal("abort".into()))
        });
        assert!(result.is_err());
        let after = store.snapshot().unwrap();
        assert_eq!(after, before);
        assert!(!after.registry.is_retired(&id));
    }

    #[test]
    fn test_create_duplicate() {
        let store = LedgerStore::default();
        store.commit(|tx| tx.create(record())).unwrap();
        let result = store.commit(|tx| tx.create(record()));
        assert_eq!(result, Err(EscrowError::AlreadyExists(record().id)));
    }

    #[test]
    fn test_destroy_missing() {
        let store = LedgerStore::default();
        let id = record().id;
        assert_eq!(
            store.commit(|tx| tx.destroy(&id, false)),
            Err(EscrowError::NotFound(id))
        );
    }

    #[test]
    fn test_hook_failure_rolls_back_and_suppresses_events() {
        let log = Arc::new(MemoryEventLog::new());
        let store = LedgerStore::default()
            .with_hook(Arc::new(FailingHook))
            .with_sink(log.clone());

        let result = store.commit(|tx| {
            tx.create(record())?;
            tx.emit(1, refunded(record().id));
            Ok(())
        });
        assert!(matches!(result, Err(EscrowError::Internal(_))));
        assert!(log.is_empty());
        let state = store.snapshot().unwrap();
        assert!(state.registry.is_empty());
        assert_eq!(state.next_sequence, 0);
    }

    #[test]
    fn test_events_published_in_sequence() {
        let log = Arc::new(MemoryEventLog::new());
        let store = LedgerStore::default().with_sink(log.clone());
        let id = record().id;

        store
            .commit(|tx| {
                tx.emit(1, refunded(id));
                Ok(())
            })
            .unwrap();
        let _ = store.commit(|tx| -> Result<(), EscrowError> {
            tx.emit(2, refunded(id));
            Err(EscrowError::Internal("abort".into()))
        });
        store
            .commit(|tx| {
                tx.emit(3, refunded(id));
                Ok(())
            })
            .unwrap();

        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence, 0);
        assert_eq!(records[1].sequence, 1);
        assert_eq!(records[1].slot, 3);
    }

    #[test]
    fn test_audit_detects_drift() {
        let mut state = LedgerState::new();
        state.vault.deposit(&MINT, 3).unwrap();
        assert!(matches!(state.audit(), Err(EscrowError::Internal(_))));

        let mut state = LedgerState::new();
        state.registry.insert(record());
        assert!(matches!(state.audit(), Err(EscrowError::Internal(_))));
    }

    #[test]
    fn test_state_snapshot_json() {
        let store = LedgerStore::default();
        store.fund(&ALICE, &MINT, 10).unwrap();
        store
            .commit(|tx| {
                tx.create(record())?;
                tx.escrow(&MINT, &ALICE, 10)
            })
            .unwrap();
        let state = store.snapshot().unwrap();
        let json = serde_json::to_vec(&state).unwrap();
        let back: LedgerState = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, state);
    }
}
