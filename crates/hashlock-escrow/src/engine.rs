use std::sync::Arc;

use hashlock_core::{
    Address, EscrowConfig, IdReusePolicy, InitiateRequest, Secret, Slot, SwapEvent, SwapId,
    SwapRecord, TokenAmount,
};
use hashlock_crypto::{verify_instant_refund, verify_secret, Signature};

use crate::clock::Clock;
use crate::error::EscrowError;
use crate::ledger::{LedgerStore, Transaction};
use crate::receipt::{CommitReceipt, Operation};

/// Hashed-timelock escrow state machine.
///
/// A swap is pending while its record exists. Each settlement destroys the
/// record in the same transaction that moves the funds, so of two racing
/// settlements the second always observes `NotFound`.
pub struct EscrowEngine {
    store: Arc<LedgerStore>,
    clock: Arc<dyn Clock>,
    config: EscrowConfig,
}

impl EscrowEngine {
    pub fn new(store: Arc<LedgerStore>, clock: Arc<dyn Clock>, config: EscrowConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    pub fn now(&self) -> Slot {
        self.clock.now()
    }

    /// Absolute deadline `delta` units from now.
    pub fn deadline_after(&self, delta: u64) -> Result<Slot, EscrowError> {
        let now = self.clock.now();
        now.checked_add(delta).ok_or_else(|| {
            EscrowError::ArithmeticOverflow(format!("deadline {} + {}", now, delta))
        })
    }

    /// Lock `amount` of `mint` from the funder under `secret_hash` until
    /// `timelock`.
    pub fn initiate(&self, request: InitiateRequest) -> Result<CommitReceipt, EscrowError> {
        let swap_id = request.swap_id();
        let result = self.try_initiate(request);
        log_outcome(Operation::Initiate, &swap_id, &result);
        result
    }

    /// Pay the redeemer by revealing the secret. Only before the timelock.
    pub fn redeem(&self, swap_id: &SwapId, secret: &Secret) -> Result<CommitReceipt, EscrowError> {
        let result = self.store.commit(|tx| {
            let now = self.clock.now();
            let record = pending(tx, swap_id)?;
            if record.is_expired_at(now) {
                return Err(EscrowError::Expired {
                    swap_id: *swap_id,
                    timelock: record.timelock,
                    now,
                });
            }
            if !verify_secret(record.hash_algorithm, secret, &record.secret_hash) {
                return Err(EscrowError::InvalidSecret(*swap_id));
            }

            let event = SwapEvent::Redeemed {
                swap_id: record.id,
                mint: record.mint,
                initiator: record.initiator,
                redeemer: record.redeemer,
                secret_hash: record.secret_hash,
                secret: secret.clone(),
                amount: record.amount,
                timelock: record.timelock,
            };
            let recipient = record.redeemer;
            self.settle(tx, record, recipient, Operation::Redeem, event, now)
        });
        log_outcome(Operation::Redeem, swap_id, &result);
        result
    }

    /// Return the funds to the initiator once the timelock has passed.
    pub fn refund(&self, swap_id: &SwapId) -> Result<CommitReceipt, EscrowError> {
        let result = self.store.commit(|tx| {
            let now = self.clock.now();
            let record = pending(tx, swap_id)?;
            if !record.is_expired_at(now) {
                return Err(EscrowError::TimelockNotExpired {
                    swap_id: *swap_id,
                    timelock: record.timelock,
                    now,
                });
            }

            let event = SwapEvent::Refunded {
                swap_id: record.id,
                mint: record.mint,
                initiator: record.initiator,
                redeemer: record.redeemer,
                secret_hash: record.secret_hash,
                amount: record.amount,
                timelock: record.timelock,
            };
            let recipient = record.initiator;
            self.settle(tx, record, recipient, Operation::Refund, event, now)
        });
        log_outcome(Operation::Refund, swap_id, &result);
        result
    }

    /// Return the funds to the initiator at any time, given the redeemer's
    /// signed consent.
    pub fn instant_refund(
        &self,
        swap_id: &SwapId,
        consent: &Signature,
    ) -> Result<CommitReceipt, EscrowError> {
        let result = self.store.commit(|tx| {
            let now = self.clock.now();
            let record = pending(tx, swap_id)?;
            verify_instant_refund(swap_id, consent, &record.redeemer).map_err(|e| {
                EscrowError::Authorization(format!("redeemer consent rejected: {}", e))
            })?;

            let event = SwapEvent::InstantRefunded {
                swap_id: record.id,
                mint: record.mint,
                initiator: record.initiator,
                redeemer: record.redeemer,
                secret_hash: record.secret_hash,
                amount: record.amount,
                timelock: record.timelock,
            };
            let recipient = record.initiator;
            self.settle(tx, record, recipient, Operation::InstantRefund, event, now)
        });
        log_outcome(Operation::InstantRefund, swap_id, &result);
        result
    }

    pub fn find(&self, swap_id: &SwapId) -> Result<SwapRecord, EscrowError> {
        self.store
            .read(|state| state.registry.find(swap_id).cloned())?
            .ok_or(EscrowError::NotFound(*swap_id))
    }

    pub fn is_retired(&self, swap_id: &SwapId) -> Result<bool, EscrowError> {
        self.store.read(|state| state.registry.is_retired(swap_id))
    }

    pub fn pending_count(&self) -> Result<usize, EscrowError> {
        self.store.read(|state| state.registry.len())
    }

    pub fn balance(&self, owner: &Address, mint: &Address) -> Result<TokenAmount, EscrowError> {
        self.store.read(|state| state.accounts.balance(owner, mint))
    }

    pub fn vault_balance(&self, mint: &Address) -> Result<TokenAmount, EscrowError> {
        self.store.read(|state| state.vault.balance(mint))
    }

    fn try_initiate(&self, request: InitiateRequest) -> Result<CommitReceipt, EscrowError> {
        request.validate()?;
        if let Some(data) = &request.destination_data {
            if data.len() > self.config.max_destination_data_len {
                return Err(EscrowError::Validation(format!(
                    "destination data is {} bytes, limit is {}",
                    data.len(),
                    self.config.max_destination_data_len
                )));
            }
        }

        self.store.commit(|tx| {
            let now = self.clock.now();
            if request.timelock <= now {
                return Err(EscrowError::InvalidTimelock {
                    timelock: request.timelock,
                    now,
                });
            }

            let swap_id = request.swap_id();
            if self.config.id_reuse == IdReusePolicy::Forbid && tx.is_retired(&swap_id) {
                return Err(EscrowError::Retired(swap_id));
            }

            let rent = self.config.rent_per_record;
            let record =
                SwapRecord::from_request(request.clone(), self.config.hash_algorithm, rent, now);
            tx.create(record.clone())?;
            tx.escrow(&record.mint, &record.funder, record.amount)?;
            if rent > 0 {
                tx.debit(&Address::NATIVE, &record.rent_sponsor, rent)?;
            }

            tx.emit(
                now,
                SwapEvent::Initiated {
                    swap_id,
                    mint: record.mint,
                    initiator: record.initiator,
                    funder: record.funder,
                    redeemer: record.redeemer,
                    secret_hash: record.secret_hash,
                    amount: record.amount,
                    timelock: record.timelock,
                    destination_data: record.destination_data.clone(),
                },
            );

            Ok(CommitReceipt::new(
                swap_id,
                Operation::Initiate,
                record.mint,
                record.amount,
                record.funder,
                now,
            ))
        })
    }

    /// Release custody to `recipient`, destroy the record, reimburse rent.
    fn settle(
        &self,
        tx: &mut Transaction<'_>,
        record: SwapRecord,
        recipient: Address,
        operation: Operation,
        event: SwapEvent,
        now: Slot,
    ) -> Result<CommitReceipt, EscrowError> {
        tx.release(&record.mint, &recipient, record.amount)?;
        let retire = self.config.id_reuse == IdReusePolicy::Forbid;
        tx.destroy(&record.id, retire)?;
        if record.rent_deposit > 0 {
            tx.credit(&Address::NATIVE, &record.rent_sponsor, record.rent_deposit)?;
        }
        tx.emit(now, event);

        Ok(CommitReceipt::new(
            record.id,
            operation,
            record.mint,
            record.amount,
            recipient,
            now,
        ))
    }
}

fn pending(tx: &Transaction<'_>, swap_id: &SwapId) -> Result<SwapRecord, EscrowError> {
    tx.find(swap_id).cloned().ok_or(EscrowError::NotFound(*swap_id))
}

fn log_outcome(operation: Operation, swap_id: &SwapId, result: &Result<CommitReceipt, EscrowError>) {
    match result {
        Ok(receipt) => tracing::info!(
            swap_id = %swap_id,
            operation = %operation,
            amount = receipt.amount,
            party = %receipt.party,
            slot = receipt.slot,
            "Swap operation committed"
        ),
        Err(EscrowError::Internal(msg)) => tracing::error!(
            swap_id = %swap_id,
            operation = %operation,
            error = %msg,
            "Swap operation failed"
        ),
        Err(err) => tracing::debug!(
            swap_id = %swap_id,
            operation = %operation,
            kind = err.kind(),
            error = %err,
            "Swap operation rejected"
        ),
    }
}
