//! Fixtures shared by the cross-crate scenarios in `tests/`.

use std::sync::Arc;

use hashlock_core::{
    Address, EscrowConfig, HashAlgorithm, IdReusePolicy, InitiateRequest, Secret, SecretHash, Slot,
    TokenAmount,
};
use hashlock_crypto::{commitment, KeyPair};
use hashlock_escrow::{
    EscrowEngine, LedgerStore, ManualClock, MemoryEventLog, SecretBoard, SettlementIndex,
};

pub const MINT: Address = Address::new([0xA1; 32]);
pub const START: Slot = 1_000;

/// An engine over an in-memory ledger with two funded parties.
pub struct Harness {
    pub engine: Arc<EscrowEngine>,
    pub clock: Arc<ManualClock>,
    pub log: Arc<MemoryEventLog>,
    pub secrets: Arc<SecretBoard>,
    pub settlements: Arc<SettlementIndex>,
    pub alice: KeyPair,
    pub bob: KeyPair,
}

impl Harness {
    pub fn new(config: EscrowConfig) -> Self {
        let alice = KeyPair::from_seed(&[0x11; 32]);
        let bob = KeyPair::from_seed(&[0x22; 32]);
        let clock = Arc::new(ManualClock::new(START));
        let log = Arc::new(MemoryEventLog::new());
        let secrets = Arc::new(SecretBoard::new());
        let settlements = Arc::new(SettlementIndex::new());

        let store = Arc::new(
            LedgerStore::default()
                .with_sink(log.clone())
                .with_sink(secrets.clone())
                .with_sink(settlements.clone()),
        );
        store
            .fund(&alice.address(), &MINT, 1_000)
            .expect("fund alice");
        store
            .fund(&bob.address(), &MINT, 1_000)
            .expect("fund bob");

        let engine = Arc::new(EscrowEngine::new(store, clock.clone(), config));
        Self {
            engine,
            clock,
            log,
            secrets,
            settlements,
            alice,
            bob,
        }
    }

    pub fn with_reuse(policy: IdReusePolicy) -> Self {
        Self::new(EscrowConfig {
            id_reuse: policy,
            ..EscrowConfig::default()
        })
    }

    /// Alice locks `amount` for Bob until `timelock`.
    pub fn request(&self, secret_hash: SecretHash, amount: TokenAmount, timelock: Slot) -> InitiateRequest {
        InitiateRequest::builder()
            .mint(MINT)
            .initiator(self.alice.address())
            .redeemer(self.bob.address())
            .secret_hash(secret_hash)
            .amount(amount)
            .timelock(timelock)
            .build()
            .expect("complete request")
    }

    pub fn balance(&self, who: &KeyPair) -> TokenAmount {
        self.engine
            .balance(&who.address(), &MINT)
            .expect("balance")
    }

    pub fn escrowed(&self) -> TokenAmount {
        self.engine.vault_balance(&MINT).expect("vault balance")
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(EscrowConfig::default())
    }
}

/// A fixed secret and its SHA-256 commitment.
pub fn secret_pair(seed: u8) -> (Secret, SecretHash) {
    let secret = Secret::from_bytes([seed; 32]);
    let hash = commitment(HashAlgorithm::Sha256, &secret);
    (secret, hash)
}
