use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Address, HashAlgorithm, SecretHash, Slot, SwapId, TokenAmount};

/// Length of [`SwapParams::canonical_bytes`].
pub const CANONICAL_PARAMS_LEN: usize = 32 * 4 + 8 + 8;

/// The six fields that define a swap's identity.
///
/// Two swaps with identical parameters share an identifier, so at most one of
/// them can be pending at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParams {
    pub mint: Address,
    pub redeemer: Address,
    pub initiator: Address,
    pub secret_hash: SecretHash,
    pub amount: TokenAmount,
    pub timelock: Slot,
}

impl SwapParams {
    /// Canonical encoding: `mint ‖ redeemer ‖ initiator ‖ secret_hash ‖
    /// amount (u64 LE) ‖ timelock (u64 LE)`.
    pub fn canonical_bytes(&self) -> [u8; CANONICAL_PARAMS_LEN] {
        let mut out = [0u8; CANONICAL_PARAMS_LEN];
        out[0..32].copy_from_slice(self.mint.as_bytes());
        out[32..64].copy_from_slice(self.redeemer.as_bytes());
        out[64..96].copy_from_slice(self.initiator.as_bytes());
        out[96..128].copy_from_slice(self.secret_hash.as_bytes());
        out[128..136].copy_from_slice(&self.amount.to_le_bytes());
        out[136..144].copy_from_slice(&self.timelock.to_le_bytes());
        out
    }

    /// Derive the swap identifier (BLAKE3 of the canonical encoding).
    pub fn id(&self) -> SwapId {
        SwapId::from_bytes(*blake3::hash(&self.canonical_bytes()).as_bytes())
    }
}

/// Everything a caller supplies to open a swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiateRequest {
    /// Token type being escrowed.
    pub mint: Address,
    /// Whose balance is debited. May be a relayer acting for the initiator.
    pub funder: Address,
    /// Identity input and refund recipient.
    pub initiator: Address,
    /// Sole recipient of a redemption.
    pub redeemer: Address,
    pub secret_hash: SecretHash,
    pub amount: TokenAmount,
    /// Absolute deadline in ledger time units.
    pub timelock: Slot,
    /// Opaque routing information for the destination leg, never interpreted.
    pub destination_data: Option<Vec<u8>>,
    /// Pays the record's storage deposit and is reimbursed on close.
    pub rent_sponsor: Address,
}

impl InitiateRequest {
    pub fn builder() -> InitiateRequestBuilder {
        InitiateRequestBuilder::default()
    }

    pub fn params(&self) -> SwapParams {
        SwapParams {
            mint: self.mint,
            redeemer: self.redeemer,
            initiator: self.initiator,
            secret_hash: self.secret_hash,
            amount: self.amount,
            timelock: self.timelock,
        }
    }

    pub fn swap_id(&self) -> SwapId {
        self.params().id()
    }

    /// Clock-independent checks. Deadline checks need the ledger clock and
    /// happen in the escrow engine.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.amount == 0 {
            return Err(CoreError::InvalidAmount(
                "amount must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`InitiateRequest`].
///
/// `funder` defaults to the initiator and `rent_sponsor` to the funder.
#[derive(Default)]
pub struct InitiateRequestBuilder {
    mint: Option<Address>,
    funder: Option<Address>,
    initiator: Option<Address>,
    redeemer: Option<Address>,
    secret_hash: Option<SecretHash>,
    amount: Option<TokenAmount>,
    timelock: Option<Slot>,
    destination_data: Option<Vec<u8>>,
    rent_sponsor: Option<Address>,
}

impl InitiateRequestBuilder {
    pub fn mint(mut self, mint: Address) -> Self {
        self.mint = Some(mint);
        self
    }

    pub fn funder(mut self, funder: Address) -> Self {
        self.funder = Some(funder);
        self
    }

    pub fn initiator(mut self, initiator: Address) -> Self {
        self.initiator = Some(initiator);
        self
    }

    pub fn redeemer(mut self, redeemer: Address) -> Self {
        self.redeemer = Some(redeemer);
        self
    }

    pub fn secret_hash(mut self, secret_hash: SecretHash) -> Self {
        self.secret_hash = Some(secret_hash);
        self
    }

    pub fn amount(mut self, amount: TokenAmount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Absolute deadline.
    pub fn timelock(mut self, timelock: Slot) -> Self {
        self.timelock = Some(timelock);
        self
    }

    pub fn destination_data(mut self, data: Vec<u8>) -> Self {
        self.destination_data = Some(data);
        self
    }

    pub fn rent_sponsor(mut self, sponsor: Address) -> Self {
        self.rent_sponsor = Some(sponsor);
        self
    }

    pub fn build(self) -> Result<InitiateRequest, CoreError> {
        let mint = self.mint.ok_or_else(|| CoreError::MissingField("mint".into()))?;
        let initiator = self
            .initiator
            .ok_or_else(|| CoreError::MissingField("initiator".into()))?;
        let redeemer = self
            .redeemer
            .ok_or_else(|| CoreError::MissingField("redeemer".into()))?;
        let secret_hash = self
            .secret_hash
            .ok_or_else(|| CoreError::MissingField("secret_hash".into()))?;
        let amount = self
            .amount
            .ok_or_else(|| CoreError::MissingField("amount".into()))?;
        let timelock = self
            .timelock
            .ok_or_else(|| CoreError::MissingField("timelock".into()))?;
        let funder = self.funder.unwrap_or(initiator);
        let rent_sponsor = self.rent_sponsor.unwrap_or(funder);

        let request = InitiateRequest {
            mint,
            funder,
            initiator,
            redeemer,
            secret_hash,
            amount,
            timelock,
            destination_data: self.destination_data,
            rent_sponsor,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Durable state of a pending swap. Its presence in the registry is what
/// "pending" means; settlement removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub id: SwapId,
    pub mint: Address,
    pub initiator: Address,
    pub funder: Address,
    pub redeemer: Address,
    pub secret_hash: SecretHash,
    pub amount: TokenAmount,
    pub timelock: Slot,
    pub destination_data: Option<Vec<u8>>,
    pub rent_sponsor: Address,
    /// Native units collected from `rent_sponsor` at creation.
    pub rent_deposit: u64,
    /// Digest the commitment was made with.
    pub hash_algorithm: HashAlgorithm,
    /// Clock reading when the record was created.
    pub created_at: Slot,
}

impl SwapRecord {
    pub fn from_request(
        request: InitiateRequest,
        hash_algorithm: HashAlgorithm,
        rent_deposit: u64,
        created_at: Slot,
    ) -> Self {
        Self {
            id: request.swap_id(),
            mint: request.mint,
            initiator: request.initiator,
            funder: request.funder,
            redeemer: request.redeemer,
            secret_hash: request.secret_hash,
            amount: request.amount,
            timelock: request.timelock,
            destination_data: request.destination_data,
            rent_sponsor: request.rent_sponsor,
            rent_deposit,
            hash_algorithm,
            created_at,
        }
    }

    pub fn params(&self) -> SwapParams {
        SwapParams {
            mint: self.mint,
            redeemer: self.redeemer,
            initiator: self.initiator,
            secret_hash: self.secret_hash,
            amount: self.amount,
            timelock: self.timelock,
        }
    }

    /// Whether the redemption window has closed at `now`.
    pub fn is_expired_at(&self, now: Slot) -> bool {
        now >= self.timelock
    }
}
