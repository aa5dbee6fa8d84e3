use std::collections::HashMap;

use hashlock_core::{Address, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::error::EscrowError;

/// Escrow custody, one balance per mint.
///
/// For every mint the custody balance equals the sum of the amounts of the
/// pending swaps in that mint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenVault {
    custody: HashMap<Address, TokenAmount>,
}

impl TokenVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, mint: &Address) -> TokenAmount {
        self.custody.get(mint).copied().unwrap_or(0)
    }

    pub fn mints(&self) -> impl Iterator<Item = (&Address, &TokenAmount)> {
        self.custody.iter()
    }

    pub(crate) fn deposit(&mut self, mint: &Address, amount: TokenAmount) -> Result<(), EscrowError> {
        let next = self
            .balance(mint)
            .checked_add(amount)
            .ok_or_else(|| EscrowError::ArithmeticOverflow(format!("vault balance of mint {}", mint)))?;
        self.set(mint, next);
        Ok(())
    }

    /// A short custody balance means the ledger is inconsistent; it is never
    /// caused by caller input.
    pub(crate) fn withdraw(&mut self, mint: &Address, amount: TokenAmount) -> Result<(), EscrowError> {
        let held = self.balance(mint);
        if held < amount {
            tracing::error!(mint = %mint, held, amount, "Vault custody short");
            return Err(EscrowError::Internal(format!(
                "vault for mint {} holds {}, cannot release {}",
                mint, held, amount
            )));
        }
        self.set(mint, held - amount);
        Ok(())
    }

    pub(crate) fn reverse_deposit(&mut self, mint: &Address, amount: TokenAmount) {
        let held = self.balance(mint);
        self.set(mint, held.saturating_sub(amount));
    }

    pub(crate) fn reverse_withdraw(&mut self, mint: &Address, amount: TokenAmount) {
        let held = self.balance(mint);
        self.set(mint, held.saturating_add(amount));
    }

    fn set(&mut self, mint: &Address, value: TokenAmount) {
        if value == 0 {
            self.custody.remove(mint);
        } else {
            self.custody.insert(*mint, value);
        }
    }
}
