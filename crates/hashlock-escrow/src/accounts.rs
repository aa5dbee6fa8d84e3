use std::collections::HashMap;

use hashlock_core::{Address, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::error::EscrowError;

/// Per-mint, per-owner token balances held outside the escrow.
///
/// Mutated only through [`crate::Transaction`], which journals every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBook {
    balances: HashMap<Address, HashMap<Address, TokenAmount>>,
}

impl AccountBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, owner: &Address, mint: &Address) -> TokenAmount {
        self.balances
            .get(mint)
            .and_then(|owners| owners.get(owner))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn debit(
        &mut self,
        mint: &Address,
        owner: &Address,
        amount: TokenAmount,
    ) -> Result<(), EscrowError> {
        let available = self.balance(owner, mint);
        if available < amount {
            return Err(EscrowError::InsufficientFunds {
                available,
                required: amount,
            });
        }
        self.set(mint, owner, available - amount);
        Ok(())
    }

    pub(crate) fn credit(
        &mut self,
        mint: &Address,
        owner: &Address,
        amount: TokenAmount,
    ) -> Result<(), EscrowError> {
        let current = self.balance(owner, mint);
        let next = current.checked_add(amount).ok_or_else(|| {
            EscrowError::ArithmeticOverflow(format!("balance of {} in mint {}", owner, mint))
        })?;
        self.set(mint, owner, next);
        Ok(())
    }

    /// Undo a prior `debit`.
    pub(crate) fn reverse_debit(&mut self, mint: &Address, owner: &Address, amount: TokenAmount) {
        let current = self.balance(owner, mint);
        self.set(mint, owner, current.saturating_add(amount));
    }

    /// Undo a prior `credit`.
    pub(crate) fn reverse_credit(&mut self, mint: &Address, owner: &Address, amount: TokenAmount) {
        let current = self.balance(owner, mint);
        self.set(mint, owner, current.saturating_sub(amount));
    }

    fn set(&mut self, mint: &Address, owner: &Address, value: TokenAmount) {
        if value == 0 {
            if let Some(owners) = self.balances.get_mut(mint) {
                owners.remove(owner);
                if owners.is_empty() {
                    self.balances.remove(mint);
                }
            }
        } else {
            self.balances.entry(*mint).or_default().insert(*owner, value);
        }
    }
}
