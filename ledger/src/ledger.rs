//! In-memory balance and allowance store.

use std::collections::HashMap;

use tracing::debug;
use vestgate_types::Address;

use crate::error::LedgerError;
use crate::genesis::GenesisConfig;
use crate::snapshot::LedgerSnapshot;

/// Balances, allowances and the fixed total supply.
///
/// Zero balances and zero allowances are never stored, so `holders()` only
/// yields accounts that actually hold tokens.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    balances: HashMap<Address, u128>,
    /// (owner, spender) → remaining allowance.
    allowances: HashMap<(Address, Address), u128>,
    total_supply: u128,
}

/// Summary statistics for the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerSummary {
    pub holders: usize,
    pub allowances: usize,
    pub total_supply: u128,
}

impl Ledger {
    /// An empty ledger with zero supply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ledger by crediting the whole issued supply to the genesis owner.
    pub fn with_genesis(config: &GenesisConfig) -> Result<Self, LedgerError> {
        if config.owner.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        let supply = config.raw_supply()?;
        let mut ledger = Self::new();
        ledger.total_supply = supply;
        ledger.set_balance(config.owner, supply);
        debug!(owner = %config.owner, supply, "ledger seeded from genesis");
        Ok(ledger)
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// Rejects snapshots whose hash does not verify or whose balances do not
    /// add up to the recorded total supply.
    pub fn restore(snapshot: &LedgerSnapshot) -> Result<Self, LedgerError> {
        if !snapshot.verify() {
            return Err(LedgerError::CorruptSnapshot);
        }
        let mut ledger = Self::new();
        ledger.total_supply = snapshot.total_supply;
        for entry in &snapshot.balances {
            ledger.set_balance(entry.address, entry.balance);
        }
        for entry in &snapshot.allowances {
            ledger.approve(entry.owner, entry.spender, entry.amount);
        }
        ledger.check_supply_invariant()?;
        Ok(ledger)
    }

    pub fn balance_of(&self, address: &Address) -> u128 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Every account with a nonzero balance.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, u128)> + '_ {
        self.balances.iter().map(|(a, b)| (a, *b))
    }

    /// Every nonzero allowance as `(owner, spender, amount)`.
    pub fn allowances(&self) -> impl Iterator<Item = (&Address, &Address, u128)> + '_ {
        self.allowances.iter().map(|((o, s), a)| (o, s, *a))
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            holders: self.balances.len(),
            allowances: self.allowances.len(),
            total_supply: self.total_supply,
        }
    }

    /// Validate a transfer without applying it.
    pub fn check_transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// Either both balances change or neither does.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), LedgerError> {
        self.check_transfer(from, to, amount)?;
        if from == to || amount == 0 {
            return Ok(());
        }
        let from_balance = self.balance_of(from) - amount;
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.set_balance(*from, from_balance);
        self.set_balance(*to, to_balance);
        debug!(%from, %to, amount, "ledger transfer applied");
        Ok(())
    }

    /// Set the allowance of `spender` over `owner`'s funds (not additive).
    pub fn approve(&mut self, owner: Address, spender: Address, amount: u128) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }
        self.transfer(from, to, amount)?;
        self.approve(*from, *spender, allowed - amount);
        Ok(())
    }

    /// Recompute the sum of balances and compare it with the total supply.
    pub fn check_supply_invariant(&self) -> Result<(), LedgerError> {
        let actual = self
            .balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            .ok_or(LedgerError::Overflow)?;
        if actual != self.total_supply {
            return Err(LedgerError::SupplyMismatch {
                expected: self.total_supply,
                actual,
            });
        }
        Ok(())
    }

    fn set_balance(&mut self, address: Address, balance: u128) {
        if balance == 0 {
            self.balances.remove(&address);
        } else {
            self.balances.insert(address, balance);
        }
    }
}
