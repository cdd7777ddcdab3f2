//! Genesis seeding: the whole issued supply is credited to the owner at creation.

use vestgate_types::{Address, TokenAmount};

use crate::error::LedgerError;

/// Configuration for seeding a fresh ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisConfig {
    /// The account receiving the entire supply.
    pub owner: Address,
    /// Issued supply in whole tokens.
    pub total_supply_whole: u64,
    /// Fractional digits of the token.
    pub decimals: u8,
}

impl GenesisConfig {
    pub fn new(owner: Address, total_supply_whole: u64, decimals: u8) -> Self {
        Self {
            owner,
            total_supply_whole,
            decimals,
        }
    }

    /// The issued supply in raw units.
    pub fn raw_supply(&self) -> Result<u128, LedgerError> {
        TokenAmount::from_whole(self.total_supply_whole as u128, self.decimals)
            .map(|a| a.raw())
            .ok_or(LedgerError::Overflow)
    }
}
