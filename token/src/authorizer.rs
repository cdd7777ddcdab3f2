//! Transfer authorization: release gate, then vesting lock, then balance.

use tracing::debug;
use vestgate_ledger::Ledger;
use vestgate_release::ReleaseGate;
use vestgate_types::{Address, Timestamp};
use vestgate_vesting::VestingSchedule;

use crate::error::TokenError;

/// A requested balance movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    /// Set for delegated transfers; the allowance of `from` to this spender is checked.
    pub spender: Option<Address>,
    pub from: Address,
    pub to: Address,
    pub amount: u128,
}

impl TransferRequest {
    pub fn direct(from: Address, to: Address, amount: u128) -> Self {
        Self {
            spender: None,
            from,
            to,
            amount,
        }
    }

    pub fn delegated(spender: Address, from: Address, to: Address, amount: u128) -> Self {
        Self {
            spender: Some(spender),
            from,
            to,
            amount,
        }
    }
}

/// Outcome of a successful authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Authorization {
    /// Raw units of the sender's balance held back by vesting.
    pub locked: u128,
    /// Raw units the sender could move in total at this instant.
    pub unlocked: u128,
    /// The gate was closed and the sender passed on the whitelist.
    pub via_whitelist: bool,
}

/// Read-only view over the three stores that decides whether a transfer may
/// proceed. It never mutates anything.
pub struct TransferAuthorizer<'a> {
    ledger: &'a Ledger,
    gate: &'a ReleaseGate,
    vesting: &'a VestingSchedule,
    /// Raw units per whole token; vesting plans are denominated in whole tokens.
    unit: u128,
}

impl<'a> TransferAuthorizer<'a> {
    pub fn new(
        ledger: &'a Ledger,
        gate: &'a ReleaseGate,
        vesting: &'a VestingSchedule,
        unit: u128,
    ) -> Self {
        Self {
            ledger,
            gate,
            vesting,
            unit,
        }
    }

    /// Decide whether `request` may be applied at `now`.
    ///
    /// Checks run in order: release gate, recipient, allowance, gross
    /// balance, vesting lock. The first failure is returned.
    pub fn authorize(
        &self,
        request: &TransferRequest,
        now: Timestamp,
    ) -> Result<Authorization, TokenError> {
        let TransferRequest {
            spender,
            from,
            to,
            amount,
        } = *request;

        let via_whitelist = !self.gate.transfers_enabled();
        if via_whitelist && !self.gate.is_transfer_permitted_pre_release(&from) {
            return Err(TokenError::TransfersDisabled(from));
        }
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        if let Some(spender) = spender {
            let available = self.ledger.allowance(&from, &spender);
            if available < amount {
                return Err(TokenError::InsufficientAllowance {
                    needed: amount,
                    available,
                });
            }
        }

        let balance = self.ledger.balance_of(&from);
        if balance < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available: balance,
            });
        }
        let locked = self.locked_raw(&from, now);
        let unlocked = balance.saturating_sub(locked);
        if unlocked < amount {
            debug!(%from, amount, locked, balance, "transfer blocked by vesting lock");
            return Err(TokenError::InsufficientUnlockedBalance {
                needed: amount,
                unlocked,
                balance,
            });
        }
        Ok(Authorization {
            locked,
            unlocked,
            via_whitelist,
        })
    }

    /// Raw units of `holder`'s balance locked by vesting at `now`.
    ///
    /// Saturates rather than overflowing: an absurdly large plan locks everything.
    pub fn locked_raw(&self, holder: &Address, now: Timestamp) -> u128 {
        let state = self
            .vesting
            .currently_locked(holder, now, self.gate.incubation_time());
        state.locked.saturating_mul(self.unit)
    }
}
