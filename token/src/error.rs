//! Token-level errors.
//!
//! Every rejection leaves the token untouched. Component errors are folded
//! into these kinds so callers can match on the cause regardless of which
//! component raised it.

use thiserror::Error;
use vestgate_ledger::LedgerError;
use vestgate_release::ReleaseError;
use vestgate_types::Address;
use vestgate_vesting::VestingError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("{caller} is not authorized to {action}")]
    Unauthorized {
        caller: Address,
        action: &'static str,
    },

    #[error("transfers are already released")]
    AlreadyReleased,

    #[error("transfers are not released yet")]
    NotYetReleased,

    #[error("transfers are frozen until release and {0} is not whitelisted")]
    TransfersDisabled(Address),

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("insufficient unlocked balance: need {needed}, unlocked {unlocked} of {balance}")]
    InsufficientUnlockedBalance {
        needed: u128,
        unlocked: u128,
        balance: u128,
    },

    #[error("recipient must not be the null address")]
    InvalidRecipient,

    #[error("{0} has no vesting plan")]
    NoVestingPlan(Address),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Fieldless discriminant of [`TokenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    AlreadyReleased,
    NotYetReleased,
    TransfersDisabled,
    InsufficientBalance,
    InsufficientAllowance,
    InsufficientUnlockedBalance,
    InvalidRecipient,
    NoVestingPlan,
    Overflow,
    InvalidConfig,
    Snapshot,
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::AlreadyReleased => ErrorKind::AlreadyReleased,
            Self::NotYetReleased => ErrorKind::NotYetReleased,
            Self::TransfersDisabled(_) => ErrorKind::TransfersDisabled,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::InsufficientAllowance { .. } => ErrorKind::InsufficientAllowance,
            Self::InsufficientUnlockedBalance { .. } => ErrorKind::InsufficientUnlockedBalance,
            Self::InvalidRecipient => ErrorKind::InvalidRecipient,
            Self::NoVestingPlan(_) => ErrorKind::NoVestingPlan,
            Self::Overflow => ErrorKind::Overflow,
            Self::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Self::Snapshot(_) => ErrorKind::Snapshot,
        }
    }
}

impl From<LedgerError> for TokenError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InvalidRecipient => Self::InvalidRecipient,
            LedgerError::InsufficientBalance { needed, available } => {
                Self::InsufficientBalance { needed, available }
            }
            LedgerError::InsufficientAllowance { needed, available } => {
                Self::InsufficientAllowance { needed, available }
            }
            LedgerError::Overflow => Self::Overflow,
            other @ (LedgerError::SupplyMismatch { .. }
            | LedgerError::CorruptSnapshot
            | LedgerError::Encoding(_)) => Self::Snapshot(other.to_string()),
        }
    }
}

impl From<ReleaseError> for TokenError {
    fn from(e: ReleaseError) -> Self {
        match e {
            ReleaseError::ReleaseClosed(caller) => Self::Unauthorized {
                caller,
                action: "confirm a release that already happened",
            },
            ReleaseError::NotConfirmer(caller) => Self::Unauthorized {
                caller,
                action: "confirm the release",
            },
            ReleaseError::AlreadyConfirmed(caller) => Self::Unauthorized {
                caller,
                action: "confirm the release twice",
            },
            other @ ReleaseError::InvalidQuorum { .. } => Self::InvalidConfig(other.to_string()),
        }
    }
}

impl From<VestingError> for TokenError {
    fn from(e: VestingError) -> Self {
        match e {
            VestingError::AlreadyReleased => Self::AlreadyReleased,
            VestingError::NotYetReleased => Self::NotYetReleased,
            VestingError::NoPlan(holder) => Self::NoVestingPlan(holder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_errors_keep_their_kind() {
        let a = Address::from_low_u64(4);
        assert_eq!(
            TokenError::from(ReleaseError::NotConfirmer(a)).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            TokenError::from(ReleaseError::AlreadyConfirmed(a)).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            TokenError::from(ReleaseError::ReleaseClosed(a)).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            TokenError::from(VestingError::AlreadyReleased).kind(),
            ErrorKind::AlreadyReleased
        );
        assert_eq!(
            TokenError::from(VestingError::NotYetReleased).kind(),
            ErrorKind::NotYetReleased
        );
        assert_eq!(
            TokenError::from(LedgerError::InsufficientAllowance {
                needed: 2,
                available: 1
            }),
            TokenError::InsufficientAllowance {
                needed: 2,
                available: 1
            }
        );
        assert_eq!(
            TokenError::from(LedgerError::CorruptSnapshot).kind(),
            ErrorKind::Snapshot
        );
    }

    #[test]
    fn messages_name_the_cause() {
        let err = TokenError::InsufficientUnlockedBalance {
            needed: 5,
            unlocked: 2,
            balance: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient unlocked balance: need 5, unlocked 2 of 10"
        );
    }
}
