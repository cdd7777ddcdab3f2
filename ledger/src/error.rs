use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("recipient must not be the null address")]
    InvalidRecipient,

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("balances sum to {actual} but total supply is {expected}")]
    SupplyMismatch { expected: u128, actual: u128 },

    #[error("snapshot integrity check failed")]
    CorruptSnapshot,

    #[error("snapshot encoding error: {0}")]
    Encoding(String),
}
