use thiserror::Error;
use vestgate_types::Address;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReleaseError {
    #[error("{0} cannot confirm: transfers are already released")]
    ReleaseClosed(Address),

    #[error("{0} is not a release confirmer")]
    NotConfirmer(Address),

    #[error("{0} has already confirmed the release")]
    AlreadyConfirmed(Address),

    #[error("release quorum must be at least {min}, got {got}")]
    InvalidQuorum { min: usize, got: usize },
}
