use thiserror::Error;
use vestgate_types::Address;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VestingError {
    #[error("vesting plans cannot be changed after transfers are released")]
    AlreadyReleased,

    #[error("vesting plans cannot be refreshed before transfers are released")]
    NotYetReleased,

    #[error("{0} has no vesting plan")]
    NoPlan(Address),
}
