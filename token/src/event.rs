//! Append-only journal of state changes.

use serde::{Deserialize, Serialize};
use vestgate_types::{Address, Timestamp};
use vestgate_vesting::PlanClass;

/// A state change recorded by the token, in the order it was applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TokenEvent {
    /// Balance movement. Genesis seeding is a transfer from the null address.
    Transfer {
        from: Address,
        to: Address,
        amount: u128,
    },
    Approval {
        owner: Address,
        spender: Address,
        amount: u128,
    },
    ConfirmerUpdated {
        target: Address,
        weight: u32,
    },
    ReleaseConfirmed {
        confirmer: Address,
        confirmations: usize,
    },
    TransfersReleased {
        incubation_time: Timestamp,
    },
    WhitelistUpdated {
        target: Address,
        enabled: bool,
    },
    VestingPlanSet {
        target: Address,
        total_locked: u128,
        class: PlanClass,
    },
    VestingPlanRefreshed {
        target: Address,
        locked_remaining: u128,
        stage: u8,
    },
}
