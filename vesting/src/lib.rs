//! Vesting plans.
//!
//! A plan locks part of a holder's balance and unlocks it in steps ("cliffs")
//! measured in whole days since the release gate opened. The locked amount is
//! always re-derived from elapsed time; nothing accumulates between calls, so
//! the result only depends on `(plan, now, incubation_time)`.
//!
//! Plan amounts are whole tokens. Callers scale them by the token's decimals
//! before comparing them with raw balances.

pub mod error;
pub mod plan;
pub mod schedule;

pub use error::VestingError;
pub use plan::{LockState, PlanClass, VestingPlan, EXTERNAL_CLIFF_DAYS, TEAM_CLIFF_DAYS};
pub use schedule::{PlanStatus, VestingSchedule};
