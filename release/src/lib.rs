//! The release gate.
//!
//! Transfers start out globally frozen. The gate opens only after a quorum of
//! designated confirmers have each called [`ReleaseGate::confirm_release`];
//! the moment it opens is recorded as the *incubation time*, the anchor every
//! vesting schedule is measured from. Opening is one-way.
//!
//! Until then, addresses on the pre-release whitelist may still move tokens.

pub mod error;
pub mod gate;

pub use error::ReleaseError;
pub use gate::{ReleaseGate, ReleaseOutcome, DEFAULT_QUORUM};
