//! Fundamental types for the vestgate ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, raw token amounts, timestamps and the clock abstraction
//! every time-dependent operation reads from.

pub mod address;
pub mod amount;
pub mod clock;
pub mod error;
pub mod time;

pub use address::Address;
pub use amount::TokenAmount;
pub use clock::{Clock, SystemClock};
pub use error::TypesError;
pub use time::Timestamp;
