//! The gated, vesting-aware token.
//!
//! [`Token`] owns the ledger, the release gate and the vesting schedule, and
//! routes every balance movement through the [`TransferAuthorizer`]:
//!
//! 1. while the gate is closed only whitelisted senders may transfer;
//! 2. once it is open a sender may move only the part of its balance not
//!    held back by its vesting plan;
//! 3. only then is the ledger mutated, against the same sampled instant.

pub mod authorizer;
pub mod config;
pub mod error;
pub mod event;
pub mod token;

pub use authorizer::{Authorization, TransferAuthorizer, TransferRequest};
pub use config::TokenConfig;
pub use error::{ErrorKind, TokenError};
pub use event::TokenEvent;
pub use token::{HolderSummary, Token, TokenSummary};
