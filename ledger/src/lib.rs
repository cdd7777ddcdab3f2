//! Balance and allowance bookkeeping.
//!
//! The ledger holds no policy: it checks only that balances and allowances
//! cover the requested amount and that the recipient is not the null address.
//! Whether a transfer is *permitted* is decided upstream, before the ledger
//! is ever touched.

pub mod error;
pub mod genesis;
pub mod ledger;
pub mod snapshot;

pub use error::LedgerError;
pub use genesis::GenesisConfig;
pub use ledger::{Ledger, LedgerSummary};
pub use snapshot::{AllowanceSnapshot, BalanceSnapshot, LedgerSnapshot, SNAPSHOT_VERSION};
