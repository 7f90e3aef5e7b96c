//! Custodial single-account ledger.
//!
//! Each caller identity may open one account, deposit the value attached to
//! a call, withdraw to itself through the host's transfer mechanism, and read
//! its balance. The host runtime supplies identity, attached value and
//! storage; this crate holds the rules.

pub mod config;
pub mod host;
pub mod identity;
pub mod ledger;
pub mod storage;

pub use config::{LedgerConfig, ReentrancyPolicy};
pub use host::{CallContext, MockValueSink, TransferError, ValueSink};
pub use identity::Address;
pub use ledger::{Amount, Ledger, LedgerError, LedgerEvent, Receipt};
pub use storage::{AccountStore, MemoryStore, SledStore, StoreError};
