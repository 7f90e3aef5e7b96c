// Ledger module - THE ACCOUNT BOOK
// Accounts, balances, events, and the state-transition rules guarding them

mod account;
mod amount;
mod error;
mod event;
mod journal;
mod state;

pub use account::{Account, AccountCodecError};
pub use amount::{Amount, AmountError, NATIVE_DECIMALS};
pub use error::LedgerError;
pub use event::{EventLog, EventRecord, LedgerEvent};
pub use state::{Ledger, LedgerStatistics, Receipt};
