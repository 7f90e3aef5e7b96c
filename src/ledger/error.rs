// Ledger errors - reasons a call is rejected and rolled back

use crate::host::TransferError;
use crate::identity::Address;
use crate::ledger::amount::Amount;
use crate::storage::StoreError;
use thiserror::Error;

/// Reasons a ledger call is rejected.
///
/// Any of these aborts the call and reverts everything it did.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Account already exists for {0}")]
    AccountAlreadyExists(Address),

    #[error("Deposit amount must be greater than 0")]
    ZeroAmount,

    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: Amount, requested: Amount },

    #[error("No account for {0}")]
    AccountNotFound(Address),

    #[error("Balance would overflow")]
    BalanceOverflow,

    #[error("Value transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("Reentrant call rejected for {0}")]
    Reentrancy(Address),

    #[error("Call depth limit of {limit} exceeded")]
    CallDepthExceeded { limit: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}
