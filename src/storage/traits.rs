// AccountStore - the key-value seam between the ledger and the host's storage

use crate::identity::Address;
use crate::ledger::{Account, AccountCodecError};
use thiserror::Error;

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

impl From<AccountCodecError> for StoreError {
    fn from(err: AccountCodecError) -> Self {
        match err {
            AccountCodecError::Encode(msg) => StoreError::SerializationFailed(msg),
            AccountCodecError::Decode(msg) => StoreError::DeserializationFailed(msg),
        }
    }
}

/// Durable identity -> account mapping.
///
/// The ledger only ever reads through `get`/`contains` and writes through
/// `commit`, which receives the full write set of one successful top-level
/// call. Implementations that can apply that set atomically should override
/// `commit`.
pub trait AccountStore {
    /// Look up the account owned by `owner`
    fn get(&self, owner: &Address) -> Result<Option<Account>, StoreError>;

    /// Insert or replace an account
    fn put(&mut self, account: Account) -> Result<(), StoreError>;

    /// Check whether `owner` has an account
    fn contains(&self, owner: &Address) -> Result<bool, StoreError> {
        Ok(self.get(owner)?.is_some())
    }

    /// All stored accounts, in no particular order
    fn accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Apply the write set of a committed call
    fn commit(&mut self, accounts: Vec<Account>) -> Result<(), StoreError> {
        for account in accounts {
            self.put(account)?;
        }
        Ok(())
    }
}
