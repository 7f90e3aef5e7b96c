// SledStore - Persistent account storage using sled
//
// Provides typed access for storing:
// - Account records, keyed by owner address
// - Ledger configuration

use crate::config::{ConfigError, LedgerConfig};
use crate::identity::Address;
use crate::ledger::Account;
use crate::storage::traits::{AccountStore, StoreError};
use std::path::Path;
use tracing::debug;

/// Key prefixes for organizing data
mod keys {
    pub const ACCOUNT_PREFIX: &[u8] = b"account:";
    pub const LEDGER_CONFIG: &[u8] = b"config:ledger";
}

fn account_key(owner: &Address) -> Vec<u8> {
    [keys::ACCOUNT_PREFIX, owner.as_bytes().as_slice()].concat()
}

/// Statistics about the storage
#[derive(Clone, Debug)]
pub struct StorageStats {
    /// Number of keys in the database
    pub key_count: usize,
    /// Number of stored accounts
    pub account_count: usize,
    /// Approximate disk size in bytes
    pub disk_size_bytes: u64,
}

/// Persistent account store
///
/// Uses sled for crash-safe, embedded storage. A committed call's write set
/// is applied as one sled batch, so it lands entirely or not at all.
pub struct SledStore {
    db: sled::Db,
    flush_on_commit: bool,
}

impl SledStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self {
            db,
            flush_on_commit: false,
        })
    }

    /// Flush to disk after every committed call
    pub fn with_flush_on_commit(mut self, flush: bool) -> Self {
        self.flush_on_commit = flush;
        self
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.db.is_empty())
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StoreError> {
        Ok(StorageStats {
            key_count: self.db.len(),
            account_count: self.db.scan_prefix(keys::ACCOUNT_PREFIX).count(),
            disk_size_bytes: self.db.size_on_disk().unwrap_or(0),
        })
    }

    // ========================================================================
    // CONFIGURATION
    // ========================================================================

    /// Save the ledger configuration
    pub fn save_config(&self, config: &LedgerConfig) -> Result<(), StoreError> {
        let bytes = config
            .to_bytes()
            .map_err(|e: ConfigError| StoreError::SerializationFailed(e.to_string()))?;
        self.db.insert(keys::LEDGER_CONFIG, bytes)?;
        Ok(())
    }

    /// Load the ledger configuration
    pub fn load_config(&self) -> Result<Option<LedgerConfig>, StoreError> {
        match self.db.get(keys::LEDGER_CONFIG)? {
            Some(bytes) => {
                let config = LedgerConfig::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    /// Load the stored configuration, saving the default if there is none
    pub fn get_or_init_config(&self) -> Result<LedgerConfig, StoreError> {
        if let Some(config) = self.load_config()? {
            return Ok(config);
        }

        let config = LedgerConfig::default();
        self.save_config(&config)?;
        Ok(config)
    }
}

impl AccountStore for SledStore {
    fn get(&self, owner: &Address) -> Result<Option<Account>, StoreError> {
        match self.db.get(account_key(owner))? {
            Some(bytes) => Ok(Some(Account::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&mut self, account: Account) -> Result<(), StoreError> {
        let bytes = account.to_bytes()?;
        self.db.insert(account_key(account.owner()), bytes)?;
        Ok(())
    }

    fn contains(&self, owner: &Address) -> Result<bool, StoreError> {
        Ok(self.db.contains_key(account_key(owner))?)
    }

    fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts = Vec::new();
        for result in self.db.scan_prefix(keys::ACCOUNT_PREFIX) {
            let (_, value) = result?;
            accounts.push(Account::from_bytes(&value)?);
        }
        Ok(accounts)
    }

    fn commit(&mut self, accounts: Vec<Account>) -> Result<(), StoreError> {
        let mut batch = sled::Batch::default();
        let count = accounts.len();
        for account in accounts {
            batch.insert(account_key(account.owner()), account.to_bytes()?);
        }
        self.db.apply_batch(batch)?;

        if self.flush_on_commit {
            self.flush()?;
        }

        debug!(accounts = count, "committed account batch");
        Ok(())
    }
}
