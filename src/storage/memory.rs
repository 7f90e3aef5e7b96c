// In-memory AccountStore for tests and simulations

use crate::identity::Address;
use crate::ledger::Account;
use crate::storage::traits::{AccountStore, StoreError};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    accounts: HashMap<Address, Account>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for MemoryStore {
    fn get(&self, owner: &Address) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(owner).cloned())
    }

    fn put(&mut self, account: Account) -> Result<(), StoreError> {
        self.accounts.insert(*account.owner(), account);
        Ok(())
    }

    fn contains(&self, owner: &Address) -> Result<bool, StoreError> {
        Ok(self.accounts.contains_key(owner))
    }

    fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.values().cloned().collect())
    }
}
