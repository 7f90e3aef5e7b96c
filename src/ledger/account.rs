// Account record held by the ledger

use crate::identity::Address;
use crate::ledger::amount::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountCodecError {
    #[error("Account decoding failed: {0}")]
    Decode(String),

    #[error("Account encoding failed: {0}")]
    Encode(String),
}

/// A single custodial account.
///
/// Presence in the store is what makes an account exist; there is no
/// separate flag, so a zero balance never means "missing".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    owner: Address,
    balance: Amount,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Open a fresh account with zero balance
    pub fn open(owner: Address, created_at: DateTime<Utc>) -> Self {
        Self {
            owner,
            balance: Amount::ZERO,
            created_at,
        }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Increase the balance, returning `None` on 256-bit overflow
    pub(crate) fn credit(&mut self, amount: Amount) -> Option<Amount> {
        self.balance = self.balance.checked_add(amount)?;
        Some(self.balance)
    }

    /// Decrease the balance, returning `None` if it would go negative
    pub(crate) fn debit(&mut self, amount: Amount) -> Option<Amount> {
        self.balance = self.balance.checked_sub(amount)?;
        Some(self.balance)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, AccountCodecError> {
        postcard::to_allocvec(self).map_err(|e| AccountCodecError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AccountCodecError> {
        postcard::from_bytes(bytes).map_err(|e| AccountCodecError::Decode(e.to_string()))
    }
}
