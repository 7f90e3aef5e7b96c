// Per-call context supplied by the host runtime

use crate::identity::Address;
use crate::ledger::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the host knows about the call being dispatched.
///
/// `caller` is already authenticated by the host. `value` is the native
/// currency attached to the call; it only matters for `deposit`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    caller: Address,
    value: Amount,
    timestamp: DateTime<Utc>,
}

impl CallContext {
    /// Context for a call with no attached value, stamped now
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: Amount::ZERO,
            timestamp: Utc::now(),
        }
    }

    /// Attach value to the call
    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }

    /// Override the call timestamp
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn caller(&self) -> Address {
        self.caller
    }

    pub fn value(&self) -> Amount {
        self.value
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
