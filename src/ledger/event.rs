// Ledger events - immutable notifications emitted by successful calls

use crate::identity::Address;
use crate::ledger::amount::Amount;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Notification emitted by a successful ledger call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    AccountCreated { owner: Address },
    Deposit { owner: Address, amount: Amount },
    Withdrawal { owner: Address, amount: Amount },
}

impl LedgerEvent {
    /// The account the event refers to
    pub fn owner(&self) -> &Address {
        match self {
            LedgerEvent::AccountCreated { owner }
            | LedgerEvent::Deposit { owner, .. }
            | LedgerEvent::Withdrawal { owner, .. } => owner,
        }
    }

    /// Event name as exposed to watchers
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::AccountCreated { .. } => "AccountCreated",
            LedgerEvent::Deposit { .. } => "Deposit",
            LedgerEvent::Withdrawal { .. } => "Withdrawal",
        }
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerEvent::AccountCreated { owner } => write!(f, "AccountCreated({})", owner),
            LedgerEvent::Deposit { owner, amount } => write!(f, "Deposit({}, {})", owner, amount),
            LedgerEvent::Withdrawal { owner, amount } => {
                write!(f, "Withdrawal({}, {})", owner, amount)
            }
        }
    }
}

/// An event together with its position in the committed log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    seq: u64,
    event: LedgerEvent,
}

impl EventRecord {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn event(&self) -> &LedgerEvent {
        &self.event
    }
}

/// Ordered log of committed events.
///
/// Sequence numbers increase by one per event and are never reused, even
/// after records are drained or evicted.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    records: VecDeque<EventRecord>,
    next_seq: u64,
    /// Maximum records retained (0 = unbounded)
    capacity: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Append events in order, evicting the oldest when over capacity
    pub fn append<I: IntoIterator<Item = LedgerEvent>>(&mut self, events: I) {
        for event in events {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.records.push_back(EventRecord { seq, event });
        }

        if self.capacity > 0 {
            while self.records.len() > self.capacity {
                self.records.pop_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sequence number the next appended event will get
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Records with a sequence number at or after `seq`
    pub fn since(&self, seq: u64) -> Vec<&EventRecord> {
        self.records.iter().filter(|r| r.seq >= seq).collect()
    }

    /// Remove and return all retained records
    pub fn drain(&mut self) -> Vec<EventRecord> {
        self.records.drain(..).collect()
    }
}
