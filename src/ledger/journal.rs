// Journal - checkpoint frames giving each call all-or-nothing semantics
//
// Every call pushes a frame. Writes and events land in the top frame.
// On success the frame folds into its parent; the outermost frame is handed
// back for committing to the store. On failure the frame is dropped,
// together with everything nested calls folded into it.

use crate::identity::Address;
use crate::ledger::account::Account;
use crate::ledger::event::LedgerEvent;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Frame {
    writes: HashMap<Address, Account>,
    events: Vec<LedgerEvent>,
}

/// Outcome of settling the top frame
#[derive(Debug)]
pub(crate) enum Settled {
    /// Folded into an enclosing call; carries the frame's events
    Nested(Vec<LedgerEvent>),
    /// Outermost call finished; its write set must be committed
    Root {
        writes: Vec<Account>,
        events: Vec<LedgerEvent>,
    },
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    frames: Vec<Frame>,
}

impl Journal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of open frames (calls in progress)
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Latest uncommitted version of an account, newest frame first
    pub(crate) fn lookup(&self, owner: &Address) -> Option<&Account> {
        self.frames.iter().rev().find_map(|f| f.writes.get(owner))
    }

    /// All uncommitted accounts, newest version of each
    pub(crate) fn pending(&self) -> HashMap<Address, Account> {
        let mut merged = HashMap::new();
        for frame in &self.frames {
            for (owner, account) in &frame.writes {
                merged.insert(*owner, account.clone());
            }
        }
        merged
    }

    pub(crate) fn write(&mut self, account: Account) {
        if let Some(frame) = self.frames.last_mut() {
            frame.writes.insert(*account.owner(), account);
        }
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        if let Some(frame) = self.frames.last_mut() {
            frame.events.push(event);
        }
    }

    /// Drop the top frame and everything written into it
    pub(crate) fn discard(&mut self) {
        self.frames.pop();
    }

    /// Pop the top frame, folding it into its parent when there is one
    pub(crate) fn settle(&mut self) -> Settled {
        let frame = self.frames.pop().unwrap_or_default();

        match self.frames.last_mut() {
            Some(parent) => {
                parent.writes.extend(frame.writes);
                parent.events.extend(frame.events.iter().cloned());
                Settled::Nested(frame.events)
            }
            None => Settled::Root {
                writes: frame.writes.into_values().collect(),
                events: frame.events,
            },
        }
    }
}
