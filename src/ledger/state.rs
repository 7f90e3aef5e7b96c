// Ledger - account registry and the rules guarding every balance change

use crate::config::{LedgerConfig, ReentrancyPolicy};
use crate::host::{CallContext, ValueSink};
use crate::identity::Address;
use crate::ledger::account::Account;
use crate::ledger::amount::Amount;
use crate::ledger::error::LedgerError;
use crate::ledger::event::{EventLog, EventRecord, LedgerEvent};
use crate::ledger::journal::{Journal, Settled};
use crate::storage::{AccountStore, SledStore, StoreError};
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, info, warn};

/// Result of a successful call: its output plus the events it emitted,
/// including those of calls nested inside it, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt<T> {
    output: T,
    events: Vec<LedgerEvent>,
}

impl<T> Receipt<T> {
    pub fn output(&self) -> &T {
        &self.output
    }

    pub fn into_output(self) -> T {
        self.output
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }
}

/// Statistics about the ledger
#[derive(Clone, Debug)]
pub struct LedgerStatistics {
    pub accounts: usize,
    pub total_held: Amount,
    pub events_committed: u64,
}

/// The custodial ledger.
///
/// Each identity owns at most one account. Accounts are created by their
/// owner, never deleted, and only their owner moves value in or out.
pub struct Ledger<S: AccountStore> {
    store: S,
    config: LedgerConfig,
    journal: Journal,
    log: EventLog,
    /// Owners with a withdrawal currently handing value to the host
    in_flight: HashSet<Address>,
}

impl Ledger<SledStore> {
    /// Open a sled-backed ledger, using the configuration stored with it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let store = SledStore::open(path)?;
        let config = store.get_or_init_config()?;
        Ok(Self::with_config(store, config))
    }
}

impl<S: AccountStore> Ledger<S> {
    /// Create a ledger over `store` with default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        let log = EventLog::with_capacity(config.event_log_capacity);
        Self {
            store,
            config,
            journal: Journal::new(),
            log,
            in_flight: HashSet::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Register an account for the caller with zero balance
    pub fn create_account(&mut self, ctx: &CallContext) -> Result<Receipt<()>, LedgerError> {
        self.run("create_account", ctx, |ledger| {
            let owner = ctx.caller();
            if ledger.exists(&owner)? {
                return Err(LedgerError::AccountAlreadyExists(owner));
            }

            ledger.journal.write(Account::open(owner, ctx.timestamp()));
            ledger.journal.emit(LedgerEvent::AccountCreated { owner });
            Ok(())
        })
    }

    /// Credit the value attached to the call to the caller's account.
    ///
    /// Returns the new balance.
    pub fn deposit(&mut self, ctx: &CallContext) -> Result<Receipt<Amount>, LedgerError> {
        self.run("deposit", ctx, |ledger| {
            let owner = ctx.caller();
            let amount = ctx.value();
            if amount.is_zero() {
                return Err(LedgerError::ZeroAmount);
            }

            let mut account = ledger
                .load(&owner)?
                .ok_or(LedgerError::AccountNotFound(owner))?;
            let balance = account.credit(amount).ok_or(LedgerError::BalanceOverflow)?;

            debug!(owner = %owner, amount = %amount, balance = %balance, "deposit accepted");
            ledger.journal.write(account);
            ledger.journal.emit(LedgerEvent::Deposit { owner, amount });
            Ok(balance)
        })
    }

    /// Debit `amount` from the caller's account and pay it out through `sink`.
    ///
    /// The debit is recorded before `sink` runs, so anything the recipient
    /// does from inside `send` sees the reduced balance. A failed transfer
    /// reverts the debit. Returns the caller's balance once the call,
    /// including any nested calls, has finished.
    pub fn withdraw<V>(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        sink: &mut V,
    ) -> Result<Receipt<Amount>, LedgerError>
    where
        V: ValueSink<S> + ?Sized,
    {
        self.run("withdraw", ctx, |ledger| {
            let owner = ctx.caller();
            let mut account = ledger
                .load(&owner)?
                .ok_or(LedgerError::AccountNotFound(owner))?;

            let available = account.balance();
            let remaining = account.debit(amount).ok_or(LedgerError::InsufficientBalance {
                available,
                requested: amount,
            })?;

            debug!(owner = %owner, amount = %amount, remaining = %remaining, "withdrawal debited");
            ledger.journal.write(account);
            ledger.journal.emit(LedgerEvent::Withdrawal { owner, amount });

            if !amount.is_zero() {
                let outermost = ledger.in_flight.insert(owner);
                let sent = panic::catch_unwind(AssertUnwindSafe(|| sink.send(ledger, owner, amount)));
                if outermost {
                    ledger.in_flight.remove(&owner);
                }
                sent.unwrap_or_else(|payload| panic::resume_unwind(payload))?;
            }

            ledger.balance_of(&owner)
        })
    }

    /// The caller's balance; zero if the caller has no account
    pub fn balance(&self, ctx: &CallContext) -> Result<Amount, LedgerError> {
        self.balance_of(&ctx.caller())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Balance of any owner; zero if there is no account
    pub fn balance_of(&self, owner: &Address) -> Result<Amount, LedgerError> {
        Ok(self
            .load(owner)?
            .map(|a| a.balance())
            .unwrap_or(Amount::ZERO))
    }

    /// Check if `owner` has an account
    pub fn has_account(&self, owner: &Address) -> Result<bool, LedgerError> {
        self.exists(owner)
    }

    /// Get the account owned by `owner`
    pub fn account(&self, owner: &Address) -> Result<Option<Account>, LedgerError> {
        self.load(owner)
    }

    /// Sum of all balances, i.e. the value the ledger holds in custody
    pub fn total_held(&self) -> Result<Amount, LedgerError> {
        sum_balances(&self.visible_accounts()?)
    }

    /// Get statistics about the ledger
    pub fn statistics(&self) -> Result<LedgerStatistics, LedgerError> {
        let accounts = self.visible_accounts()?;
        Ok(LedgerStatistics {
            accounts: accounts.len(),
            total_held: sum_balances(&accounts)?,
            events_committed: self.log.next_seq(),
        })
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    /// Committed events still retained
    pub fn events(&self) -> &EventLog {
        &self.log
    }

    /// Take all retained committed events
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.log.drain()
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn load(&self, owner: &Address) -> Result<Option<Account>, LedgerError> {
        if let Some(account) = self.journal.lookup(owner) {
            return Ok(Some(account.clone()));
        }
        Ok(self.store.get(owner)?)
    }

    /// Committed accounts overlaid with writes of calls still in progress
    fn visible_accounts(&self) -> Result<HashMap<Address, Account>, LedgerError> {
        let mut accounts: HashMap<Address, Account> = self
            .store
            .accounts()?
            .into_iter()
            .map(|a| (*a.owner(), a))
            .collect();
        accounts.extend(self.journal.pending());
        Ok(accounts)
    }

    fn exists(&self, owner: &Address) -> Result<bool, LedgerError> {
        if self.journal.lookup(owner).is_some() {
            return Ok(true);
        }
        Ok(self.store.contains(owner)?)
    }

    /// Run `body` inside a fresh checkpoint frame.
    ///
    /// On success the frame folds into the enclosing call, or is committed
    /// to the store and the event log when this is the outermost call. On
    /// failure, or if `body` panics, the frame is discarded.
    fn run<T, F>(&mut self, op: &'static str, ctx: &CallContext, body: F) -> Result<Receipt<T>, LedgerError>
    where
        F: FnOnce(&mut Self) -> Result<T, LedgerError>,
    {
        let caller = ctx.caller();
        let depth = self.journal.depth();

        if depth >= self.config.max_call_depth {
            warn!(op, caller = %caller, depth, "call depth limit reached");
            return Err(LedgerError::CallDepthExceeded {
                limit: self.config.max_call_depth,
            });
        }

        if self.config.reentrancy == ReentrancyPolicy::Locked && self.in_flight.contains(&caller) {
            warn!(op, caller = %caller, depth, "reentrant call rejected");
            return Err(LedgerError::Reentrancy(caller));
        }

        self.journal.push();

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| body(self))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                self.journal.discard();
                warn!(op, caller = %caller, depth, "call panicked, frame dropped");
                panic::resume_unwind(payload);
            }
        };

        let output = match outcome {
            Ok(output) => output,
            Err(err) => {
                self.journal.discard();
                warn!(op, caller = %caller, depth, error = %err, "call reverted");
                return Err(err);
            }
        };

        match self.journal.settle() {
            Settled::Nested(events) => {
                debug!(op, caller = %caller, depth, events = events.len(), "nested call settled");
                Ok(Receipt { output, events })
            }
            Settled::Root { writes, events } => {
                if let Err(err) = self.store.commit(writes) {
                    warn!(op, caller = %caller, error = %err, "commit failed");
                    return Err(err.into());
                }
                self.log.append(events.iter().cloned());
                info!(op, caller = %caller, events = events.len(), "call committed");
                Ok(Receipt { output, events })
            }
        }
    }
}

fn sum_balances(accounts: &HashMap<Address, Account>) -> Result<Amount, LedgerError> {
    accounts.values().try_fold(Amount::ZERO, |acc, a| {
        acc.checked_add(a.balance()).ok_or(LedgerError::BalanceOverflow)
    })
}
