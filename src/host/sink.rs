// Outbound value transfer - how withdrawn value leaves the ledger

use crate::identity::Address;
use crate::ledger::{Amount, Ledger};
use crate::storage::AccountStore;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Transfer rejected by recipient: {0}")]
    Rejected(String),

    #[error("Nested ledger call failed: {0}")]
    NestedCall(String),
}

// ============================================================================
// VALUE SINK TRAIT
// ============================================================================

/// The host's value-transfer mechanism.
///
/// `send` is handed the ledger itself because the recipient may run
/// arbitrary code, including calls back into the ledger. By the time `send`
/// runs, the withdrawn amount has already been debited. Returning an error
/// reverts the whole withdrawal.
pub trait ValueSink<S: AccountStore> {
    fn send(&mut self, ledger: &mut Ledger<S>, to: Address, amount: Amount) -> Result<(), TransferError>;
}

// ============================================================================
// MOCK VALUE SINK
// ============================================================================

/// A single recorded outbound transfer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payout {
    pub to: Address,
    pub amount: Amount,
}

/// Mock implementation of ValueSink for testing
///
/// Records every payout it accepts. Defaults to success.
#[derive(Debug, Default)]
pub struct MockValueSink {
    failure_message: Option<String>,
    failures_before_success: usize,
    call_count: usize,
    payouts: Vec<Payout>,
}

impl MockValueSink {
    /// Create a new mock sink (defaults to success)
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure to always fail with a message
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure_message = Some(message.to_string());
        self.failures_before_success = usize::MAX;
        self
    }

    /// Fail N times, then succeed
    pub fn with_failures_then_success(mut self, failures: usize) -> Self {
        self.failures_before_success = failures;
        self
    }

    /// Number of times `send` was invoked
    pub fn call_count(&self) -> usize {
        self.call_count
    }

    /// Payouts accepted so far
    pub fn payouts(&self) -> &[Payout] {
        &self.payouts
    }

    /// Sum of all accepted payouts
    pub fn total_paid(&self) -> Amount {
        self.payouts
            .iter()
            .fold(Amount::ZERO, |acc, p| acc.checked_add(p.amount).unwrap_or(Amount::MAX))
    }
}

impl<S: AccountStore> ValueSink<S> for MockValueSink {
    fn send(&mut self, _ledger: &mut Ledger<S>, to: Address, amount: Amount) -> Result<(), TransferError> {
        let call_num = self.call_count;
        self.call_count += 1;

        if call_num < self.failures_before_success {
            return Err(TransferError::Rejected(
                self.failure_message
                    .clone()
                    .unwrap_or_else(|| "Mock failure".to_string()),
            ));
        }

        self.payouts.push(Payout { to, amount });
        Ok(())
    }
}
