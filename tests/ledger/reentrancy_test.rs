// Reentrancy tests - recipients calling back into the ledger mid-transfer

use bankledger::config::{LedgerConfig, ReentrancyPolicy, DEFAULT_MAX_CALL_DEPTH};
use bankledger::host::{CallContext, TransferError, ValueSink};
use bankledger::identity::Address;
use bankledger::ledger::{Amount, Ledger, LedgerError, LedgerEvent};
use bankledger::storage::MemoryStore;

fn ether(s: &str) -> Amount {
    Amount::parse_ether(s).unwrap()
}

/// Recipient that tries to withdraw again every time it is paid
struct ReentrantRecipient {
    ctx: CallContext,
    nested_amount: Amount,
    max_reentries: usize,
    reentries: usize,
    propagate_nested_errors: bool,
    fail_after_nested: bool,
    received: Amount,
    balance_seen: Vec<Amount>,
    nested_errors: Vec<String>,
}

impl ReentrantRecipient {
    fn new(ctx: CallContext, nested_amount: Amount) -> Self {
        Self {
            ctx,
            nested_amount,
            max_reentries: 1,
            reentries: 0,
            propagate_nested_errors: false,
            fail_after_nested: false,
            received: Amount::ZERO,
            balance_seen: Vec::new(),
            nested_errors: Vec::new(),
        }
    }
}

impl ValueSink<MemoryStore> for ReentrantRecipient {
    fn send(
        &mut self,
        ledger: &mut Ledger<MemoryStore>,
        _to: Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.received = self.received.checked_add(amount).unwrap();
        self.balance_seen.push(ledger.balance(&self.ctx).unwrap());

        if self.reentries < self.max_reentries {
            self.reentries += 1;
            let ctx = self.ctx.clone();
            let nested = self.nested_amount;

            if let Err(e) = ledger.withdraw(&ctx, nested, self) {
                self.nested_errors.push(e.to_string());
                if self.propagate_nested_errors {
                    return Err(TransferError::NestedCall(e.to_string()));
                }
            }
        }

        if self.fail_after_nested {
            return Err(TransferError::Rejected("fallback reverted".to_string()));
        }
        Ok(())
    }
}

fn funded(config: LedgerConfig, amount: Amount) -> (Ledger<MemoryStore>, CallContext) {
    let mut ledger = Ledger::with_config(MemoryStore::new(), config);
    let ctx = CallContext::new(Address::random());
    ledger.create_account(&ctx).unwrap();
    ledger.deposit(&ctx.clone().with_value(amount)).unwrap();
    (ledger, ctx)
}

// ============================================================================
// CHECKS-EFFECTS-INTERACTIONS
// ============================================================================

#[test]
fn test_recipient_sees_debited_balance() {
    let (mut ledger, ctx) = funded(LedgerConfig::default(), ether("1"));
    let mut recipient = ReentrantRecipient::new(ctx.clone(), ether("0.6"));
    recipient.max_reentries = 0;

    ledger.withdraw(&ctx, ether("0.6"), &mut recipient).unwrap();

    assert_eq!(recipient.balance_seen, vec![ether("0.4")]);
}

#[test]
fn test_reentrant_double_withdraw_rejected() {
    let (mut ledger, ctx) = funded(LedgerConfig::default(), ether("1"));
    let mut recipient = ReentrantRecipient::new(ctx.clone(), ether("0.6"));

    ledger.withdraw(&ctx, ether("0.6"), &mut recipient).unwrap();

    assert_eq!(recipient.nested_errors.len(), 1);
    assert!(recipient.nested_errors[0].contains("Insufficient balance"));
    assert_eq!(recipient.received, ether("0.6"));
    assert_eq!(ledger.balance(&ctx).unwrap(), ether("0.4"));
}

#[test]
fn test_reentrant_withdraw_within_balance_allowed() {
    let (mut ledger, ctx) = funded(LedgerConfig::default(), ether("1"));
    let mut recipient = ReentrantRecipient::new(ctx.clone(), ether("0.3"));

    let receipt = ledger.withdraw(&ctx, ether("0.6"), &mut recipient).unwrap();

    assert_eq!(recipient.received, ether("0.9"));
    assert_eq!(ledger.balance(&ctx).unwrap(), ether("0.1"));
    assert_eq!(*receipt.output(), ether("0.1"));
    assert_eq!(
        receipt.events(),
        &[
            LedgerEvent::Withdrawal { owner: ctx.caller(), amount: ether("0.6") },
            LedgerEvent::Withdrawal { owner: ctx.caller(), amount: ether("0.3") },
        ]
    );
}

#[test]
fn test_repeated_reentry_never_overdraws() {
    let (mut ledger, ctx) = funded(LedgerConfig::default(), Amount::from_u64(100));
    let mut recipient = ReentrantRecipient::new(ctx.clone(), Amount::from_u64(30));
    recipient.max_reentries = 10;

    ledger
        .withdraw(&ctx, Amount::from_u64(30), &mut recipient)
        .unwrap();

    assert_eq!(recipient.received, Amount::from_u64(90));
    assert_eq!(ledger.balance(&ctx).unwrap(), Amount::from_u64(10));
    assert!(!recipient.nested_errors.is_empty());
}

// ============================================================================
// ATOMICITY ACROSS NESTED CALLS
// ============================================================================

#[test]
fn test_outer_failure_reverts_nested_withdrawal() {
    let (mut ledger, ctx) = funded(LedgerConfig::default(), ether("1"));
    let events_before = ledger.events().len();
    let mut recipient = ReentrantRecipient::new(ctx.clone(), ether("0.3"));
    recipient.fail_after_nested = true;

    let result = ledger.withdraw(&ctx, ether("0.6"), &mut recipient);

    assert!(matches!(result, Err(LedgerError::TransferFailed(_))));
    assert_eq!(ledger.balance(&ctx).unwrap(), ether("1"));
    assert_eq!(ledger.events().len(), events_before);
}

#[test]
fn test_propagated_nested_error_reverts_outer() {
    let (mut ledger, ctx) = funded(LedgerConfig::default(), ether("1"));
    let mut recipient = ReentrantRecipient::new(ctx.clone(), ether("0.6"));
    recipient.propagate_nested_errors = true;

    let result = ledger.withdraw(&ctx, ether("0.6"), &mut recipient);

    assert!(matches!(
        result,
        Err(LedgerError::TransferFailed(TransferError::NestedCall(_)))
    ));
    assert_eq!(ledger.balance(&ctx).unwrap(), ether("1"));
}

// ============================================================================
// POLICIES AND LIMITS
// ============================================================================

#[test]
fn test_locked_policy_rejects_reentry() {
    let config = LedgerConfig::new().with_reentrancy(ReentrancyPolicy::Locked);
    let (mut ledger, ctx) = funded(config, ether("1"));
    let mut recipient = ReentrantRecipient::new(ctx.clone(), ether("0.1"));

    ledger.withdraw(&ctx, ether("0.5"), &mut recipient).unwrap();

    assert_eq!(recipient.nested_errors.len(), 1);
    assert!(recipient.nested_errors[0].contains("Reentrant call rejected"));
    assert_eq!(ledger.balance(&ctx).unwrap(), ether("0.5"));
}

#[test]
fn test_locked_policy_releases_after_call() {
    let config = LedgerConfig::new().with_reentrancy(ReentrancyPolicy::Locked);
    let (mut ledger, ctx) = funded(config, ether("1"));
    let mut recipient = ReentrantRecipient::new(ctx.clone(), ether("0.1"));
    recipient.max_reentries = 0;

    ledger.withdraw(&ctx, ether("0.5"), &mut recipient).unwrap();
    ledger.withdraw(&ctx, ether("0.5"), &mut recipient).unwrap();

    assert_eq!(ledger.balance(&ctx).unwrap(), Amount::ZERO);
}

#[test]
fn test_call_depth_limit() {
    let config = LedgerConfig::new().with_max_call_depth(1);
    let (mut ledger, ctx) = funded(config, ether("1"));
    let mut recipient = ReentrantRecipient::new(ctx.clone(), ether("0.1"));

    ledger.withdraw(&ctx, ether("0.5"), &mut recipient).unwrap();

    assert_eq!(recipient.nested_errors.len(), 1);
    assert!(recipient.nested_errors[0].contains("Call depth limit of 1 exceeded"));
    assert_eq!(ledger.balance(&ctx).unwrap(), ether("0.5"));
}

#[test]
fn test_default_depth_limit_stops_deep_reentry() {
    let (mut ledger, ctx) = funded(LedgerConfig::default(), Amount::from_u64(5000));
    let mut recipient = ReentrantRecipient::new(ctx.clone(), Amount::from_u64(1));
    recipient.max_reentries = 100;

    ledger.withdraw(&ctx, Amount::from_u64(1), &mut recipient).unwrap();

    let completed = DEFAULT_MAX_CALL_DEPTH as u64;
    assert_eq!(recipient.reentries, DEFAULT_MAX_CALL_DEPTH);
    assert_eq!(recipient.nested_errors.len(), 1);
    assert_eq!(
        recipient.nested_errors[0],
        LedgerError::CallDepthExceeded { limit: DEFAULT_MAX_CALL_DEPTH }.to_string()
    );
    assert_eq!(recipient.received, Amount::from_u64(completed));
    assert_eq!(ledger.balance(&ctx).unwrap(), Amount::from_u64(5000 - completed));
}
