// Account creation tests for the ledger module

use bankledger::host::CallContext;
use bankledger::identity::Address;
use bankledger::ledger::{Amount, Ledger, LedgerError, LedgerEvent};
use bankledger::storage::MemoryStore;

// ============================================================================
// CREATION
// ============================================================================

#[test]
fn test_create_account_emits_account_created() {
    let mut ledger = Ledger::new(MemoryStore::new());
    let owner = Address::random();

    let receipt = ledger.create_account(&CallContext::new(owner)).unwrap();

    assert_eq!(receipt.events(), &[LedgerEvent::AccountCreated { owner }]);
    assert!(ledger.has_account(&owner).unwrap());
}

#[test]
fn test_new_account_has_zero_balance() {
    let mut ledger = Ledger::new(MemoryStore::new());
    let ctx = CallContext::new(Address::random());

    ledger.create_account(&ctx).unwrap();

    assert_eq!(ledger.balance(&ctx).unwrap(), Amount::ZERO);
}

#[test]
fn test_create_account_records_call_timestamp() {
    let mut ledger = Ledger::new(MemoryStore::new());
    let owner = Address::random();
    let when = chrono::DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
        .unwrap()
        .with_timezone(&chrono::Utc);

    ledger.create_account(&CallContext::new(owner).at(when)).unwrap();

    let account = ledger.account(&owner).unwrap().unwrap();
    assert_eq!(account.created_at(), when);
}

#[test]
fn test_create_account_twice_fails() {
    let mut ledger = Ledger::new(MemoryStore::new());
    let owner = Address::random();
    let ctx = CallContext::new(owner);

    ledger.create_account(&ctx).unwrap();
    let balance_after_first = ledger.balance(&ctx).unwrap();

    let result = ledger.create_account(&ctx);

    assert!(matches!(result, Err(LedgerError::AccountAlreadyExists(a)) if a == owner));
    assert_eq!(ledger.balance(&ctx).unwrap(), balance_after_first);
    assert_eq!(ledger.events().len(), 1);
}

#[test]
fn test_create_account_twice_keeps_funds() {
    let mut ledger = Ledger::new(MemoryStore::new());
    let ctx = CallContext::new(Address::random());

    ledger.create_account(&ctx).unwrap();
    ledger
        .deposit(&ctx.clone().with_value(Amount::from_u64(500)))
        .unwrap();

    assert!(ledger.create_account(&ctx).is_err());
    assert_eq!(ledger.balance(&ctx).unwrap(), Amount::from_u64(500));
}

#[test]
fn test_accounts_are_independent_per_identity() {
    let mut ledger = Ledger::new(MemoryStore::new());
    let alice = CallContext::new(Address::random());
    let bob = CallContext::new(Address::random());

    ledger.create_account(&alice).unwrap();
    ledger.create_account(&bob).unwrap();
    ledger
        .deposit(&alice.clone().with_value(Amount::from_u64(7)))
        .unwrap();

    assert_eq!(ledger.balance(&alice).unwrap(), Amount::from_u64(7));
    assert_eq!(ledger.balance(&bob).unwrap(), Amount::ZERO);
}

// ============================================================================
// MISSING ACCOUNTS
// ============================================================================

#[test]
fn test_balance_before_create_is_zero() {
    let ledger = Ledger::new(MemoryStore::new());
    let ctx = CallContext::new(Address::random());

    assert_eq!(ledger.balance(&ctx).unwrap(), Amount::ZERO);
    assert!(!ledger.has_account(&ctx.caller()).unwrap());
}

#[test]
fn test_balance_query_does_not_create_account() {
    let ledger = Ledger::new(MemoryStore::new());
    let ctx = CallContext::new(Address::random());

    ledger.balance(&ctx).unwrap();

    assert!(ledger.account(&ctx.caller()).unwrap().is_none());
    assert!(ledger.events().is_empty());
}
