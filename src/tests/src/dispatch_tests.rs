//! Tests for command dispatch against a mock ledger.

use crate::mock_ledger::{Call, MockLedger};
use devnet_wallet::{dispatch, handle_command, Command, Identity, Outcome, WalletStore};
use ledger::{Keypair, Pubkey};
use std::fs;
use tempfile::{tempdir, TempDir};

const RECIPIENT: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

fn store() -> (TempDir, WalletStore) {
    let dir = tempdir().unwrap();
    let store = WalletStore::new(dir.path().join("wallet.json"));
    (dir, store)
}

fn seeded_store(balance: f64) -> (TempDir, WalletStore, Identity) {
    let (dir, store) = store();
    let identity = Identity::new(Keypair::generate(), balance);
    store.save(&identity, balance).unwrap();
    (dir, store, identity)
}

/// A first run creates and persists a wallet before the action runs.
#[tokio::test]
async fn test_balance_creates_wallet() {
    let (_dir, store) = store();
    let ledger = MockLedger::new().with_balance(Some(0.0));

    let outcome = handle_command(&store, &ledger, Some("balance"), None, None).await;
    assert_eq!(outcome, Outcome::Done);

    assert_eq!(ledger.generated(), 1);
    let identity = store.load().unwrap();
    assert_eq!(ledger.calls(), vec![Call::Balance(identity.address())]);
}

/// The balance command caches the balance it reads.
#[tokio::test]
async fn test_balance_caches_value() {
    let (_dir, store, identity) = seeded_store(1.0);
    let ledger = MockLedger::new().with_balance(Some(7.25));

    let outcome = dispatch(&store, &ledger, &Command::Balance).await;
    assert_eq!(outcome, Outcome::Done);

    let loaded = store.load().unwrap();
    assert_eq!(loaded.address(), identity.address());
    assert_eq!(loaded.last_known_balance(), 7.25);
    assert_eq!(ledger.generated(), 0);
}

/// A failing balance query is reported, not propagated.
#[tokio::test]
async fn test_balance_failure() {
    let (_dir, store, _identity) = seeded_store(1.0);
    let before = fs::read(store.path()).unwrap();
    let ledger = MockLedger::new().with_balance(None);

    let outcome = dispatch(&store, &ledger, &Command::Balance).await;
    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(fs::read(store.path()).unwrap(), before);
}

/// `grant` without an amount asks for one SOL.
#[tokio::test]
async fn test_grant_default_amount() {
    let (_dir, store, identity) = seeded_store(0.0);
    let ledger = MockLedger::new().with_balance(Some(1.0));

    let outcome = handle_command(&store, &ledger, Some("grant"), None, None).await;
    assert_eq!(outcome, Outcome::Done);

    let address = identity.address();
    assert_eq!(
        ledger.calls(),
        vec![Call::Grant(address, 1.0), Call::Balance(address)]
    );
    assert_eq!(store.load().unwrap().last_known_balance(), 1.0);
}

/// `grant <amount>` passes the amount through.
#[tokio::test]
async fn test_grant_with_amount() {
    let (_dir, store, identity) = seeded_store(0.0);
    let ledger = MockLedger::new().with_balance(Some(2.0));

    let outcome = handle_command(&store, &ledger, Some("grant"), Some("2"), None).await;
    assert_eq!(outcome, Outcome::Done);
    assert_eq!(ledger.calls()[0], Call::Grant(identity.address(), 2.0));
}

/// A grant that succeeds keeps the cached balance if the follow-up query fails.
#[tokio::test]
async fn test_grant_keeps_balance_when_refresh_fails() {
    let (_dir, store, identity) = seeded_store(3.0);
    let ledger = MockLedger::new().with_balance(None);

    let outcome = dispatch(&store, &ledger, &Command::Grant { amount: 1.0 }).await;
    assert_eq!(outcome, Outcome::Done);

    let loaded = store.load().unwrap();
    assert_eq!(loaded.address(), identity.address());
    assert_eq!(loaded.last_known_balance(), 3.0);
}

/// `grant <recipient> <amount>` takes the amount from the second argument.
#[tokio::test]
async fn test_grant_positional_amount() {
    let (_dir, store, identity) = seeded_store(0.0);
    let ledger = MockLedger::new().with_balance(Some(2.0));

    let outcome =
        handle_command(&store, &ledger, Some("grant"), Some("anything"), Some("2")).await;
    assert_eq!(outcome, Outcome::Done);
    assert_eq!(ledger.calls()[0], Call::Grant(identity.address(), 2.0));
}

/// Turns the record path into a directory so the next save fails.
fn break_record_on_success(store: &WalletStore) -> MockLedger {
    let path = store.path().to_path_buf();
    MockLedger::new().with_balance(Some(4.0)).on_success(move || {
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
    })
}

/// A confirmed grant is still a success when the record cannot be rewritten.
#[tokio::test]
async fn test_grant_succeeds_when_save_fails() {
    let (_dir, store, identity) = seeded_store(0.0);
    let ledger = break_record_on_success(&store);

    let outcome = dispatch(&store, &ledger, &Command::Grant { amount: 1.0 }).await;
    assert_eq!(outcome, Outcome::Done);

    assert_eq!(
        ledger.calls(),
        vec![Call::Grant(identity.address(), 1.0), Call::Balance(identity.address())]
    );
    assert!(store.path().is_dir());
}

/// A confirmed transfer is still a success when the record cannot be rewritten.
#[tokio::test]
async fn test_transfer_succeeds_when_save_fails() {
    let (_dir, store, _identity) = seeded_store(5.0);
    let ledger = break_record_on_success(&store);

    let outcome =
        handle_command(&store, &ledger, Some("transfer"), Some(RECIPIENT), Some("1")).await;
    assert_eq!(outcome, Outcome::Done);
    assert_eq!(ledger.calls().len(), 2);
}

/// A rejected grant is reported and leaves the record alone.
#[tokio::test]
async fn test_grant_failure() {
    let (_dir, store, _identity) = seeded_store(0.5);
    let before = fs::read(store.path()).unwrap();
    let ledger = MockLedger::new().failing_grant();

    let outcome = dispatch(&store, &ledger, &Command::Grant { amount: 1.0 }).await;
    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(ledger.calls().len(), 1);
    assert_eq!(fs::read(store.path()).unwrap(), before);
}

/// A transfer signs with the wallet key and re-reads the balance.
#[tokio::test]
async fn test_transfer() {
    let (_dir, store, identity) = seeded_store(5.0);
    let ledger = MockLedger::new().with_balance(Some(2.5));

    let outcome =
        handle_command(&store, &ledger, Some("transfer"), Some(RECIPIENT), Some("2.5")).await;
    assert_eq!(outcome, Outcome::Done);

    let recipient: Pubkey = RECIPIENT.parse().unwrap();
    assert_eq!(
        ledger.calls(),
        vec![
            Call::Transfer {
                from: identity.address(),
                to: recipient,
                amount: 2.5
            },
            Call::Balance(identity.address()),
        ]
    );
    assert_eq!(store.load().unwrap().last_known_balance(), 2.5);
}

/// A failed transfer leaves the record byte-for-byte unchanged.
#[tokio::test]
async fn test_transfer_failure_leaves_record() {
    let (_dir, store, _identity) = seeded_store(5.0);
    let before = fs::read(store.path()).unwrap();
    let ledger = MockLedger::new().failing_transfer();

    let outcome =
        handle_command(&store, &ledger, Some("transfer"), Some(RECIPIENT), Some("2.5")).await;
    assert_eq!(outcome, Outcome::Failed);

    assert_eq!(ledger.calls().len(), 1);
    assert_eq!(fs::read(store.path()).unwrap(), before);
}

/// Incomplete or invalid transfers never reach the ledger.
#[tokio::test]
async fn test_transfer_usage_errors() {
    let (_dir, store, _identity) = seeded_store(5.0);
    let before = fs::read(store.path()).unwrap();
    let ledger = MockLedger::new();

    let cases: [(Option<&str>, Option<&str>); 5] = [
        (None, None),
        (Some(RECIPIENT), None),
        (Some(RECIPIENT), Some("-3")),
        (Some(RECIPIENT), Some("two")),
        (Some("Addr123"), Some("2.5")),
    ];
    for (recipient, amount) in cases {
        let outcome = handle_command(&store, &ledger, Some("transfer"), recipient, amount).await;
        assert_eq!(outcome, Outcome::Failed, "{:?} {:?}", recipient, amount);
    }

    assert!(ledger.calls().is_empty());
    assert_eq!(ledger.generated(), 0);
    assert_eq!(fs::read(store.path()).unwrap(), before);
}

/// A usage error on a first run does not create a wallet.
#[tokio::test]
async fn test_unknown_command() {
    let (_dir, store) = store();
    let ledger = MockLedger::new();

    let outcome = handle_command(&store, &ledger, Some("foo"), None, None).await;
    assert_eq!(outcome, Outcome::Failed);

    assert!(ledger.calls().is_empty());
    assert_eq!(ledger.generated(), 0);
    assert!(!store.path().exists());
}

/// A corrupt record is replaced by a fresh wallet and the command still runs.
#[tokio::test]
async fn test_corrupt_record_bootstraps_new_wallet() {
    let (dir, store) = store();
    fs::write(store.path(), "{\"publicKey\": \"x\", \"privateKey\": \"[1,2,3]\"").unwrap();
    let ledger = MockLedger::new().with_balance(Some(0.0));

    let outcome = dispatch(&store, &ledger, &Command::Balance).await;
    assert_eq!(outcome, Outcome::Done);

    assert_eq!(ledger.generated(), 1);
    let identity = store.load().unwrap();
    assert_eq!(ledger.calls(), vec![Call::Balance(identity.address())]);
    assert!(dir.path().join("wallet.json.corrupt").exists());
}

/// An unwritable record location fails before any ledger call.
#[tokio::test]
async fn test_unwritable_wallet_path() {
    let dir = tempdir().unwrap();
    // The parent of the record is a regular file
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let store = WalletStore::new(blocker.join("wallet.json"));
    let ledger = MockLedger::new();

    let outcome = dispatch(&store, &ledger, &Command::Grant { amount: 1.0 }).await;
    assert_eq!(outcome, Outcome::Failed);
    assert!(ledger.calls().is_empty());
}
