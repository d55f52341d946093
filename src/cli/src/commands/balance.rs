//! Balance command for the CLI wallet.

use crate::errors::WalletError;
use crate::wallet::{Identity, WalletStore};
use colored::Colorize;
use ledger::LedgerClient;
use tracing::{debug, warn};

/// Runs the balance command.
///
/// The fresh balance is cached in the wallet record, but failing to save it
/// does not fail the command.
pub async fn run<L: LedgerClient + ?Sized>(
    store: &WalletStore,
    ledger: &L,
    identity: &mut Identity,
) -> Result<f64, WalletError> {
    let address = identity.address();
    debug!("Getting balance for address: {}", address);

    let balance = ledger.balance(&address).await?;
    println!("{} {}", "Wallet address:".green(), address);
    println!("{} {} SOL", "Balance:".green(), balance);

    identity.set_balance(balance);
    if let Err(e) = store.save(identity, balance) {
        warn!("Failed to cache balance in {}: {}", store.path().display(), e);
    }

    Ok(balance)
}
