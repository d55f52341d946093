//! Grant command for the CLI wallet.

use super::refresh_and_save;
use crate::errors::WalletError;
use crate::wallet::{Identity, WalletStore};
use colored::Colorize;
use ledger::{LedgerClient, Signature};
use tracing::info;

/// Runs the grant command.
pub async fn run<L: LedgerClient + ?Sized>(
    store: &WalletStore,
    ledger: &L,
    identity: &mut Identity,
    amount: f64,
) -> Result<Signature, WalletError> {
    info!("Requesting {} SOL for {}", amount, identity.address());

    let signature = ledger.request_grant(&identity.address(), amount).await?;
    println!("{} {} SOL airdrop successful.", "Grant:".green(), amount);
    info!("Grant confirmed: {}", signature);

    refresh_and_save(store, ledger, identity).await;
    Ok(signature)
}
