//! Transfer command for the CLI wallet.

use super::refresh_and_save;
use crate::errors::WalletError;
use crate::wallet::{Identity, WalletStore};
use colored::Colorize;
use ledger::{LedgerClient, Pubkey, Signature};
use tracing::info;

/// Runs the transfer command. The wallet record is only rewritten once the
/// transfer is confirmed.
pub async fn run<L: LedgerClient + ?Sized>(
    store: &WalletStore,
    ledger: &L,
    identity: &mut Identity,
    recipient: &Pubkey,
    amount: f64,
) -> Result<Signature, WalletError> {
    info!("Sending {} SOL from {} to {}", amount, identity.address(), recipient);

    let signature = ledger.transfer(identity.keypair(), recipient, amount).await?;
    println!("{} {}", "Transfer successful! Signature:".green(), signature);

    refresh_and_save(store, ledger, identity).await;
    Ok(signature)
}
