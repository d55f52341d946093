//! The ledger capability the wallet talks to.

use crate::errors::LedgerError;
use crate::keypair::Keypair;
use crate::types::{Pubkey, Signature};
use async_trait::async_trait;

/// Remote ledger operations. Amounts are in SOL.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Generates a fresh keypair for a new wallet.
    fn generate_keypair(&self) -> Keypair {
        Keypair::generate()
    }

    /// Gets the balance of an address.
    async fn balance(&self, address: &Pubkey) -> Result<f64, LedgerError>;

    /// Requests a test-token grant to an address and waits for confirmation.
    async fn request_grant(&self, address: &Pubkey, amount: f64) -> Result<Signature, LedgerError>;

    /// Transfers funds from `from` to `to` and waits for confirmation.
    async fn transfer(&self, from: &Keypair, to: &Pubkey, amount: f64) -> Result<Signature, LedgerError>;
}
