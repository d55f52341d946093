//! Ledger client for the devnet wallet.
//!
//! This crate provides the account primitives (addresses, keypairs,
//! signatures), System Program transfer encoding, and a JSON-RPC client
//! that implements the [`LedgerClient`] capability the wallet depends on.

pub mod client;
pub mod errors;
pub mod keypair;
pub mod rpc;
pub mod transaction;
pub mod types;

// Re-export commonly used types
pub use client::LedgerClient;
pub use errors::LedgerError;
pub use keypair::Keypair;
pub use rpc::{Commitment, RpcClient, DEVNET_URL};
pub use types::{lamports_to_sol, sol_to_lamports, Lamports, Pubkey, Signature, LAMPORTS_PER_SOL};
