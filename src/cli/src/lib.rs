//! CLI wallet for Solana devnet.

pub mod commands;
pub mod config;
pub mod errors;
pub mod wallet;

// Re-export commonly used types and functions
pub use commands::{dispatch, handle_command, Command, Outcome, UsageError};
pub use config::WalletConfig;
pub use errors::WalletError;
pub use wallet::{Identity, WalletStore};
