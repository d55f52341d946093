//! Error types for the CLI wallet.

use ledger::LedgerError;
use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur in the CLI wallet.
#[derive(Debug)]
pub enum WalletError {
    /// Error when a file operation fails.
    FileError(std::io::Error),

    /// Error when JSON serialization or deserialization fails.
    JsonError(serde_json::Error),

    /// Error when a wallet record is structurally valid JSON but unusable.
    InvalidRecord(String),

    /// Error when a ledger operation fails.
    Ledger(LedgerError),

    /// Error when the configuration is invalid.
    ConfigError(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::FileError(e) => write!(f, "File error: {}", e),
            WalletError::JsonError(e) => write!(f, "JSON error: {}", e),
            WalletError::InvalidRecord(msg) => write!(f, "Invalid wallet record: {}", msg),
            WalletError::Ledger(e) => write!(f, "{}", e),
            WalletError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl StdError for WalletError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            WalletError::FileError(e) => Some(e),
            WalletError::JsonError(e) => Some(e),
            WalletError::Ledger(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WalletError {
    fn from(error: std::io::Error) -> Self {
        WalletError::FileError(error)
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(error: serde_json::Error) -> Self {
        WalletError::JsonError(error)
    }
}

impl From<LedgerError> for WalletError {
    fn from(error: LedgerError) -> Self {
        WalletError::Ledger(error)
    }
}
