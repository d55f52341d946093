//! Error types for the ledger crate.

use thiserror::Error;

/// Errors that can occur while talking to the ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Error when key bytes do not form a valid keypair.
    #[error("Invalid keypair: {0}")]
    InvalidKeypair(String),

    /// Error when a string is not a valid base58 address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Error when an amount cannot be expressed in lamports.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Error when the RPC endpoint cannot be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// Error returned by the RPC node in a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// The JSON-RPC error code
        code: i64,
        /// The error message reported by the node
        message: String,
    },

    /// Error when the node's response does not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Error when a submitted transaction was rejected on chain.
    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed {
        /// The transaction signature
        signature: String,
        /// The error reported in the signature status
        reason: String,
    },

    /// Error when a transaction is not confirmed in time.
    #[error("Transaction {signature} was not confirmed within {timeout_secs}s")]
    ConfirmationTimeout {
        /// The transaction signature
        signature: String,
        /// How long confirmation was awaited
        timeout_secs: u64,
    },
}

impl From<reqwest::Error> for LedgerError {
    fn from(error: reqwest::Error) -> Self {
        LedgerError::Network(error.to_string())
    }
}
