//! Configuration for the CLI wallet.

use crate::errors::WalletError;
use ledger::{Commitment, RpcClient, DEVNET_URL};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the CLI wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// The RPC endpoint to connect to
    pub rpc_url: String,
    /// The commitment level for queries and confirmations
    pub commitment: Commitment,
    /// Path to the wallet record
    pub wallet_path: PathBuf,
    /// How long to wait for a transaction to be confirmed
    pub confirm_timeout_secs: u64,
    /// How often to poll for confirmation
    pub poll_interval_ms: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEVNET_URL.to_string(),
            commitment: Commitment::Confirmed,
            wallet_path: PathBuf::from("wallet.json"),
            confirm_timeout_secs: 60,
            poll_interval_ms: 500,
        }
    }
}

impl WalletConfig {
    /// Loads configuration from a file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WalletError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: WalletConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), WalletError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), WalletError> {
        if self.rpc_url.trim().is_empty() {
            return Err(WalletError::ConfigError("rpc_url must not be empty".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(WalletError::ConfigError(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the RPC client described by this configuration.
    pub fn rpc_client(&self) -> RpcClient {
        RpcClient::new(self.rpc_url.clone())
            .with_commitment(self.commitment)
            .with_confirmation(
                Duration::from_secs(self.confirm_timeout_secs),
                Duration::from_millis(self.poll_interval_ms),
            )
    }
}
