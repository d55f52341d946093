//! JSON-RPC implementation of the ledger client.

use crate::client::LedgerClient;
use crate::errors::LedgerError;
use crate::keypair::Keypair;
use crate::transaction::TransferMessage;
use crate::types::{lamports_to_sol, sol_to_lamports, Lamports, Pubkey, Signature};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Public devnet endpoint.
pub const DEVNET_URL: &str = "https://api.devnet.solana.com";

/// How far a transaction must have progressed before it counts as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Seen by the node
    Processed,
    /// Voted on by a supermajority
    #[default]
    Confirmed,
    /// Rooted
    Finalized,
}

impl Commitment {
    /// The name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

/// Status of a submitted transaction as reported by `getSignatureStatuses`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    /// Slot the transaction was processed in
    pub slot: u64,
    /// Number of confirmations, `None` once rooted
    pub confirmations: Option<u64>,
    /// Execution error, if the transaction failed
    pub err: Option<serde_json::Value>,
    /// Commitment level reached so far
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// The commitment level this status has reached.
    pub fn level(&self) -> Commitment {
        match (self.confirmation_status, self.confirmations) {
            (Some(level), _) => level,
            (None, None) => Commitment::Finalized,
            (None, Some(_)) => Commitment::Processed,
        }
    }
}

/// A ledger client speaking JSON-RPC 2.0 over HTTP.
#[derive(Debug)]
pub struct RpcClient {
    url: String,
    commitment: Commitment,
    confirm_timeout: Duration,
    poll_interval: Duration,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Creates a client for the given endpoint.
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            commitment: Commitment::default(),
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Sets the commitment level used for queries and confirmation.
    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    /// Sets how long and how often to poll for confirmation.
    pub fn with_confirmation(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.confirm_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    /// Gets the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, LedgerError> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });
        debug!("RPC request {} to {}", method, self.url);

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::Network(format!("Failed to connect to {}: {}", self.url, e)))?;

        let status = response.status();
        let response_text = response.text().await?;
        debug!("RPC response {} ({}): {}", method, status, response_text);

        if response_text.is_empty() {
            return Err(LedgerError::Network(format!(
                "Empty response from node (HTTP {})",
                status
            )));
        }

        let response: RpcResponse<T> = serde_json::from_str(&response_text).map_err(|e| {
            LedgerError::InvalidResponse(format!(
                "{} (HTTP {}): {}: {}",
                method, status, e, response_text
            ))
        })?;

        if let Some(error) = response.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .ok_or_else(|| LedgerError::InvalidResponse(format!("No result in {} response", method)))
    }

    /// Gets the balance of an address in lamports.
    pub async fn get_balance_lamports(&self, address: &Pubkey) -> Result<Lamports, LedgerError> {
        let context: RpcContext<Lamports> = self
            .call(
                "getBalance",
                serde_json::json!([address.to_string(), { "commitment": self.commitment.as_str() }]),
            )
            .await?;
        Ok(context.value)
    }

    /// Gets a recent blockhash to anchor a transaction to.
    pub async fn get_latest_blockhash(&self) -> Result<[u8; 32], LedgerError> {
        let context: RpcContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                serde_json::json!([{ "commitment": self.commitment.as_str() }]),
            )
            .await?;

        let bytes = bs58::decode(&context.value.blockhash)
            .into_vec()
            .map_err(|e| LedgerError::InvalidResponse(format!("Invalid blockhash: {}", e)))?;
        if bytes.len() != 32 {
            return Err(LedgerError::InvalidResponse(format!(
                "Invalid blockhash length: {} (expected 32)",
                bytes.len()
            )));
        }

        let mut blockhash = [0u8; 32];
        blockhash.copy_from_slice(&bytes);
        Ok(blockhash)
    }

    /// Submits a signed wire transaction.
    pub async fn send_transaction(&self, tx: &[u8]) -> Result<Signature, LedgerError> {
        let signature: String = self
            .call(
                "sendTransaction",
                serde_json::json!([
                    STANDARD.encode(tx),
                    { "encoding": "base64", "preflightCommitment": self.commitment.as_str() }
                ]),
            )
            .await?;
        signature.parse()
    }

    /// Gets the status of a transaction, `None` if the node has not seen it.
    pub async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, LedgerError> {
        let context: RpcContext<Vec<Option<SignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                serde_json::json!([[signature.to_string()], { "searchTransactionHistory": true }]),
            )
            .await?;
        Ok(context.value.into_iter().next().flatten())
    }

    /// Polls until the transaction reaches the configured commitment.
    pub async fn confirm_transaction(&self, signature: &Signature) -> Result<(), LedgerError> {
        let deadline = Instant::now() + self.confirm_timeout;

        loop {
            if let Some(status) = self.get_signature_status(signature).await? {
                if let Some(err) = status.err {
                    return Err(LedgerError::TransactionFailed {
                        signature: signature.to_string(),
                        reason: err.to_string(),
                    });
                }
                if status.level() >= self.commitment {
                    debug!("Transaction {} reached {:?}", signature, status.level());
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                return Err(LedgerError::ConfirmationTimeout {
                    signature: signature.to_string(),
                    timeout_secs: self.confirm_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl LedgerClient for RpcClient {
    async fn balance(&self, address: &Pubkey) -> Result<f64, LedgerError> {
        let lamports = self.get_balance_lamports(address).await?;
        Ok(lamports_to_sol(lamports))
    }

    async fn request_grant(&self, address: &Pubkey, amount: f64) -> Result<Signature, LedgerError> {
        let lamports = sol_to_lamports(amount)?;
        info!("Requesting airdrop of {} lamports to {}", lamports, address);

        let signature: String = self
            .call(
                "requestAirdrop",
                serde_json::json!([
                    address.to_string(),
                    lamports,
                    { "commitment": self.commitment.as_str() }
                ]),
            )
            .await?;
        let signature: Signature = signature.parse()?;

        self.confirm_transaction(&signature).await?;
        Ok(signature)
    }

    async fn transfer(&self, from: &Keypair, to: &Pubkey, amount: f64) -> Result<Signature, LedgerError> {
        let lamports = sol_to_lamports(amount)?;
        info!("Transferring {} lamports from {} to {}", lamports, from.pubkey(), to);

        let recent_blockhash = self.get_latest_blockhash().await?;
        let message = TransferMessage {
            from: from.pubkey(),
            to: *to,
            lamports,
            recent_blockhash,
        };
        let (signature, tx) = message.sign(from)?;

        let submitted = self.send_transaction(&tx).await?;
        if submitted != signature {
            warn!("Node reported signature {} for transaction {}", submitted, signature);
        }

        self.confirm_transaction(&submitted).await?;
        Ok(submitted)
    }
}
