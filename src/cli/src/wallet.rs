//! Wallet store for the CLI.
//!
//! A wallet is a single JSON record holding one keypair and the balance
//! last observed for it:
//!
//! ```json
//! { "publicKey": "<base58>", "privateKey": "[b0,b1,...,b63]", "balance": 1.5 }
//! ```
//!
//! `privateKey` is the 64-byte `secret || public` keypair printed as an
//! integer list inside a string. The `publicKey` field is a cached copy and
//! is never trusted on load; the address is always re-derived.

use crate::errors::WalletError;
use ledger::{Keypair, LedgerClient, Pubkey};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// On-disk form of a wallet.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletRecord {
    #[serde(default)]
    public_key: String,
    private_key: String,
    #[serde(default, deserialize_with = "lenient_balance")]
    balance: f64,
}

/// Older records may hold a non-numeric balance; it is only a cache.
fn lenient_balance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|b| b.is_finite()).unwrap_or(0.0))
}

/// The wallet's keypair together with its last known balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    keypair: Keypair,
    last_known_balance: f64,
}

impl Identity {
    /// Creates an identity from a keypair and a cached balance.
    pub fn new(keypair: Keypair, last_known_balance: f64) -> Self {
        Self {
            keypair,
            last_known_balance,
        }
    }

    /// Gets the signing keypair.
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Gets the address derived from the keypair.
    pub fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Gets the balance recorded at the last save.
    pub fn last_known_balance(&self) -> f64 {
        self.last_known_balance
    }

    /// Records a freshly observed balance.
    pub fn set_balance(&mut self, balance: f64) {
        self.last_known_balance = balance;
    }
}

/// Persistent storage for a single wallet record.
#[derive(Debug, Clone)]
pub struct WalletStore {
    path: PathBuf,
}

impl WalletStore {
    /// Creates a store backed by the record at `path`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Gets the path of the record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the identity from the record.
    pub fn load(&self) -> Result<Identity, WalletError> {
        let contents = fs::read_to_string(&self.path)?;
        let record: WalletRecord = serde_json::from_str(&contents)?;

        let bytes = parse_private_key(&record.private_key)?;
        let keypair = Keypair::from_bytes(&bytes)?;

        if record.public_key != keypair.pubkey().to_string() {
            debug!(
                "Cached public key {:?} differs from derived {}",
                record.public_key,
                keypair.pubkey()
            );
        }

        Ok(Identity::new(keypair, record.balance))
    }

    /// Saves the identity with a balance snapshot, replacing the record.
    pub fn save(&self, identity: &Identity, balance: f64) -> Result<(), WalletError> {
        if !balance.is_finite() {
            return Err(WalletError::InvalidRecord(format!(
                "balance {} is not a finite number",
                balance
            )));
        }

        let record = WalletRecord {
            public_key: identity.address().to_string(),
            private_key: format_private_key(&identity.keypair().to_bytes())?,
            balance,
        };
        let contents = serde_json::to_string_pretty(&record)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(contents.as_bytes())?;
        debug!("Saved wallet {} to {}", record.public_key, self.path.display());

        Ok(())
    }

    /// Loads the identity, or generates and saves a new one if the record is
    /// missing or unreadable.
    ///
    /// An unreadable record is moved aside to `<path>.corrupt` (or the next
    /// free `<path>.corrupt.N`) before the new identity is written, so its key
    /// material is never overwritten. The only
    /// error returned is a failure to persist the new identity.
    pub fn load_or_generate<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
    ) -> Result<Identity, WalletError> {
        match self.load() {
            Ok(identity) => {
                debug!("Loaded wallet {} from {}", identity.address(), self.path.display());
                return Ok(identity);
            }
            Err(WalletError::FileError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No wallet at {}, generating a new one", self.path.display());
            }
            Err(e) => {
                warn!("Wallet at {} is unreadable ({}), generating a new one", self.path.display(), e);
                self.quarantine();
            }
        }

        let identity = Identity::new(ledger.generate_keypair(), 0.0);
        self.save(&identity, identity.last_known_balance())?;
        info!("Created wallet {}", identity.address());

        Ok(identity)
    }

    /// First of `<path>.corrupt`, `<path>.corrupt.1`, ... that does not exist.
    fn backup_path(&self) -> PathBuf {
        let mut base = self.path.clone().into_os_string();
        base.push(".corrupt");

        let mut candidate = PathBuf::from(&base);
        let mut n = 0u32;
        while candidate.exists() {
            n += 1;
            let mut name = base.clone();
            name.push(format!(".{}", n));
            candidate = PathBuf::from(name);
        }
        candidate
    }

    fn quarantine(&self) {
        let backup = self.backup_path();

        match fs::rename(&self.path, &backup) {
            Ok(()) => warn!("Moved unreadable wallet to {}", backup.display()),
            Err(e) => warn!("Failed to move unreadable wallet aside: {}", e),
        }
    }
}

/// Prints key bytes as an integer list, e.g. `[1,2,3]`.
fn format_private_key(bytes: &[u8]) -> Result<String, WalletError> {
    Ok(serde_json::to_string(bytes)?)
}

/// Parses an integer list with or without surrounding brackets.
fn parse_private_key(text: &str) -> Result<Vec<u8>, WalletError> {
    let text = text.trim();
    if text.starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }

    text.split(',')
        .map(|part| {
            part.trim().parse::<u8>().map_err(|e| {
                WalletError::InvalidRecord(format!("invalid key byte {:?}: {}", part, e))
            })
        })
        .collect()
}
