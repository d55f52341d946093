//! Ed25519 keypairs in the 64-byte `secret || public` layout.

use crate::errors::LedgerError;
use crate::types::{Pubkey, Signature};
use ed25519_dalek::{PublicKey, SecretKey, Signer};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

/// A signing keypair for a single account.
#[derive(Clone, PartialEq, Eq)]
pub struct Keypair {
    secret: [u8; 32],
    public: Pubkey,
}

impl Keypair {
    /// Length of the serialized keypair in bytes.
    pub const LEN: usize = 64;

    /// Generates a new keypair from the operating system's CSPRNG.
    pub fn generate() -> Self {
        let mut secret = [0u8; 32];
        OsRng.fill_bytes(&mut secret);
        Self::from_secret(secret)
    }

    /// Builds a keypair from a 32-byte secret, deriving the public half.
    pub fn from_secret(secret: [u8; 32]) -> Self {
        let public = derive_public(&secret);
        Self { secret, public }
    }

    /// Restores a keypair from its 64-byte serialized form.
    ///
    /// The trailing 32 bytes must equal the public key derived from the
    /// leading 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        if bytes.len() != Self::LEN {
            return Err(LedgerError::InvalidKeypair(format!(
                "invalid keypair length: {} (expected {})",
                bytes.len(),
                Self::LEN
            )));
        }

        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes[..32]);
        let keypair = Self::from_secret(secret);

        if keypair.public.0[..] != bytes[32..] {
            return Err(LedgerError::InvalidKeypair(
                "public key does not match secret key".to_string(),
            ));
        }

        Ok(keypair)
    }

    /// Serializes the keypair as `secret || public`.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.secret);
        bytes[32..].copy_from_slice(&self.public.0);
        bytes
    }

    /// Gets the account address of this keypair.
    pub fn pubkey(&self) -> Pubkey {
        self.public
    }

    /// Signs a message with the secret key.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, LedgerError> {
        let secret = SecretKey::from_bytes(&self.secret)
            .map_err(|e| LedgerError::InvalidKeypair(e.to_string()))?;
        let public = PublicKey::from(&secret);
        let keypair = ed25519_dalek::Keypair { secret, public };

        Ok(Signature(keypair.sign(message).to_bytes()))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.public.to_string())
            .finish_non_exhaustive()
    }
}

fn derive_public(secret: &[u8; 32]) -> Pubkey {
    // A 32-byte slice is always a valid ed25519 secret key
    match SecretKey::from_bytes(secret) {
        Ok(secret) => Pubkey(PublicKey::from(&secret).to_bytes()),
        Err(_) => Pubkey::default(),
    }
}
