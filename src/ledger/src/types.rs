//! Core types for the devnet ledger.

use crate::errors::LedgerError;
use std::fmt;
use std::str::FromStr;

/// Number of lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Amount in lamports, the unit used on the wire.
pub type Lamports = u64;

/// A 32-byte account address, the raw ed25519 public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Pubkey(pub [u8; 32]);

impl Pubkey {
    /// Length of an address in bytes.
    pub const LEN: usize = 32;

    /// The System Program address (all zeros).
    pub const SYSTEM_PROGRAM: Pubkey = Pubkey([0u8; 32]);

    /// Creates an address from a byte slice of exactly 32 bytes.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, LedgerError> {
        if bytes.len() != Self::LEN {
            return Err(LedgerError::InvalidAddress(format!(
                "invalid address length: {} (expected {})",
                bytes.len(),
                Self::LEN
            )));
        }

        let mut address = [0u8; 32];
        address.copy_from_slice(bytes);
        Ok(Pubkey(address))
    }

    /// Returns the raw address bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl FromStr for Pubkey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s.trim())
            .into_vec()
            .map_err(|e| LedgerError::InvalidAddress(format!("{}: {}", s, e)))?;
        Self::try_from_slice(&bytes)
    }
}

/// A 64-byte ed25519 transaction signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    /// Length of a signature in bytes.
    pub const LEN: usize = 64;
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl FromStr for Signature {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s.trim())
            .into_vec()
            .map_err(|e| LedgerError::InvalidResponse(format!("invalid signature {}: {}", s, e)))?;
        if bytes.len() != Self::LEN {
            return Err(LedgerError::InvalidResponse(format!(
                "invalid signature length: {} (expected {})",
                bytes.len(),
                Self::LEN
            )));
        }

        let mut signature = [0u8; 64];
        signature.copy_from_slice(&bytes);
        Ok(Signature(signature))
    }
}

/// Converts a SOL amount into lamports, rounding to the nearest lamport.
pub fn sol_to_lamports(sol: f64) -> Result<Lamports, LedgerError> {
    if !sol.is_finite() || sol <= 0.0 {
        return Err(LedgerError::InvalidAmount(format!(
            "{} is not a positive amount",
            sol
        )));
    }

    let lamports = (sol * LAMPORTS_PER_SOL as f64).round();
    if lamports < 1.0 {
        return Err(LedgerError::InvalidAmount(format!(
            "{} SOL is less than one lamport",
            sol
        )));
    }
    if lamports >= u64::MAX as f64 {
        return Err(LedgerError::InvalidAmount(format!("{} SOL is too large", sol)));
    }

    Ok(lamports as Lamports)
}

/// Converts lamports into SOL.
pub fn lamports_to_sol(lamports: Lamports) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
