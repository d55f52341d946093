//! Legacy transaction encoding for System Program transfers.
//!
//! A transfer transaction carries a single instruction and a single
//! signature from the funding account. The wire layout is:
//!
//! ```text
//! signatures:   compact-u16 count, 64 bytes each
//! message:
//!   header:     num_required_signatures, num_readonly_signed, num_readonly_unsigned
//!   accounts:   compact-u16 count, 32 bytes each
//!   blockhash:  32 bytes
//!   instructions:
//!     compact-u16 count
//!     program_id_index, compact-u16 account index list, compact-u16 data
//! ```

use crate::errors::LedgerError;
use crate::keypair::Keypair;
use crate::types::{Lamports, Pubkey, Signature};

/// System Program instruction index for `Transfer`.
const SYSTEM_TRANSFER: u32 = 2;

/// Appends a compact-u16 length prefix.
pub fn encode_compact_u16(buf: &mut Vec<u8>, value: u16) {
    let mut rem = value;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            buf.push(byte);
            break;
        }
        byte |= 0x80;
        buf.push(byte);
    }
}

fn encode_len(buf: &mut Vec<u8>, len: usize) -> Result<(), LedgerError> {
    let len = u16::try_from(len)
        .map_err(|_| LedgerError::InvalidResponse(format!("length {} exceeds u16", len)))?;
    encode_compact_u16(buf, len);
    Ok(())
}

/// An unsigned transfer message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferMessage {
    /// Funding account, the only signer
    pub from: Pubkey,
    /// Receiving account
    pub to: Pubkey,
    /// Amount to move
    pub lamports: Lamports,
    /// Recent blockhash the message is anchored to
    pub recent_blockhash: [u8; 32],
}

impl TransferMessage {
    /// Serializes the message bytes that the signer commits to.
    pub fn serialize(&self) -> Result<Vec<u8>, LedgerError> {
        // Self-transfers reference the same account twice by index.
        let (account_keys, to_index): (Vec<Pubkey>, u8) = if self.from == self.to {
            (vec![self.from, Pubkey::SYSTEM_PROGRAM], 0)
        } else {
            (vec![self.from, self.to, Pubkey::SYSTEM_PROGRAM], 1)
        };
        let program_index = (account_keys.len() - 1) as u8;

        let mut data = Vec::with_capacity(12);
        data.extend_from_slice(&SYSTEM_TRANSFER.to_le_bytes());
        data.extend_from_slice(&self.lamports.to_le_bytes());

        let mut buf = Vec::with_capacity(160);
        buf.push(1); // required signatures
        buf.push(0); // readonly signed
        buf.push(1); // readonly unsigned (system program)

        encode_len(&mut buf, account_keys.len())?;
        for key in &account_keys {
            buf.extend_from_slice(&key.0);
        }

        buf.extend_from_slice(&self.recent_blockhash);

        encode_len(&mut buf, 1)?;
        buf.push(program_index);
        encode_len(&mut buf, 2)?;
        buf.push(0);
        buf.push(to_index);
        encode_len(&mut buf, data.len())?;
        buf.extend_from_slice(&data);

        Ok(buf)
    }

    /// Signs the message and returns the signature with the full wire transaction.
    pub fn sign(&self, signer: &Keypair) -> Result<(Signature, Vec<u8>), LedgerError> {
        if signer.pubkey() != self.from {
            return Err(LedgerError::InvalidKeypair(format!(
                "signer {} does not match funding account {}",
                signer.pubkey(),
                self.from
            )));
        }

        let message = self.serialize()?;
        let signature = signer.sign(&message)?;

        let mut tx = Vec::with_capacity(1 + Signature::LEN + message.len());
        encode_len(&mut tx, 1)?;
        tx.extend_from_slice(&signature.0);
        tx.extend_from_slice(&message);

        Ok((signature, tx))
    }
}
