//! Stellar StrKey encoding for ed25519 account ids.
//!
//! A StrKey is the base32 encoding of `version || payload || crc16`, where
//! the checksum is CRC16-XMODEM over `version || payload`, stored
//! little-endian. Account ids use version `6 << 3`, which encodes to a
//! leading `G`.

use data_encoding::BASE32;
use thiserror::Error;

/// Encoded length of an ed25519 account id.
pub const ACCOUNT_ID_LEN: usize = 56;

const VERSION_ACCOUNT_ID: u8 = 6 << 3;
const PAYLOAD_LEN: usize = 32;
const DECODED_LEN: usize = 1 + PAYLOAD_LEN + 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrKeyError {
    #[error("strkey must be {expected} characters (got {actual})")]
    InvalidLength { expected: usize, actual: usize },
    #[error("strkey is not valid base32")]
    InvalidEncoding,
    #[error("strkey version byte {0:#04x} is not an account id")]
    InvalidVersion(u8),
    #[error("strkey checksum mismatch")]
    ChecksumMismatch,
}

/// CRC16-XMODEM (poly 0x1021, init 0, no reflection).
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= u16::from(*byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Encode a raw ed25519 public key as a `G...` account id.
pub fn encode_account_id(key: &[u8; PAYLOAD_LEN]) -> String {
    let mut data = Vec::with_capacity(DECODED_LEN);
    data.push(VERSION_ACCOUNT_ID);
    data.extend_from_slice(key);
    let checksum = crc16_xmodem(&data);
    data.extend_from_slice(&checksum.to_le_bytes());
    BASE32.encode(&data)
}

/// Decode a `G...` account id back into its raw ed25519 public key.
pub fn decode_account_id(s: &str) -> Result<[u8; PAYLOAD_LEN], StrKeyError> {
    if s.len() != ACCOUNT_ID_LEN {
        return Err(StrKeyError::InvalidLength {
            expected: ACCOUNT_ID_LEN,
            actual: s.len(),
        });
    }

    let data = BASE32
        .decode(s.as_bytes())
        .map_err(|_| StrKeyError::InvalidEncoding)?;
    if data.len() != DECODED_LEN {
        return Err(StrKeyError::InvalidEncoding);
    }

    if data[0] != VERSION_ACCOUNT_ID {
        return Err(StrKeyError::InvalidVersion(data[0]));
    }

    let (body, checksum) = data.split_at(1 + PAYLOAD_LEN);
    let expected = crc16_xmodem(body);
    if checksum != expected.to_le_bytes().as_slice() {
        return Err(StrKeyError::ChecksumMismatch);
    }

    let mut key = [0u8; PAYLOAD_LEN];
    key.copy_from_slice(&body[1..]);
    Ok(key)
}

/// Capability answering "is this a well-formed ed25519 account id?".
///
/// Implementations must not panic; any decode failure is `false`.
pub trait Ed25519KeyCheck {
    fn check_ed25519_public_key(&self, key: &str) -> bool;
}

/// Full StrKey check: version byte, base32 body and CRC16 checksum.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrKeyCheck;

impl Ed25519KeyCheck for StrKeyCheck {
    fn check_ed25519_public_key(&self, key: &str) -> bool {
        match decode_account_id(key) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(error = %err, "ed25519 strkey rejected");
                false
            }
        }
    }
}

impl<F> Ed25519KeyCheck for F
where
    F: Fn(&str) -> bool,
{
    fn check_ed25519_public_key(&self, key: &str) -> bool {
        self(key)
    }
}
