//! Account and token identifier classification.
//!
//! Classification only looks at the prefix, the length and the character
//! set. The ed25519 branch additionally asks an [`Ed25519KeyCheck`] for a
//! full StrKey decode; every failure collapses to "not valid".

use crate::base32::is_valid_base32;
use crate::strkey::{Ed25519KeyCheck, StrKeyCheck, ACCOUNT_ID_LEN};

/// Leading character of an ed25519 account id.
pub const ED25519_PREFIX: char = 'G';
/// Leading character of a multiplexed account.
pub const MUXED_PREFIX: char = 'M';
/// Leading character of a contract id.
pub const CONTRACT_PREFIX: char = 'C';

pub const MUXED_ACCOUNT_LEN: usize = 69;
pub const CONTRACT_ID_LEN: usize = 56;

/// Literal token identifier for the ledger's base asset.
pub const NATIVE_TOKEN: &str = "NATIVE";

/// Which account encoding a valid address used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Ed25519,
    Muxed,
}

/// Which token encoding a valid token identifier used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Native,
    Contract,
    Account(AccountKind),
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Ed25519 => "ed25519",
            AccountKind::Muxed => "muxed",
        }
    }
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Native => "native",
            TokenKind::Contract => "contract",
            TokenKind::Account(AccountKind::Ed25519) => "account (ed25519)",
            TokenKind::Account(AccountKind::Muxed) => "account (muxed)",
        }
    }
}

/// Classifies identifiers using an injected ed25519 key check.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressClassifier<K = StrKeyCheck> {
    key_check: K,
}

impl<K: Ed25519KeyCheck> AddressClassifier<K> {
    pub fn new(key_check: K) -> Self {
        Self { key_check }
    }

    pub fn classify_account(&self, addr: &str) -> Option<AccountKind> {
        if addr.is_empty() {
            return None;
        }

        if addr.starts_with(ED25519_PREFIX) {
            if addr.len() != ACCOUNT_ID_LEN {
                tracing::debug!(len = addr.len(), "ed25519 account has wrong length");
                return None;
            }
            return self
                .key_check
                .check_ed25519_public_key(addr)
                .then_some(AccountKind::Ed25519);
        }

        if let Some(payload) = addr.strip_prefix(MUXED_PREFIX) {
            if addr.len() != MUXED_ACCOUNT_LEN {
                tracing::debug!(len = addr.len(), "muxed account has wrong length");
                return None;
            }
            // Charset only: no checksum verification for muxed accounts.
            return is_valid_base32(payload).then_some(AccountKind::Muxed);
        }

        tracing::debug!("unrecognized account prefix");
        None
    }

    pub fn classify_token(&self, addr: &str) -> Option<TokenKind> {
        if addr.is_empty() {
            return None;
        }

        if let Some(payload) = addr.strip_prefix(CONTRACT_PREFIX) {
            if addr.len() != CONTRACT_ID_LEN {
                tracing::debug!(len = addr.len(), "contract id has wrong length");
                return None;
            }
            return is_valid_base32(payload).then_some(TokenKind::Contract);
        }

        if addr == NATIVE_TOKEN {
            return Some(TokenKind::Native);
        }

        self.classify_account(addr).map(TokenKind::Account)
    }

    pub fn is_valid_account_address(&self, addr: &str) -> bool {
        self.classify_account(addr).is_some()
    }

    pub fn is_valid_token_address(&self, addr: &str) -> bool {
        self.classify_token(addr).is_some()
    }
}

/// Validate an account identifier (`G...` ed25519 key or `M...` muxed account).
pub fn is_valid_account_address(addr: &str) -> bool {
    AddressClassifier::<StrKeyCheck>::default().is_valid_account_address(addr)
}

/// Validate a token identifier (`NATIVE`, `C...` contract id, or an account).
pub fn is_valid_token_address(addr: &str) -> bool {
    AddressClassifier::<StrKeyCheck>::default().is_valid_token_address(addr)
}
