//! Core library for payform: identifier classification, amount entry
//! normalization, and proposal-form verdicts for the Stellar ledger.

pub mod address;
pub mod amount;
pub mod base32;
pub mod form;
pub mod output;
pub mod strkey;

pub use address::{
    is_valid_account_address, is_valid_token_address, AccountKind, AddressClassifier, TokenKind,
    NATIVE_TOKEN,
};
pub use amount::{
    format_amount, to_smallest_unit, validate_amount, validate_committed_amount,
    AmountValidationError, AMOUNT_DECIMALS, MAX_AMOUNT, STROOPS_PER_UNIT,
};
pub use base32::{is_valid_base32, BASE32_ALPHABET};
pub use form::{
    revalidate_touched, validate_field, validate_proposal, Field, FieldIssue, ProposalDraft,
    ProposalReport,
};
pub use output::{truncate_address, AgentError, OutputMode, RowIssue};
pub use strkey::{decode_account_id, encode_account_id, Ed25519KeyCheck, StrKeyCheck, StrKeyError};
