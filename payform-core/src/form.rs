//! Field-level verdicts for a payment proposal draft.

use serde::Serialize;

use crate::address::AddressClassifier;
use crate::amount::{
    format_amount, to_smallest_unit, validate_amount, validate_committed_amount,
    AmountValidationError,
};
use crate::strkey::Ed25519KeyCheck;

/// Form fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Recipient,
    Token,
    Amount,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Recipient, Field::Token, Field::Amount];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Recipient => "recipient",
            Field::Token => "token",
            Field::Amount => "amount",
        }
    }
}

/// A verdict for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: Field,
    pub message: String,
}

impl FieldIssue {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The raw strings stored by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalDraft {
    pub recipient: String,
    pub token: String,
    pub amount: String,
}

impl ProposalDraft {
    /// Store amount keystrokes in canonical form.
    pub fn set_amount(&mut self, raw: &str) {
        self.amount = format_amount(raw);
    }
}

/// Validate a single field of `draft`.
pub fn validate_field<K: Ed25519KeyCheck>(
    field: Field,
    draft: &ProposalDraft,
    classifier: &AddressClassifier<K>,
) -> Option<FieldIssue> {
    match field {
        Field::Recipient => {
            let value = draft.recipient.trim();
            if value.is_empty() {
                Some(FieldIssue::new(field, "recipient address is required"))
            } else if !classifier.is_valid_account_address(value) {
                Some(FieldIssue::new(field, "invalid recipient address"))
            } else {
                None
            }
        }
        Field::Token => {
            let value = draft.token.trim();
            if value.is_empty() {
                Some(FieldIssue::new(field, "token address is required"))
            } else if !classifier.is_valid_token_address(value) {
                Some(FieldIssue::new(field, "invalid token address"))
            } else {
                None
            }
        }
        Field::Amount => validate_amount(&draft.amount)
            .err()
            .map(|err| FieldIssue::new(field, err.to_string())),
    }
}

/// Validate every field, in form order.
pub fn validate_proposal<K: Ed25519KeyCheck>(
    draft: &ProposalDraft,
    classifier: &AddressClassifier<K>,
) -> Vec<FieldIssue> {
    revalidate_touched(draft, &Field::ALL, classifier)
}

/// Re-run validation for exactly the `touched` fields.
///
/// Call after any field value changes. Output follows form order regardless
/// of the order of `touched`.
pub fn revalidate_touched<K: Ed25519KeyCheck>(
    draft: &ProposalDraft,
    touched: &[Field],
    classifier: &AddressClassifier<K>,
) -> Vec<FieldIssue> {
    Field::ALL
        .iter()
        .filter(|field| touched.contains(field))
        .filter_map(|field| validate_field(*field, draft, classifier))
        .collect()
}

/// Validation outcome for a whole draft, ready for agent output.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalReport {
    pub valid: bool,
    pub recipient: String,
    pub token: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_stroops: Option<String>,
    pub issues: Vec<FieldIssue>,
}

impl ProposalReport {
    /// Report for a draft filled in through the form.
    pub fn from_draft<K: Ed25519KeyCheck>(
        draft: &ProposalDraft,
        classifier: &AddressClassifier<K>,
    ) -> Self {
        Self::build(draft, classifier, validate_amount)
    }

    /// Report for a draft read from a finished record; the amount is taken
    /// verbatim instead of being sanitized.
    pub fn from_committed<K: Ed25519KeyCheck>(
        draft: &ProposalDraft,
        classifier: &AddressClassifier<K>,
    ) -> Self {
        Self::build(draft, classifier, validate_committed_amount)
    }

    fn build<K: Ed25519KeyCheck>(
        draft: &ProposalDraft,
        classifier: &AddressClassifier<K>,
        check_amount: fn(&str) -> Result<(), AmountValidationError>,
    ) -> Self {
        let mut issues = revalidate_touched(draft, &[Field::Recipient, Field::Token], classifier);
        let amount_check = check_amount(&draft.amount);
        if let Err(err) = amount_check {
            issues.push(FieldIssue::new(Field::Amount, err.to_string()));
        }
        let amount_stroops = amount_check.ok().map(|_| to_smallest_unit(&draft.amount));

        Self {
            valid: issues.is_empty(),
            recipient: draft.recipient.trim().to_string(),
            token: draft.token.trim().to_string(),
            amount: draft.amount.trim().to_string(),
            amount_stroops,
            issues,
        }
    }
}
