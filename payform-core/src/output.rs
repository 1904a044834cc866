//! Output helpers for human and agent modes.

use serde::Serialize;

use crate::form::FieldIssue;

/// Human (TTY) vs Agent (non-interactive) output selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Agent,
}

/// Structured error collected for a specific CSV row.
#[derive(Debug, Clone, Serialize)]
pub struct RowIssue {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl RowIssue {
    pub fn from_field_issue(row: usize, issue: &FieldIssue) -> Self {
        Self {
            row,
            field: issue.field.as_str().to_string(),
            message: issue.message.clone(),
        }
    }
}

/// Agent-mode error payload.
#[derive(Debug, Clone, Serialize)]
pub struct AgentError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<RowIssue>>,
}

impl AgentError {
    /// A rejected batch: every row issue, exit code 1.
    pub fn validation_failed(details: Vec<RowIssue>) -> Self {
        Self {
            error: "validation_failed".to_string(),
            code: 1,
            details: Some(details),
        }
    }
}

// Version letter plus four payload characters.
const HEAD_CHARS: usize = 5;
// Enough of the tail to include the checksum characters.
const TAIL_CHARS: usize = 5;

/// Shorten a StrKey for tables: `GAAAC…B7JZX`.
///
/// Short identifiers such as `NATIVE` are returned as-is.
pub fn truncate_address(addr: &str) -> String {
    let chars: Vec<char> = addr.trim().chars().collect();
    if chars.len() <= HEAD_CHARS + TAIL_CHARS + 1 {
        return chars.into_iter().collect();
    }

    let head = &chars[..HEAD_CHARS];
    let tail = &chars[chars.len() - TAIL_CHARS..];
    head.iter().chain(std::iter::once(&'…')).chain(tail).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Field;

    #[test]
    fn short_identifier_is_unchanged() {
        assert_eq!(truncate_address("NATIVE"), "NATIVE");
    }

    #[test]
    fn long_account_id_is_shortened() {
        assert_eq!(
            truncate_address("GAAACAQDAQCQMBYIBEFAWDANBYHRAEISCMKBKFQXDAMRUGY4DUPB7JZX"),
            "GAAAC…B7JZX"
        );
    }

    #[test]
    fn muxed_account_keeps_checksum_tail() {
        assert_eq!(
            truncate_address("MAAACAQDAQCQMBYIBEFAWDANBYHRAEISCMKBKFQXDAMRUGY4DUPB6AAAAAAAAAAE2KZ3Q"),
            "MAAAC…2KZ3Q"
        );
        assert_eq!(truncate_address(" ABCDEFGHIJK "), "ABCDEFGHIJK");
    }

    #[test]
    fn unicode_input_does_not_panic() {
        let han = "\u{4F60}";
        let input = format!("G{}", han.repeat(20));
        assert_eq!(
            truncate_address(&input),
            format!("G{}…{}", han.repeat(4), han.repeat(5))
        );
    }

    #[test]
    fn row_issue_carries_field_name() {
        let issue = FieldIssue {
            field: Field::Token,
            message: "invalid token address".to_string(),
        };
        let err = AgentError::validation_failed(vec![RowIssue::from_field_issue(2, &issue)]);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["details"][0]["row"], 2);
        assert_eq!(json["details"][0]["field"], "token");
        assert_eq!(json["details"][0]["message"], "invalid token address");
    }

    #[test]
    fn absent_details_are_omitted() {
        let err = AgentError {
            error: "io_error".to_string(),
            code: 2,
            details: None,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"error":"io_error","code":2}"#);
    }
}
