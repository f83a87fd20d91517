//! Registration invite codes

use super::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Codes present on every fresh install
pub const SEED_INVITE_CODES: [&str; 6] = [
    "CHW2024",
    "SERVER2024",
    "WELCOME24",
    "CHWINVITE",
    "ADMINCODE",
    "CHW001",
];

/// Prefix for admin-generated codes (`CHW-001`, `CHW-002`, ...)
pub const DEFAULT_CODE_PREFIX: &str = "CHW-";

/// Highest value of the 3-digit sequential counter
pub const MAX_SEQUENTIAL_CODE: u32 = 999;

/// Stored invite code. The code itself is the collection key.
///
/// `used` is true exactly when `used_by` and `used_at` are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteCodeRecord {
    pub used: bool,

    pub created_at: Timestamp,

    /// Who redeemed the code
    pub used_by: Option<String>,

    /// When the code was redeemed
    pub used_at: Option<Timestamp>,
}

impl InviteCodeRecord {
    /// Create a fresh, unused code record
    pub fn new_unused(created_at: Timestamp) -> Self {
        InviteCodeRecord {
            used: false,
            created_at,
            used_by: None,
            used_at: None,
        }
    }

    /// Check whether the code can still be redeemed
    pub fn is_valid(&self) -> Result<(), InviteError> {
        if self.used {
            return Err(InviteError::AlreadyUsed);
        }
        Ok(())
    }

    /// Flip the record to used, attributed to `username`.
    ///
    /// Overwrites the audit fields even if the code was already used; callers
    /// that need single-use semantics check [`is_valid`](Self::is_valid) first.
    pub fn redeem(&mut self, username: &str, at: Timestamp) {
        self.used = true;
        self.used_by = Some(username.to_string());
        self.used_at = Some(at);
    }

    /// Whether the audit fields agree with the `used` flag
    pub fn is_consistent(&self) -> bool {
        self.used == self.used_by.is_some() && self.used == self.used_at.is_some()
    }
}

/// code -> record
pub type InviteCodes = BTreeMap<String, InviteCodeRecord>;

/// An invite code together with its key, for listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteCode {
    pub code: String,
    pub record: InviteCodeRecord,
}

/// Produce `count` codes of the form `{prefix}{NNN}`, skipping any that already
/// exist. The counter starts at 1 every time, so the result only depends on
/// the existing set.
pub fn sequential_codes<'a, I>(prefix: &str, existing: I, count: usize) -> Result<Vec<String>, InviteError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut taken: BTreeSet<String> = existing.into_iter().cloned().collect();
    let mut codes = Vec::with_capacity(count);
    let mut counter = 1u32;

    while codes.len() < count {
        if counter > MAX_SEQUENTIAL_CODE {
            return Err(InviteError::CodeSpaceExhausted {
                prefix: prefix.to_string(),
                requested: count,
                available: codes.len(),
            });
        }

        let code = format!("{}{:03}", prefix, counter);
        if taken.insert(code.clone()) {
            codes.push(code);
        }
        counter += 1;
    }

    Ok(codes)
}

/// Invite operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InviteError {
    #[error("Invite code has already been used")]
    AlreadyUsed,

    #[error("No free {prefix}NNN codes left: requested {requested}, only {available} available")]
    CodeSpaceExhausted {
        prefix: String,
        requested: usize,
        available: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_unused_is_valid() {
        let record = InviteCodeRecord::new_unused(Timestamp::from_millis(10));
        assert!(record.is_valid().is_ok());
        assert!(record.is_consistent());
        assert_eq!(record.used_by, None);
        assert_eq!(record.used_at, None);
    }

    #[test]
    fn test_redeem_sets_audit_fields() {
        let mut record = InviteCodeRecord::new_unused(Timestamp::from_millis(10));
        record.redeem("bob", Timestamp::from_millis(20));

        assert!(record.used);
        assert_eq!(record.used_by.as_deref(), Some("bob"));
        assert_eq!(record.used_at, Some(Timestamp::from_millis(20)));
        assert_eq!(record.created_at, Timestamp::from_millis(10));
        assert!(record.is_consistent());
        assert_eq!(record.is_valid(), Err(InviteError::AlreadyUsed));
    }

    #[test]
    fn test_wire_shape_uses_nulls() {
        let record = InviteCodeRecord::new_unused(Timestamp::from_millis(0));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "used": false,
                "createdAt": "1970-01-01T00:00:00.000Z",
                "usedBy": null,
                "usedAt": null
            })
        );
    }

    #[test]
    fn test_sequential_codes_from_empty() {
        let existing: Vec<String> = Vec::new();
        let codes = sequential_codes("CHW-", &existing, 3).unwrap();
        assert_eq!(codes, vec!["CHW-001", "CHW-002", "CHW-003"]);
    }

    #[test]
    fn test_sequential_codes_skip_existing() {
        let existing = vec!["CHW-001".to_string(), "CHW-003".to_string()];
        let codes = sequential_codes("CHW-", &existing, 3).unwrap();
        assert_eq!(codes, vec!["CHW-002", "CHW-004", "CHW-005"]);
    }

    #[test]
    fn test_sequential_codes_ignore_other_prefixes() {
        let existing: Vec<String> = SEED_INVITE_CODES.iter().map(|c| c.to_string()).collect();
        let codes = sequential_codes("CHW-", &existing, 1).unwrap();
        assert_eq!(codes, vec!["CHW-001"]);
    }

    #[test]
    fn test_sequential_codes_exhaustion() {
        let existing: Vec<String> = (1..=998).map(|n| format!("X-{:03}", n)).collect();
        let err = sequential_codes("X-", &existing, 2).unwrap_err();
        assert_eq!(
            err,
            InviteError::CodeSpaceExhausted {
                prefix: "X-".to_string(),
                requested: 2,
                available: 1,
            }
        );
    }

    #[test]
    fn test_sequential_codes_zero() {
        let existing: Vec<String> = Vec::new();
        assert!(sequential_codes("CHW-", &existing, 0).unwrap().is_empty());
    }
}
