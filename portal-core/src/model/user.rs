//! User accounts

use super::types::{Role, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored account. The username is the collection key and is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Stored password, plaintext or a PHC hash depending on the password scheme
    pub password: String,

    pub role: Role,

    pub created_at: Timestamp,
}

impl UserRecord {
    pub fn new(password: String, role: Role, created_at: Timestamp) -> Self {
        UserRecord {
            password,
            role,
            created_at,
        }
    }
}

/// username -> account
pub type Users = BTreeMap<String, UserRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_wire_shape() {
        let record = UserRecord::new(
            "admin123".to_string(),
            Role::Admin,
            Timestamp::from_millis(0),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "password": "admin123",
                "role": "admin",
                "createdAt": "1970-01-01T00:00:00.000Z"
            })
        );
    }
}
