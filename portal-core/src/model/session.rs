//! The logged-in actor

use super::types::{Role, Timestamp};
use serde::{Deserialize, Serialize};

/// Singleton session record stored under `loggedInUser`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,

    /// Role captured at login; not resynced afterwards
    pub role: Role,

    pub logged_in_at: Timestamp,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
