//! Site announcements

use super::types::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// Creation time in epoch milliseconds, bumped forward on collision
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
}

/// Ordered newest first
pub type Announcements = Vec<Announcement>;
