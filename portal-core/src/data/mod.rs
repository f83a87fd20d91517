//! Data access layer
//!
//! Typed whole-collection accessors over a [`KeyValueStore`]. Every call reads
//! the current value from storage; nothing is cached between calls, so two
//! `DataStore`s over the same storage always agree (last write wins).

use crate::model::{
    sequential_codes, Announcement, Announcements, Clock, InviteCodeRecord, InviteCodes, Role,
    Session, Timestamp, Users,
};
use crate::storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

mod errors;
mod seed;

pub use errors::{StoreError, StoreResult};
pub use seed::{SeedData, SeedReport};

/// Storage key for the user map
pub const USERS_KEY: &str = "users";
/// Storage key for the invite code map
pub const INVITE_CODES_KEY: &str = "inviteCodes";
/// Storage key for the announcement list
pub const ANNOUNCEMENTS_KEY: &str = "announcements";
/// Storage key for the session record
pub const SESSION_KEY: &str = "loggedInUser";

/// Typed accessors over the four portal collections
#[derive(Clone)]
pub struct DataStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl DataStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        DataStore { store, clock }
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn read_json<T: DeserializeOwned>(&self, key: &'static str) -> StoreResult<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => {
                debug!(key, "read");
                serde_json::from_str(&raw)
                    .map(Some)
                    .map_err(|source| StoreError::Corrupted { key, source })
            }
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(&self, key: &'static str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        debug!(key, "write");
        self.store.set(key, &raw)?;
        Ok(())
    }

    pub(crate) fn has_key(&self, key: &'static str) -> StoreResult<bool> {
        Ok(self.store.contains(key)?)
    }

    // Users

    pub fn get_users(&self) -> StoreResult<Users> {
        Ok(self.read_json(USERS_KEY)?.unwrap_or_default())
    }

    pub fn save_users(&self, users: &Users) -> StoreResult<()> {
        self.write_json(USERS_KEY, users)
    }

    // Invite codes

    pub fn get_invite_codes(&self) -> StoreResult<InviteCodes> {
        Ok(self.read_json(INVITE_CODES_KEY)?.unwrap_or_default())
    }

    pub fn save_invite_codes(&self, codes: &InviteCodes) -> StoreResult<()> {
        self.write_json(INVITE_CODES_KEY, codes)
    }

    /// Produce `count` fresh `{prefix}NNN` codes not present in the current
    /// collection. Nothing is persisted.
    pub fn generate_invite_codes(&self, prefix: &str, count: usize) -> StoreResult<Vec<String>> {
        let existing = self.get_invite_codes()?;
        Ok(sequential_codes(prefix, existing.keys(), count)?)
    }

    /// True iff the code exists and has not been used
    pub fn validate_invite_code(&self, code: &str) -> StoreResult<bool> {
        Ok(self
            .get_invite_codes()?
            .get(code)
            .is_some_and(|record| record.is_valid().is_ok()))
    }

    /// Mark `code` as used by `username`. Returns false if the code is unknown.
    pub fn mark_invite_code_as_used(&self, code: &str, username: &str) -> StoreResult<bool> {
        let mut codes = self.get_invite_codes()?;
        let Some(record) = codes.get_mut(code) else {
            return Ok(false);
        };

        record.redeem(username, self.now());
        self.save_invite_codes(&codes)?;
        info!(code, username, "invite code redeemed");
        Ok(true)
    }

    /// Remove `code` regardless of its state. Returns false if it was not there.
    pub fn delete_invite_code(&self, code: &str) -> StoreResult<bool> {
        let mut codes = self.get_invite_codes()?;
        if codes.remove(code).is_none() {
            return Ok(false);
        }

        self.save_invite_codes(&codes)?;
        info!(code, "invite code deleted");
        Ok(true)
    }

    /// Insert each code as a fresh unused record stamped with the current time
    pub fn insert_unused_invite_codes(&self, new_codes: &[String]) -> StoreResult<()> {
        let mut codes = self.get_invite_codes()?;
        let now = self.now();
        for code in new_codes {
            codes.insert(code.clone(), InviteCodeRecord::new_unused(now));
        }
        self.save_invite_codes(&codes)
    }

    // Announcements

    pub fn get_announcements(&self) -> StoreResult<Announcements> {
        Ok(self.read_json(ANNOUNCEMENTS_KEY)?.unwrap_or_default())
    }

    pub fn save_announcements(&self, announcements: &Announcements) -> StoreResult<()> {
        self.write_json(ANNOUNCEMENTS_KEY, announcements)
    }

    /// Create an announcement and put it at the head of the list
    pub fn add_announcement(&self, title: &str, content: &str) -> StoreResult<Announcement> {
        let mut announcements = self.get_announcements()?;
        let created_at = self.now();

        // ids are epoch millis; step past any id already taken in the same millisecond
        let mut id_millis = created_at.as_millis();
        while announcements.iter().any(|a| a.id == id_millis.to_string()) {
            id_millis += 1;
        }

        let announcement = Announcement {
            id: id_millis.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at,
        };

        announcements.insert(0, announcement.clone());
        self.save_announcements(&announcements)?;
        info!(id = %announcement.id, "announcement published");
        Ok(announcement)
    }

    // Session

    pub fn get_session(&self) -> StoreResult<Option<Session>> {
        self.read_json(SESSION_KEY)
    }

    pub fn save_session(&self, username: &str, role: Role) -> StoreResult<Session> {
        let session = Session {
            username: username.to_string(),
            role,
            logged_in_at: self.now(),
        };
        self.write_json(SESSION_KEY, &session)?;
        Ok(session)
    }

    pub fn clear_session(&self) -> StoreResult<()> {
        self.store.remove(SESSION_KEY)?;
        Ok(())
    }
}
