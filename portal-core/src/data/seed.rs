//! First-run population of default records

use super::{DataStore, StoreResult, ANNOUNCEMENTS_KEY};
use crate::model::{Announcements, InviteCodeRecord, Role, UserRecord, SEED_INVITE_CODES};
use tracing::info;

/// What to seed on first run
#[derive(Debug, Clone)]
pub struct SeedData {
    pub admin_username: String,
    /// Already encoded with the active password scheme
    pub admin_password: String,
    pub invite_codes: Vec<String>,
}

impl Default for SeedData {
    fn default() -> Self {
        SeedData {
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            invite_codes: SEED_INVITE_CODES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// What a seeding pass actually wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub invite_codes_added: Vec<String>,
    pub announcements_initialized: bool,
}

impl SeedReport {
    pub fn is_noop(&self) -> bool {
        !self.admin_created && self.invite_codes_added.is_empty() && !self.announcements_initialized
    }
}

impl DataStore {
    /// Fill in whatever default records are missing.
    ///
    /// Existing records are never rewritten and a collection is only saved when
    /// something was added to it, so running this repeatedly is a no-op.
    pub fn seed(&self, seed: &SeedData) -> StoreResult<SeedReport> {
        let mut report = SeedReport::default();
        let now = self.now();

        let mut users = self.get_users()?;
        if users.is_empty() {
            users.insert(
                seed.admin_username.clone(),
                UserRecord::new(seed.admin_password.clone(), Role::Admin, now),
            );
            self.save_users(&users)?;
            report.admin_created = true;
        }

        let mut codes = self.get_invite_codes()?;
        for code in &seed.invite_codes {
            if !codes.contains_key(code) {
                codes.insert(code.clone(), InviteCodeRecord::new_unused(now));
                report.invite_codes_added.push(code.clone());
            }
        }
        if !report.invite_codes_added.is_empty() {
            self.save_invite_codes(&codes)?;
        }

        if !self.has_key(ANNOUNCEMENTS_KEY)? {
            self.save_announcements(&Announcements::new())?;
            report.announcements_initialized = true;
        }

        if !report.is_noop() {
            info!(
                admin_created = report.admin_created,
                invite_codes_added = report.invite_codes_added.len(),
                announcements_initialized = report.announcements_initialized,
                "seeded default records"
            );
        }

        Ok(report)
    }
}
