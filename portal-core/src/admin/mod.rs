//! Admin operations: invite code management and announcement publishing
//!
//! Every operation re-checks that the stored session belongs to an admin,
//! even though the route guard has already kept non-admins off the page.

use crate::data::DataStore;
use crate::error::{PortalError, PortalResult};
use crate::metrics;
use crate::model::{Announcement, InviteCode, Session, DEFAULT_CODE_PREFIX};
use tracing::{info, warn};

/// Limits for admin operations
#[derive(Debug, Clone)]
pub struct AdminPolicy {
    /// Prefix for generated codes
    pub code_prefix: String,
    /// Most codes a single generate request may ask for
    pub max_batch: usize,
}

impl Default for AdminPolicy {
    fn default() -> Self {
        AdminPolicy {
            code_prefix: DEFAULT_CODE_PREFIX.to_string(),
            max_batch: 10,
        }
    }
}

#[derive(Clone)]
pub struct AdminService {
    data: DataStore,
    policy: AdminPolicy,
}

impl AdminService {
    pub fn new(data: DataStore, policy: AdminPolicy) -> Self {
        AdminService { data, policy }
    }

    pub fn policy(&self) -> &AdminPolicy {
        &self.policy
    }

    fn require_admin(&self) -> PortalResult<Session> {
        match self.data.get_session()? {
            Some(session) if session.is_admin() => Ok(session),
            Some(session) => {
                warn!(username = %session.username, "admin operation refused");
                Err(PortalError::Unauthorized(
                    "admin role required".to_string(),
                ))
            }
            None => Err(PortalError::Unauthorized("not logged in".to_string())),
        }
    }

    /// Generate `count` sequential codes and store them as unused
    pub fn generate_invite_codes(&self, count: usize) -> PortalResult<Vec<String>> {
        let admin = self.require_admin()?;

        if count < 1 || count > self.policy.max_batch {
            return Err(PortalError::Validation(format!(
                "Please enter a number between 1 and {}!",
                self.policy.max_batch
            )));
        }

        let codes = self
            .data
            .generate_invite_codes(&self.policy.code_prefix, count)?;
        self.data.insert_unused_invite_codes(&codes)?;

        info!(admin = %admin.username, count, first = %codes[0], "generated invite codes");
        metrics::record_counter(metrics::INVITES_GENERATED, codes.len() as u64);
        Ok(codes)
    }

    /// All invite codes, newest first. Codes created in the same millisecond
    /// keep code order.
    pub fn list_invite_codes(&self) -> PortalResult<Vec<InviteCode>> {
        self.require_admin()?;

        let mut codes: Vec<InviteCode> = self
            .data
            .get_invite_codes()?
            .into_iter()
            .map(|(code, record)| InviteCode { code, record })
            .collect();
        codes.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at));
        Ok(codes)
    }

    /// Delete an unused code. Used codes are permanent.
    pub fn delete_invite_code(&self, code: &str) -> PortalResult<()> {
        let admin = self.require_admin()?;

        let codes = self.data.get_invite_codes()?;
        match codes.get(code) {
            None => return Err(PortalError::NotFound(format!("invite code {}", code))),
            Some(record) if record.used => {
                warn!(code, "refusing to delete used invite code");
                return Err(PortalError::InviteLocked(code.to_string()));
            }
            Some(_) => {}
        }

        if !self.data.delete_invite_code(code)? {
            return Err(PortalError::NotFound(format!("invite code {}", code)));
        }

        info!(admin = %admin.username, code, "deleted invite code");
        metrics::record_counter(metrics::INVITES_DELETED, 1);
        Ok(())
    }

    /// Publish an announcement. Title and content are trimmed and must not be empty.
    pub fn publish_announcement(&self, title: &str, content: &str) -> PortalResult<Announcement> {
        let admin = self.require_admin()?;

        let (title, content) = (title.trim(), content.trim());
        if title.is_empty() || content.is_empty() {
            return Err(PortalError::Validation(
                "Please fill in the announcement title and content!".to_string(),
            ));
        }

        let announcement = self.data.add_announcement(title, content)?;
        info!(admin = %admin.username, id = %announcement.id, "published announcement");
        metrics::record_counter(metrics::ANNOUNCEMENTS_PUBLISHED, 1);
        Ok(announcement)
    }
}
