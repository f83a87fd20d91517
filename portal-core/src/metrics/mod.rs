//! Metrics for observability
//!
//! Counters are recorded through the `metrics` facade; without an installed
//! recorder they are no-ops.

use metrics::{counter, describe_counter};

pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const REGISTER_SUCCESS: &str = "auth.register.success";
pub const REGISTER_FAILED: &str = "auth.register.failed";
pub const INVITES_GENERATED: &str = "invites.generated";
pub const INVITES_DELETED: &str = "invites.deleted";
pub const INVITES_REDEEMED: &str = "invites.redeemed";
pub const ANNOUNCEMENTS_PUBLISHED: &str = "announcements.published";

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!(LOGIN_SUCCESS, "Successful logins");
    describe_counter!(LOGIN_FAILED, "Rejected login attempts");
    describe_counter!(REGISTER_SUCCESS, "Accounts created");
    describe_counter!(REGISTER_FAILED, "Rejected registrations");
    describe_counter!(INVITES_GENERATED, "Invite codes generated by admins");
    describe_counter!(INVITES_DELETED, "Unused invite codes deleted");
    describe_counter!(INVITES_REDEEMED, "Invite codes redeemed at registration");
    describe_counter!(ANNOUNCEMENTS_PUBLISHED, "Announcements published");
}

/// Record a counter metric
pub fn record_counter(name: &'static str, value: u64) {
    counter!(name).increment(value);
}
