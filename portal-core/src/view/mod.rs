//! View models
//!
//! Pure projections from collections to render-ready structures. Nothing
//! here touches storage; callers pass in what they read.

use crate::auth::Route;
use crate::model::{Announcement, InviteCode, Session};
use serde::Serialize;
use std::time::Duration;

/// Shown when there are no announcements
pub const NO_ANNOUNCEMENTS: &str = "No announcements yet";
/// Shown when there are no invite codes
pub const NO_INVITE_CODES: &str = "No invite codes yet. Generate some new ones.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Error,
    Success,
}

/// Transient inline message that disappears after `clear_after`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    #[serde(with = "humantime_serde")]
    pub clear_after: Duration,
}

impl Notice {
    pub fn error(message: impl Into<String>, clear_after: Duration) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
            clear_after,
        }
    }

    pub fn success(message: impl Into<String>, clear_after: Duration) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.into(),
            clear_after,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Unused,
    Used,
}

impl InviteStatus {
    pub fn label(&self) -> &'static str {
        match self {
            InviteStatus::Unused => "Unused",
            InviteStatus::Used => "Used",
        }
    }
}

/// One line of the admin invite code list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteCodeRow {
    pub code: String,
    pub status: InviteStatus,
    /// Only unused codes offer a delete action
    pub deletable: bool,
    /// `Used by: <name> (<time>)` for used codes
    pub used_info: Option<String>,
}

/// Rows for the admin invite list, in the order given
pub fn invite_code_rows(codes: &[InviteCode]) -> Vec<InviteCodeRow> {
    codes
        .iter()
        .map(|c| {
            let used_info = match (&c.record.used_by, &c.record.used_at) {
                (Some(by), Some(at)) => Some(format!("Used by: {} ({})", by, at.datetime_string())),
                _ => None,
            };
            InviteCodeRow {
                code: c.code.clone(),
                status: if c.record.used {
                    InviteStatus::Used
                } else {
                    InviteStatus::Unused
                },
                deletable: !c.record.used,
                used_info,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnouncementCard {
    pub title: String,
    pub content: String,
    /// `YYYY-MM-DD HH:MM:SS` (UTC)
    pub date: String,
}

/// The first `limit` announcements as cards
pub fn announcement_cards(announcements: &[Announcement], limit: usize) -> Vec<AnnouncementCard> {
    announcements
        .iter()
        .take(limit)
        .map(|a| AnnouncementCard {
            title: a.title.clone(),
            content: a.content.clone(),
            date: a.created_at.datetime_string(),
        })
        .collect()
}

/// What clicking the taskbar login button does
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ButtonAction {
    Navigate { route: Route },
    /// Stay on the page and show a message
    Notify { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskbarButton {
    pub label: String,
    pub action: ButtonAction,
}

/// Login button for the home page taskbar
pub fn taskbar_button(session: Option<&Session>) -> TaskbarButton {
    match session {
        None => TaskbarButton {
            label: "Login".to_string(),
            action: ButtonAction::Navigate { route: Route::Login },
        },
        Some(s) if s.is_admin() => TaskbarButton {
            label: format!("{} (Admin)", s.username),
            action: ButtonAction::Navigate { route: Route::Admin },
        },
        Some(s) => TaskbarButton {
            label: s.username.clone(),
            action: ButtonAction::Notify {
                message: format!(
                    "Hello, {}! You do not currently have admin permission.",
                    s.username
                ),
            },
        },
    }
}

/// Greeting at the top of the admin page
pub fn admin_welcome(session: Option<&Session>) -> Option<String> {
    session
        .filter(|s| s.is_admin())
        .map(|s| format!("Welcome back, admin {}!", s.username))
}
