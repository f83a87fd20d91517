//! Record types persisted in the key-value store

pub mod announcement;
pub mod invite;
pub mod session;
pub mod types;
pub mod user;

pub use announcement::{Announcement, Announcements};
pub use invite::{
    sequential_codes, InviteCode, InviteCodeRecord, InviteCodes, InviteError, DEFAULT_CODE_PREFIX,
    MAX_SEQUENTIAL_CODE, SEED_INVITE_CODES,
};
pub use session::Session;
pub use types::{Clock, ManualClock, Role, SystemClock, Timestamp};
pub use user::{UserRecord, Users};
