//! Test fixtures
//!
//! Every fixture runs over a `MemoryStore` and a `ManualClock` starting at
//! [`FIXED_START_MILLIS`], so stored timestamps are reproducible.

use crate::config::{Config, StorageBackend};
use crate::model::{ManualClock, Role, Session, Timestamp};
use crate::portal::Portal;
use crate::storage::MemoryStore;
use std::sync::Arc;

/// 2024-01-01T00:00:00.000Z
pub const FIXED_START_MILLIS: i64 = 1_704_067_200_000;

pub fn fixed_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Timestamp::from_millis(FIXED_START_MILLIS)))
}

/// Default config switched to the in-memory backend
pub fn memory_config() -> Config {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Memory;
    config
}

/// Seeded portal with default config
pub fn memory_portal() -> Portal {
    seeded_portal(memory_config()).0
}

/// Seeded portal plus the clock driving it
pub fn seeded_portal(config: Config) -> (Portal, Arc<ManualClock>) {
    let clock = fixed_clock();
    let portal = Portal::with_store(config, Arc::new(MemoryStore::new()), clock.clone())
        .expect("seeding an empty memory store cannot fail");
    (portal, clock)
}

/// Seeded portal with the default admin already logged in
pub fn admin_portal() -> (Portal, Arc<ManualClock>) {
    let (portal, clock) = seeded_portal(memory_config());
    portal
        .auth()
        .login("admin", "admin123")
        .expect("default admin login");
    (portal, clock)
}

pub fn session(username: &str, role: Role) -> Session {
    Session {
        username: username.to_string(),
        role,
        logged_in_at: Timestamp::from_millis(FIXED_START_MILLIS),
    }
}
