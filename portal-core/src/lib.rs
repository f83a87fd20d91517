//! Core of the community portal: accounts, sessions, invite codes and
//! announcements persisted as JSON documents in a key-value store.

pub mod admin;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod portal;
pub mod status;
pub mod storage;
pub mod view;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::Config;
pub use error::{PortalError, PortalResult};
pub use logging::{init_logging, LogLevel};
pub use portal::Portal;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Ensure the main exports are accessible
        let _ = LogLevel::Info;
        let _ = Config::default();
    }
}
