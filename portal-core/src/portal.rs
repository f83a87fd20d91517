//! Portal facade
//!
//! Owns one data layer and hands out the auth and admin services built over
//! it. Opening a portal seeds any missing default records.

use crate::admin::AdminService;
use crate::auth::AuthService;
use crate::config::{Config, StorageBackend};
use crate::data::{DataStore, SeedReport, StoreError};
use crate::error::{PortalError, PortalResult};
use crate::model::{Clock, SystemClock};
use crate::status::StatusProbe;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::view::{self, AnnouncementCard, InviteCodeRow, Notice};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Portal {
    config: Config,
    data: DataStore,
    auth: AuthService,
    admin: AdminService,
}

impl Portal {
    /// Open the store named by `config.storage` and seed it
    pub fn open(config: Config) -> PortalResult<Self> {
        let store: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File => {
                Arc::new(FileStore::new(&config.storage.data_dir).map_err(StoreError::from)?)
            }
        };
        info!(
            backend = ?config.storage.backend,
            data_dir = %config.storage.data_dir.display(),
            "opening portal"
        );
        Self::with_store(config, store, Arc::new(SystemClock))
    }

    /// Build over an existing store and clock, then seed
    pub fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> PortalResult<Self> {
        let portal = Self::unseeded(config, store, clock);
        portal.seed()?;
        Ok(portal)
    }

    /// Build without touching the store
    pub fn unseeded(config: Config, store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let data = DataStore::new(store, clock);
        let auth = AuthService::new(data.clone(), config.auth_policy());
        let admin = AdminService::new(data.clone(), config.admin_policy());
        Portal {
            config,
            data,
            auth,
            admin,
        }
    }

    /// Fill in missing default records. The admin password is encoded with the
    /// configured scheme before it is stored.
    pub fn seed(&self) -> PortalResult<SeedReport> {
        // only read when the user map is empty
        let password = self.seed_admin_password()?.unwrap_or_default();
        Ok(self.data.seed(&self.config.seed_data(password))?)
    }

    /// Encoded seed admin password, or None when accounts already exist
    fn seed_admin_password(&self) -> PortalResult<Option<String>> {
        if !self.data.get_users()?.is_empty() {
            return Ok(None);
        }
        let scheme = self.config.auth.password_scheme;
        Ok(Some(scheme.encode(&self.config.seed.admin_password)?))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data(&self) -> &DataStore {
        &self.data
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn admin(&self) -> &AdminService {
        &self.admin
    }

    pub fn status_probe(&self) -> StatusProbe {
        StatusProbe::new(
            self.config.status.address.clone(),
            self.config.status.timeout,
            self.config.status.fallback.clone(),
        )
    }

    /// Latest announcements for the home page
    pub fn home_announcements(&self) -> PortalResult<Vec<AnnouncementCard>> {
        let list = self.data.get_announcements()?;
        Ok(view::announcement_cards(
            &list,
            self.config.ui.home_announcement_limit,
        ))
    }

    /// Latest announcements for the admin page
    pub fn admin_announcements(&self) -> PortalResult<Vec<AnnouncementCard>> {
        let list = self.data.get_announcements()?;
        Ok(view::announcement_cards(
            &list,
            self.config.ui.admin_announcement_limit,
        ))
    }

    /// Invite code list for the admin page, newest first
    pub fn invite_rows(&self) -> PortalResult<Vec<InviteCodeRow>> {
        Ok(view::invite_code_rows(&self.admin.list_invite_codes()?))
    }

    pub fn error_notice(&self, err: &PortalError) -> Notice {
        Notice::error(err.to_string(), self.config.ui.notice_clear_after)
    }

    pub fn success_notice(&self, message: impl Into<String>) -> Notice {
        Notice::success(message, self.config.ui.notice_clear_after)
    }
}
