//! Login, registration, logout and route guarding
//!
//! The session moves between three states: anonymous (no `loggedInUser`
//! record), user and admin. [`AuthService::login`] and
//! [`AuthService::logout`] are the only transitions; registration creates an
//! account but leaves the session alone.

use crate::data::DataStore;
use crate::error::{PortalError, PortalResult};
use crate::metrics;
use crate::model::{Role, Session, UserRecord};
use std::time::Duration;
use tracing::{info, warn};

pub mod guard;
pub mod password;

pub use guard::{evaluate, GuardDecision, Redirect, Requirement, Route, ADMIN_DENIED_MESSAGE};
pub use password::PasswordScheme;

/// Input rules and timings for the auth flows
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    pub username_min_len: usize,
    pub username_max_len: usize,
    pub password_min_len: usize,
    pub password_scheme: PasswordScheme,
    /// Delay before leaving the register page after success
    pub register_redirect_delay: Duration,
    /// Delay before leaving a page the user may not see
    pub denied_redirect_delay: Duration,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        AuthPolicy {
            username_min_len: 3,
            username_max_len: 20,
            password_min_len: 6,
            password_scheme: PasswordScheme::Plaintext,
            register_redirect_delay: Duration::from_secs(2),
            denied_redirect_delay: Duration::from_secs(2),
        }
    }
}

/// Successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub session: Session,
    pub landing: Route,
}

/// Successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterOutcome {
    pub username: String,
    /// Invite code redeemed by this registration, if any
    pub invite_code: Option<String>,
    pub message: String,
    pub redirect: Redirect,
}

/// Auth flows over the data layer
#[derive(Clone)]
pub struct AuthService {
    data: DataStore,
    policy: AuthPolicy,
}

impl AuthService {
    pub fn new(data: DataStore, policy: AuthPolicy) -> Self {
        AuthService { data, policy }
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    /// Log in with username and password.
    ///
    /// The username is trimmed; the password is compared as given.
    pub fn login(&self, username: &str, password: &str) -> PortalResult<LoginOutcome> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(PortalError::Validation(
                "Please enter username and password!".to_string(),
            ));
        }

        let users = self.data.get_users()?;
        let user = match users.get(username) {
            Some(user) if self.policy.password_scheme.verify(password, &user.password) => user,
            _ => {
                warn!(username, "login rejected");
                metrics::record_counter(metrics::LOGIN_FAILED, 1);
                return Err(PortalError::Credential);
            }
        };

        let session = self.data.save_session(username, user.role)?;
        let landing = Route::landing_for(user.role);
        info!(username, role = %user.role, "logged in");
        metrics::record_counter(metrics::LOGIN_SUCCESS, 1);

        Ok(LoginOutcome { session, landing })
    }

    /// Create a regular user account, optionally redeeming an invite code.
    ///
    /// A blank invite code counts as none. Registration never grants admin.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        invite_code: Option<&str>,
    ) -> PortalResult<RegisterOutcome> {
        let result = self.try_register(username, password, invite_code);
        match &result {
            Ok(_) => metrics::record_counter(metrics::REGISTER_SUCCESS, 1),
            Err(e) => {
                warn!(username = username.trim(), error = %e, "registration rejected");
                metrics::record_counter(metrics::REGISTER_FAILED, 1);
            }
        }
        result
    }

    fn try_register(
        &self,
        username: &str,
        password: &str,
        invite_code: Option<&str>,
    ) -> PortalResult<RegisterOutcome> {
        let username = username.trim();
        let invite_code = invite_code.map(str::trim).filter(|c| !c.is_empty());

        self.validate_registration(username, password)?;

        let mut users = self.data.get_users()?;
        if users.contains_key(username) {
            return Err(PortalError::Conflict(username.to_string()));
        }

        if let Some(code) = invite_code {
            if !self.data.validate_invite_code(code)? {
                return Err(PortalError::InvalidInvite(code.to_string()));
            }
        }

        let stored_password = self.policy.password_scheme.encode(password)?;
        users.insert(
            username.to_string(),
            UserRecord::new(stored_password, Role::User, self.data.now()),
        );
        self.data.save_users(&users)?;

        let mut redeemed = None;
        if let Some(code) = invite_code {
            if self.data.mark_invite_code_as_used(code, username)? {
                metrics::record_counter(metrics::INVITES_REDEEMED, 1);
                redeemed = Some(code.to_string());
            } else {
                warn!(username, code, "invite code vanished before it could be redeemed");
            }
        }

        info!(username, invite_code = redeemed.as_deref().unwrap_or("-"), "registered");

        Ok(RegisterOutcome {
            username: username.to_string(),
            invite_code: redeemed,
            message: "Registration successful! Redirecting to login...".to_string(),
            redirect: Redirect::delayed(Route::Login, self.policy.register_redirect_delay),
        })
    }

    fn validate_registration(&self, username: &str, password: &str) -> PortalResult<()> {
        if username.is_empty() || password.is_empty() {
            return Err(PortalError::Validation(
                "Please enter username and password!".to_string(),
            ));
        }

        let len = username.chars().count();
        if len < self.policy.username_min_len || len > self.policy.username_max_len {
            return Err(PortalError::Validation(format!(
                "Username must be between {} and {} characters!",
                self.policy.username_min_len, self.policy.username_max_len
            )));
        }

        if password.chars().count() < self.policy.password_min_len {
            return Err(PortalError::Validation(format!(
                "Password must be at least {} characters!",
                self.policy.password_min_len
            )));
        }

        Ok(())
    }

    /// Clear the session, whether or not one exists
    pub fn logout(&self) -> PortalResult<Redirect> {
        let previous = self.data.get_session().ok().flatten();
        self.data.clear_session()?;
        if let Some(session) = previous {
            info!(username = %session.username, "logged out");
        }
        Ok(Redirect::immediate(Route::Login))
    }

    pub fn current_session(&self) -> PortalResult<Option<Session>> {
        Ok(self.data.get_session()?)
    }

    pub fn is_logged_in(&self) -> PortalResult<bool> {
        Ok(self.current_session()?.is_some())
    }

    pub fn is_admin(&self) -> PortalResult<bool> {
        Ok(self.current_session()?.is_some_and(|s| s.is_admin()))
    }

    /// Guard `route` against the current session
    pub fn guard(&self, route: Route) -> PortalResult<GuardDecision> {
        let session = self.current_session()?;
        Ok(evaluate(
            route,
            session.as_ref(),
            self.policy.denied_redirect_delay,
        ))
    }
}
