//! Route guarding
//!
//! Pages are identified by [`Route`]; the guard turns "which page is being
//! opened" plus "who is logged in" into a [`GuardDecision`]. Performing the
//! navigation is left to the presentation layer.

use crate::model::{Role, Session};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Message shown to a logged-in non-admin opening the admin page
pub const ADMIN_DENIED_MESSAGE: &str = "You do not have admin permission!";

/// Pages of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Home,
    Login,
    Register,
    Admin,
}

/// Identity a route expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone
    Public,
    /// Only visitors without a session
    Anonymous,
    /// A session with the admin role
    Admin,
}

impl Route {
    pub fn requirement(&self) -> Requirement {
        match self {
            Route::Home => Requirement::Public,
            Route::Login | Route::Register => Requirement::Anonymous,
            Route::Admin => Requirement::Admin,
        }
    }

    /// Where a freshly logged-in user of `role` lands
    pub fn landing_for(role: Role) -> Route {
        match role {
            Role::Admin => Route::Admin,
            Role::User => Route::Home,
        }
    }

    pub fn page(&self) -> &'static str {
        match self {
            Route::Home => "index.html",
            Route::Login => "login.html",
            Route::Register => "register.html",
            Route::Admin => "admin.html",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Login => "login",
            Route::Register => "register",
            Route::Admin => "admin",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" | "index" | "index.html" | "/" => Ok(Route::Home),
            "login" | "login.html" => Ok(Route::Login),
            "register" | "register.html" => Ok(Route::Register),
            "admin" | "admin.html" => Ok(Route::Admin),
            other => Err(format!("unknown route: {}", other)),
        }
    }
}

/// Navigation request, possibly delayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    pub after: Duration,
}

impl Redirect {
    pub fn immediate(to: Route) -> Self {
        Redirect {
            to,
            after: Duration::ZERO,
        }
    }

    pub fn delayed(to: Route, after: Duration) -> Self {
        Redirect { to, after }
    }
}

/// Outcome of guarding a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the page
    Allow,
    /// Leave without rendering
    Redirect(Redirect),
    /// Show `message`, then follow `redirect`
    Deny { message: String, redirect: Redirect },
}

/// Decide what happens when `route` is opened with `session`
pub fn evaluate(route: Route, session: Option<&Session>, deny_delay: Duration) -> GuardDecision {
    match (route.requirement(), session) {
        (Requirement::Admin, None) => GuardDecision::Redirect(Redirect::immediate(Route::Login)),
        (Requirement::Admin, Some(s)) if !s.is_admin() => GuardDecision::Deny {
            message: ADMIN_DENIED_MESSAGE.to_string(),
            redirect: Redirect::delayed(Route::Login, deny_delay),
        },
        (Requirement::Anonymous, Some(s)) => {
            GuardDecision::Redirect(Redirect::immediate(Route::landing_for(s.role)))
        }
        _ => GuardDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Timestamp;

    const DELAY: Duration = Duration::from_secs(2);

    fn session(role: Role) -> Session {
        Session {
            username: "someone".to_string(),
            role,
            logged_in_at: Timestamp::from_millis(0),
        }
    }

    #[test]
    fn test_admin_route_without_session() {
        assert_eq!(
            evaluate(Route::Admin, None, DELAY),
            GuardDecision::Redirect(Redirect::immediate(Route::Login))
        );
    }

    #[test]
    fn test_admin_route_as_user_is_denied() {
        let decision = evaluate(Route::Admin, Some(&session(Role::User)), DELAY);
        assert_eq!(
            decision,
            GuardDecision::Deny {
                message: ADMIN_DENIED_MESSAGE.to_string(),
                redirect: Redirect::delayed(Route::Login, DELAY),
            }
        );
    }

    #[test]
    fn test_admin_route_as_admin() {
        assert_eq!(
            evaluate(Route::Admin, Some(&session(Role::Admin)), DELAY),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_entry_pages_bounce_logged_in_users() {
        for route in [Route::Login, Route::Register] {
            assert_eq!(
                evaluate(route, Some(&session(Role::Admin)), DELAY),
                GuardDecision::Redirect(Redirect::immediate(Route::Admin))
            );
            assert_eq!(
                evaluate(route, Some(&session(Role::User)), DELAY),
                GuardDecision::Redirect(Redirect::immediate(Route::Home))
            );
            assert_eq!(evaluate(route, None, DELAY), GuardDecision::Allow);
        }
    }

    #[test]
    fn test_home_is_public() {
        assert_eq!(evaluate(Route::Home, None, DELAY), GuardDecision::Allow);
        assert_eq!(
            evaluate(Route::Home, Some(&session(Role::User)), DELAY),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_route_parse() {
        assert_eq!("admin.html".parse::<Route>(), Ok(Route::Admin));
        assert_eq!("Login".parse::<Route>(), Ok(Route::Login));
        assert_eq!("/".parse::<Route>(), Ok(Route::Home));
        assert!("settings".parse::<Route>().is_err());
        assert_eq!(Route::Register.page(), "register.html");
    }
}
