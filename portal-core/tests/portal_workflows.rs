/*
    portal_workflows.rs - End-to-end flows over the file-backed store

    Each test opens a portal on a temporary data directory, the way the CLI
    does, and checks what ends up on disk as well as what the services report.
*/

use portal_core::auth::{GuardDecision, Redirect, Route, ADMIN_DENIED_MESSAGE};
use portal_core::config::{Config, StorageBackend};
use portal_core::model::{ManualClock, Role, Timestamp};
use portal_core::storage::FileStore;
use portal_core::{Portal, PortalError};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const START: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

fn file_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::File;
    config.storage.data_dir = dir.to_path_buf();
    config
}

fn open_at(dir: &Path, clock: Arc<ManualClock>) -> Portal {
    let store = Arc::new(FileStore::new(dir).unwrap());
    Portal::with_store(file_config(dir), store, clock).unwrap()
}

fn read_json(dir: &Path, key: &str) -> serde_json::Value {
    let raw = std::fs::read_to_string(dir.join(format!("{}.json", key))).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_fresh_store_is_seeded_on_disk() {
    let temp_dir = tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(START)));
    open_at(temp_dir.path(), clock);

    let users = read_json(temp_dir.path(), "users");
    assert_eq!(users["admin"]["password"], "admin123");
    assert_eq!(users["admin"]["role"], "admin");
    assert_eq!(users["admin"]["createdAt"], "2024-01-01T00:00:00.000Z");

    let codes = read_json(temp_dir.path(), "inviteCodes");
    for code in ["CHW2024", "SERVER2024", "WELCOME24", "CHWINVITE", "ADMINCODE", "CHW001"] {
        assert_eq!(codes[code]["used"], false, "{} should be unused", code);
        assert!(codes[code]["usedBy"].is_null());
    }

    assert_eq!(read_json(temp_dir.path(), "announcements"), serde_json::json!([]));
    assert!(!temp_dir.path().join("loggedInUser.json").exists());
}

#[test]
fn test_seeding_twice_is_byte_identical() {
    let temp_dir = tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(START)));
    open_at(temp_dir.path(), clock.clone());

    let snapshot = |key: &str| std::fs::read(temp_dir.path().join(format!("{}.json", key))).unwrap();
    let before: Vec<Vec<u8>> = ["users", "inviteCodes", "announcements"]
        .iter()
        .map(|k| snapshot(*k))
        .collect();

    clock.advance_millis(60_000);
    open_at(temp_dir.path(), clock);

    let after: Vec<Vec<u8>> = ["users", "inviteCodes", "announcements"]
        .iter()
        .map(|k| snapshot(*k))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_register_with_invite_then_login() {
    let temp_dir = tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(START)));
    let portal = open_at(temp_dir.path(), clock.clone());

    clock.advance_millis(5_000);
    let outcome = portal
        .auth()
        .register("steve", "diamond", Some("WELCOME24"))
        .unwrap();
    assert_eq!(outcome.redirect, Redirect::delayed(Route::Login, Duration::from_secs(2)));
    assert!(portal.auth().current_session().unwrap().is_none());

    let codes = read_json(temp_dir.path(), "inviteCodes");
    assert_eq!(codes["WELCOME24"]["used"], true);
    assert_eq!(codes["WELCOME24"]["usedBy"], "steve");
    assert_eq!(codes["WELCOME24"]["usedAt"], "2024-01-01T00:00:05.000Z");
    assert_eq!(codes["WELCOME24"]["createdAt"], "2024-01-01T00:00:00.000Z");
    assert_eq!(codes["CHW2024"]["used"], false);

    // a second process sees the account and the session it creates
    let reopened = open_at(temp_dir.path(), clock);
    let login = reopened.auth().login("steve", "diamond").unwrap();
    assert_eq!(login.landing, Route::Home);
    assert_eq!(login.session.role, Role::User);
    assert_eq!(read_json(temp_dir.path(), "loggedInUser")["username"], "steve");

    assert_eq!(
        portal.auth().guard(Route::Admin).unwrap(),
        GuardDecision::Deny {
            message: ADMIN_DENIED_MESSAGE.to_string(),
            redirect: Redirect::delayed(Route::Login, Duration::from_secs(2)),
        }
    );
}

#[test]
fn test_redeemed_code_cannot_be_reused() {
    let temp_dir = tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(START)));
    let portal = open_at(temp_dir.path(), clock);

    portal.auth().register("alex", "secret1", Some("CHW001")).unwrap();
    let err = portal
        .auth()
        .register("blair", "secret2", Some("CHW001"))
        .unwrap_err();
    assert!(matches!(err, PortalError::InvalidInvite(code) if code == "CHW001"));
    assert!(!portal.data().get_users().unwrap().contains_key("blair"));
    assert_eq!(
        portal.data().get_invite_codes().unwrap()["CHW001"].used_by.as_deref(),
        Some("alex")
    );
}

#[test]
fn test_admin_session_survives_reopen() {
    let temp_dir = tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(START)));
    open_at(temp_dir.path(), clock.clone())
        .auth()
        .login("admin", "admin123")
        .unwrap();

    let portal = open_at(temp_dir.path(), clock.clone());
    assert!(portal.auth().is_admin().unwrap());
    assert_eq!(portal.auth().guard(Route::Admin).unwrap(), GuardDecision::Allow);

    let codes = portal.admin().generate_invite_codes(3).unwrap();
    assert_eq!(codes, vec!["CHW-001", "CHW-002", "CHW-003"]);
    clock.advance_millis(1_000);
    portal.admin().publish_announcement("Patch notes", "1.20 is live").unwrap();

    let reopened = open_at(temp_dir.path(), clock);
    let rows = reopened.invite_rows().unwrap();
    assert_eq!(rows.len(), 9);
    assert_eq!(reopened.home_announcements().unwrap()[0].title, "Patch notes");

    assert_eq!(reopened.auth().logout().unwrap(), Redirect::immediate(Route::Login));
    assert!(!temp_dir.path().join("loggedInUser.json").exists());
    assert_eq!(
        portal.auth().guard(Route::Admin).unwrap(),
        GuardDecision::Redirect(Redirect::immediate(Route::Login))
    );
}

#[test]
fn test_open_creates_data_dir() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("nested").join("portal");

    let portal = Portal::open(file_config(&data_dir)).unwrap();
    assert!(data_dir.join("users.json").exists());
    assert!(portal.auth().login("admin", "admin123").is_ok());
}

#[test]
fn test_corrupted_collection_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(START)));
    let portal = open_at(temp_dir.path(), clock);

    std::fs::write(temp_dir.path().join("users.json"), "{not json").unwrap();
    let err = portal.auth().login("admin", "admin123").unwrap_err();
    assert!(err.is_fatal());
    assert!(portal.auth().current_session().unwrap().is_none());
}
