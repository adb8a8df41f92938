//! Session lifecycle across process restarts, using a file-backed store.

use qist_core::{
    admin::Admin,
    config::{AdminConfig, SessionConfig},
    error::ErrorClass,
    model::product::Product,
    session::{FileStorage, Session, storage_for},
};

fn config_at(path: &std::path::Path) -> AdminConfig {
    AdminConfig {
        session: SessionConfig {
            path: Some(path.to_path_buf()),
            ..SessionConfig::default()
        },
        ..AdminConfig::default()
    }
}

#[test]
fn login_survives_a_restart_and_logout_clears_it() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(&dir.path().join("session.json"));

    {
        let mut admin = Admin::seeded(config.clone(), storage_for(&config.session)).unwrap();
        assert!(admin.session().current_user().is_none());
        assert!(admin.session_mut().login("nora", "pw").unwrap());
    }

    let mut admin = Admin::seeded(config.clone(), storage_for(&config.session)).unwrap();
    let user = admin.session().current_user().unwrap();
    assert_eq!(user.name, "Nora");
    assert_eq!(user.email, "nora@easyqist.com");

    admin.session_mut().logout().unwrap();

    let admin = Admin::new(config.clone(), storage_for(&config.session)).unwrap();
    assert!(admin.session().current_user().is_none());
    assert!(admin.store::<Product>().is_empty());
}

#[test]
fn corrupt_session_record_starts_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"admin_user":"not a user"}"#).unwrap();

    let session = Session::hydrate(FileStorage::new(&path), &SessionConfig::default()).unwrap();

    assert!(session.current_user().is_none());
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains("admin_user"));
}

#[test]
fn unreadable_storage_file_surfaces_as_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "[]").unwrap();
    let config = config_at(&path);

    let err = Admin::seeded(config.clone(), storage_for(&config.session))
        .err()
        .unwrap();

    assert_eq!(err.class, ErrorClass::Internal);
}
