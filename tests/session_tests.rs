use maduve_client::domain::{AccountType, LoginResponse, UserStatus};
use maduve_client::Session;
use tempfile::TempDir;

fn member_login() -> LoginResponse {
    LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        user_id: Some("u1".to_string()),
        user_type: None,
        user_name: Some("Anna Joseph".to_string()),
        status: Some(UserStatus::Active),
    }
}

#[test]
fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let mut session = Session::empty(&path);
    session.start(&member_login(), AccountType::User).unwrap();
    assert!(path.exists());

    let restored = Session::restore(&path).unwrap();
    let current = restored.current().unwrap();
    assert_eq!(current.user.id, "u1");
    assert_eq!(current.user.full_name, "Anna Joseph");
    assert_eq!(current.user_type, AccountType::User);
    assert_eq!(current.user.status, Some(UserStatus::Active));
}

#[test]
fn test_corrupt_session_file_is_discarded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let session = Session::restore(&path).unwrap();

    assert!(!session.is_logged_in());
    assert!(!path.exists());
}

#[test]
fn test_logout_removes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let mut session = Session::empty(&path);
    session.start(&member_login(), AccountType::User).unwrap();

    session.logout().unwrap();
    assert!(!path.exists());
    assert!(Session::restore(&path).unwrap().current().is_none());

    // logging out twice is harmless
    session.logout().unwrap();
}

#[test]
fn test_display_name_change_is_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let mut session = Session::empty(&path);
    session.start(&member_login(), AccountType::User).unwrap();

    session.update_display_name("Anna Mathew").unwrap();

    let restored = Session::restore(&path).unwrap();
    assert_eq!(restored.current().unwrap().user.full_name, "Anna Mathew");
}
