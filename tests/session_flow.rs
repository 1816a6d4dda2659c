//! End-to-end session flows over file-backed storage.

use std::time::Duration;

use taskdesk::{seed, AuthError, FileStorage, SessionStore};

fn open(dir: &std::path::Path) -> SessionStore<FileStorage> {
    SessionStore::new(FileStorage::open(dir).unwrap(), seed::directory())
        .with_latency(Duration::ZERO)
}

#[tokio::test]
async fn sign_in_with_seed_credentials_succeeds_and_strips_credential() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());

    let user = session
        .sign_in("nguyenvana@example.com", "password123")
        .await
        .unwrap();
    assert_eq!(user.email, "nguyenvana@example.com");
    assert_eq!(user.id, "1");
    assert_eq!(session.current().unwrap().id, "1");

    let raw = std::fs::read_to_string(dir.path().join("currentUser.json")).unwrap();
    assert!(!raw.contains("password"));
}

#[tokio::test]
async fn sign_in_with_bad_credentials_leaves_session_unset() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());

    let err = session.sign_in("x@x.com", "bad").await.unwrap_err();
    assert!(matches!(err, AuthError::BadCredentials));
    assert!(session.current().is_none());
    assert!(!dir.path().join("currentUser.json").exists());

    // Wrong password for a known email fails the same way.
    let err = session
        .sign_in("nguyenvana@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::BadCredentials));
    assert!(session.current().is_none());
}

#[tokio::test]
async fn register_rejects_claimed_email_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());

    let err = session
        .register("Someone", "nguyenvana@example.com", "hunter2")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::DuplicateEmail));
    assert!(session.current().is_none());

    // The original credential still works, so the directory was untouched.
    session
        .sign_in("nguyenvana@example.com", "password123")
        .await
        .unwrap();
}

#[tokio::test]
async fn register_creates_and_signs_in_a_new_account() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());

    let user = session
        .register("Pham Thi D", "phamthid@example.com", "secret")
        .await
        .unwrap();
    assert_eq!(session.current().unwrap().id, user.id);
    assert!(session.find_user("phamthid@example.com").is_some());

    // The fresh account can sign in again within this process.
    session.sign_out().unwrap();
    session
        .sign_in("phamthid@example.com", "secret")
        .await
        .unwrap();
}

#[tokio::test]
async fn persisted_session_is_restored_by_a_new_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());
    session
        .sign_in("nguyenvana@example.com", "password123")
        .await
        .unwrap();
    drop(session);

    let mut next = open(dir.path());
    let restored = next.restore().unwrap().cloned();
    assert_eq!(restored.unwrap().email, "nguyenvana@example.com");
}

#[tokio::test]
async fn sign_out_clears_memory_and_storage() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(dir.path());
    session
        .sign_in("nguyenvana@example.com", "password123")
        .await
        .unwrap();

    session.sign_out().unwrap();
    assert!(session.current().is_none());
    assert!(!dir.path().join("currentUser.json").exists());

    let mut next = open(dir.path());
    assert!(next.restore().unwrap().is_none());
}

#[tokio::test]
async fn unreadable_persisted_session_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("currentUser.json"), "not json").unwrap();

    let mut session = open(dir.path());
    assert!(session.restore().unwrap().is_none());
    assert!(!dir.path().join("currentUser.json").exists());
}
