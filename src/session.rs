//! Sign-in sessions against the in-memory user directory.
//!
//! The directory is process-lifetime only: accounts created by `register`
//! do not survive a restart. Only the current session itself is persisted,
//! under the `currentUser` key, and restored on startup.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::ids::IdGen;
use crate::seed::DEFAULT_AVATAR;
use crate::storage::{Storage, StorageError};
use crate::user::{User, UserRecord};

/// Storage key for the persisted (credential-stripped) session user.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Simulated network latency for sign-in and registration.
const AUTH_LATENCY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email or password is incorrect")]
    BadCredentials,
    #[error("email is already registered")]
    DuplicateEmail,
    #[error("another sign-in attempt is already in progress")]
    AttemptInProgress,
    #[error("failed to encode session state: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Holds the signed-in user and the directory it was matched against.
///
/// Sign-in and registration are futures with a fixed simulated latency.
/// Exactly one attempt may be in flight at a time: a second call while the
/// guard is held is rejected with [`AuthError::AttemptInProgress`] rather
/// than racing the first. Dropping an in-flight future releases the guard.
pub struct SessionStore<S: Storage> {
    storage: S,
    directory: Vec<UserRecord>,
    current: Option<User>,
    ids: IdGen,
    latency: Duration,
    flight: Arc<tokio::sync::Mutex<()>>,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S, directory: Vec<UserRecord>) -> Self {
        Self {
            storage,
            directory,
            current: None,
            ids: IdGen::new(),
            latency: AUTH_LATENCY,
            flight: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Overrides the simulated latency. Tests use [`Duration::ZERO`].
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The signed-in user, if any.
    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Directory lookup by exact email.
    pub fn find_user(&self, email: &str) -> Option<&User> {
        self.directory
            .iter()
            .find(|r| r.user.email == email)
            .map(|r| &r.user)
    }

    /// Loads a previously persisted session into memory.
    ///
    /// Unreadable session data is logged, removed, and treated as signed
    /// out rather than surfaced as a fatal error.
    pub fn restore(&mut self) -> Result<Option<&User>, StorageError> {
        if let Some(raw) = self.storage.get(CURRENT_USER_KEY)? {
            match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    debug!(user = %user.id, "session restored");
                    self.current = Some(user);
                }
                Err(err) => {
                    warn!("discarding unreadable persisted session: {err}");
                    self.storage.remove(CURRENT_USER_KEY)?;
                }
            }
        }
        Ok(self.current.as_ref())
    }

    /// Signs in with an exact email/password match against the directory.
    ///
    /// On success the session is recorded and persisted; the returned user
    /// carries no credential. On mismatch nothing changes.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let _guard = self
            .flight
            .clone()
            .try_lock_owned()
            .map_err(|_| AuthError::AttemptInProgress)?;
        tokio::time::sleep(self.latency).await;

        let user = self
            .directory
            .iter()
            .find(|r| r.user.email == email && r.password == password)
            .map(|r| r.user.clone())
            .ok_or(AuthError::BadCredentials)?;
        self.set_current(user.clone())?;
        debug!(user = %user.id, "signed in");
        Ok(user)
    }

    /// Creates an account in the in-memory directory and signs it in.
    ///
    /// Fails without side effects when the email is already claimed.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let _guard = self
            .flight
            .clone()
            .try_lock_owned()
            .map_err(|_| AuthError::AttemptInProgress)?;
        tokio::time::sleep(self.latency).await;

        if self.directory.iter().any(|r| r.user.email == email) {
            return Err(AuthError::DuplicateEmail);
        }
        let user = User {
            id: self.ids.next(),
            name: name.to_string(),
            email: email.to_string(),
            avatar: Some(DEFAULT_AVATAR.into()),
        };
        self.directory.push(UserRecord {
            user: user.clone(),
            password: password.to_string(),
        });
        self.set_current(user.clone())?;
        debug!(user = %user.id, "registered");
        Ok(user)
    }

    /// Clears the session from memory and from storage.
    pub fn sign_out(&mut self) -> Result<(), StorageError> {
        self.current = None;
        self.storage.remove(CURRENT_USER_KEY)
    }

    fn set_current(&mut self, user: User) -> Result<(), AuthError> {
        let raw = serde_json::to_string(&user)?;
        self.storage.set(CURRENT_USER_KEY, &raw)?;
        self.current = Some(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::storage::MemoryStorage;
    use tokio::time::sleep;

    fn store() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new(), seed::directory())
            .with_latency(Duration::ZERO)
    }

    #[tokio::test]
    async fn second_attempt_is_rejected_while_one_is_pending() {
        let mut store = store();
        let held = store.flight.clone().try_lock_owned().unwrap();

        let err = store
            .sign_in("nguyenvana@example.com", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AttemptInProgress));
        assert!(store.current().is_none());

        drop(held);
        store
            .sign_in("nguyenvana@example.com", "password123")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn dropping_an_in_flight_attempt_releases_the_guard() {
        let mut store = SessionStore::new(MemoryStorage::new(), seed::directory())
            .with_latency(Duration::from_millis(50));
        {
            let attempt = store.sign_in("nguyenvana@example.com", "password123");
            tokio::pin!(attempt);
            tokio::select! {
                _ = &mut attempt => panic!("attempt should still be sleeping"),
                _ = sleep(Duration::from_millis(5)) => {}
            }
            // `attempt` is dropped here, cancelling the sign-in.
        }
        let mut store = store.with_latency(Duration::ZERO);
        store
            .sign_in("nguyenvana@example.com", "password123")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn persisted_session_carries_no_credential() {
        let mut store = store();
        store
            .sign_in("nguyenvana@example.com", "password123")
            .await
            .unwrap();
        let raw = store.storage.get(CURRENT_USER_KEY).unwrap().unwrap();
        assert!(!raw.contains("password"));
        assert!(raw.contains("nguyenvana@example.com"));
    }
}
