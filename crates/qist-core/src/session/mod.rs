//! The signed-in administrator and where it is persisted.

mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, storage_for};

use crate::{config::SessionConfig, model::user::User};
use std::io;
use thiserror::Error as ThisError;
use tracing::{info, warn};

///
/// SessionError
///

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("session storage: {0}")]
    Io(#[from] io::Error),

    #[error("session storage holds invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no user is logged in")]
    NotLoggedIn,

    #[error("please fill all password fields")]
    MissingPasswordFields,

    #[error("new passwords do not match")]
    PasswordMismatch,

    #[error("new password must differ from the old one")]
    PasswordRejected,
}

///
/// Session
///
/// Holds at most one `User`. Every change is written through to the
/// storage backend under `storage_key`.
///

#[derive(Debug)]
pub struct Session<S: SessionStorage> {
    storage: S,
    storage_key: String,
    email_domain: String,
    user: Option<User>,
}

impl<S: SessionStorage> Session<S> {
    /// Restore the persisted user, if any.
    ///
    /// A stored value that does not decode as a user is discarded and the
    /// session starts logged out.
    pub fn hydrate(mut storage: S, config: &SessionConfig) -> Result<Self, SessionError> {
        let key = config.storage_key.clone();

        let user = match storage.get(&key)? {
            None => None,
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(key = %key, error = %err, "discarding unreadable session user");
                    storage.remove(&key)?;
                    None
                }
            },
        };

        Ok(Self {
            storage,
            storage_key: key,
            email_domain: config.email_domain.clone(),
            user,
        })
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Accept any non-empty credentials.
    ///
    /// Returns `Ok(false)` without touching state when either value is
    /// empty. The username is stored as typed.
    pub fn login(&mut self, username: &str, password: &str) -> Result<bool, SessionError> {
        if username.is_empty() || password.is_empty() {
            return Ok(false);
        }

        let user = User::for_username(username, &self.email_domain);
        self.persist(&user)?;
        info!(username = %user.username, "logged in");
        self.user = Some(user);

        Ok(true)
    }

    /// Clear the user both in memory and in storage.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.storage.remove(&self.storage_key)?;
        if let Some(user) = self.user.take() {
            info!(username = %user.username, "logged out");
        }

        Ok(())
    }

    /// Check a password change request. Nothing is stored.
    pub fn update_password(
        &self,
        old: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), SessionError> {
        if old.is_empty() || new.is_empty() || confirm.is_empty() {
            return Err(SessionError::MissingPasswordFields);
        }
        if new != confirm {
            return Err(SessionError::PasswordMismatch);
        }
        if old == new {
            return Err(SessionError::PasswordRejected);
        }

        Ok(())
    }

    /// Replace the display name and email of the current user.
    pub fn update_profile(&mut self, name: &str, email: &str) -> Result<&User, SessionError> {
        let mut user = self.user.clone().ok_or(SessionError::NotLoggedIn)?;
        user.name = name.trim().to_string();
        user.email = email.trim().to_string();

        self.persist(&user)?;
        info!(username = %user.username, "profile updated");

        Ok(&*self.user.insert(user))
    }

    fn persist(&mut self, user: &User) -> Result<(), SessionError> {
        let json = serde_json::to_string(user)?;

        self.storage.set(&self.storage_key, json)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Session<MemoryStorage> {
        Session::hydrate(MemoryStorage::default(), &SessionConfig::default()).unwrap()
    }

    #[test]
    fn login_derives_and_persists_the_user() {
        let mut session = fresh();

        assert!(session.login("admin", "secret").unwrap());

        let user = session.current_user().unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.email, "admin@easyqist.com");
        assert_eq!(user.name, "Admin");

        let stored = session.storage().get("admin_user").unwrap().unwrap();
        assert!(stored.contains("\"username\":\"admin\""));
    }

    #[test]
    fn blank_credentials_are_refused() {
        let mut session = fresh();

        assert!(!session.login("", "secret").unwrap());
        assert!(!session.login("admin", "").unwrap());
        assert!(!session.is_logged_in());
    }

    #[test]
    fn whitespace_username_is_kept_as_typed() {
        let mut session = fresh();

        assert!(session.login("   ", "pw").unwrap());
        assert_eq!(session.current_user().unwrap().username, "   ");

        assert!(session.login(" nora ", "pw").unwrap());
        let user = session.current_user().unwrap();
        assert_eq!(user.username, " nora ");
        assert_eq!(user.email, " nora @easyqist.com");
    }

    #[test]
    fn hydrate_restores_a_stored_user() {
        let mut storage = MemoryStorage::default();
        storage
            .set(
                "admin_user",
                r#"{"id":"1","username":"sara","email":"sara@easyqist.com","name":"Sara"}"#.into(),
            )
            .unwrap();

        let session = Session::hydrate(storage, &SessionConfig::default()).unwrap();

        assert_eq!(session.current_user().unwrap().username, "sara");
    }

    #[test]
    fn hydrate_discards_invalid_json() {
        let mut storage = MemoryStorage::default();
        storage.set("admin_user", "{broken".into()).unwrap();

        let session = Session::hydrate(storage, &SessionConfig::default()).unwrap();

        assert!(session.current_user().is_none());
        assert_eq!(session.storage().get("admin_user").unwrap(), None);
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let mut session = fresh();
        session.login("admin", "pw").unwrap();

        session.logout().unwrap();

        assert!(session.current_user().is_none());
        assert_eq!(session.storage().get("admin_user").unwrap(), None);
    }

    #[test]
    fn password_rules() {
        let session = fresh();

        assert!(matches!(
            session.update_password("old", "", "new"),
            Err(SessionError::MissingPasswordFields)
        ));
        assert!(matches!(
            session.update_password("old", "new", "other"),
            Err(SessionError::PasswordMismatch)
        ));
        assert!(matches!(
            session.update_password("same", "same", "same"),
            Err(SessionError::PasswordRejected)
        ));
        assert!(session.update_password("old", "new", "new").is_ok());
    }

    #[test]
    fn profile_update_requires_a_user_and_persists() {
        let mut session = fresh();
        assert!(matches!(
            session.update_profile("A", "a@x.com"),
            Err(SessionError::NotLoggedIn)
        ));

        session.login("admin", "pw").unwrap();
        let user = session.update_profile("Site Admin", "ops@easyqist.com").unwrap();
        assert_eq!(user.name, "Site Admin");
        assert_eq!(user.username, "admin");

        let stored = session.storage().get("admin_user").unwrap().unwrap();
        assert!(stored.contains("ops@easyqist.com"));
    }

    #[test]
    fn custom_storage_key_and_domain_are_honoured() {
        let config = SessionConfig {
            storage_key: "qist_user".into(),
            email_domain: "example.org".into(),
            path: None,
        };
        let mut session = Session::hydrate(MemoryStorage::default(), &config).unwrap();

        session.login("omar", "pw").unwrap();

        assert_eq!(session.current_user().unwrap().email, "omar@example.org");
        assert!(session.storage().get("qist_user").unwrap().is_some());
    }
}
