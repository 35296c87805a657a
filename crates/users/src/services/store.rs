//! Durable storage for the logged-in user record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::entities::User;
use crate::services::AuthSession;
use crate::types::{SessionError, SessionResult};

/// Fixed key under which the logged-in user is stored
pub const STORAGE_KEY: &str = "userInfo";

/// File-backed store holding the logged-in user as JSON
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at `dir`; the record lives at `dir/userInfo.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored user, `None` when nobody is logged in
    pub async fn load(&self) -> SessionResult<Option<User>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored session");
                return Ok(None);
            }
            Err(error) => return Err(SessionError::storage(&self.path, error)),
        };

        let user = serde_json::from_slice(&raw).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(user))
    }

    /// Persist the logged-in user
    pub async fn save(&self, user: &User) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|error| SessionError::storage(parent, error))?;
        }

        let json = serde_json::to_vec_pretty(user).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json)
            .await
            .map_err(|error| SessionError::storage(&self.path, error))?;

        info!(user_id = %user.id, "session stored");
        Ok(())
    }

    /// Remove the stored user; succeeds when nothing is stored
    pub async fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("session cleared");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(SessionError::storage(&self.path, error)),
        }
    }

    /// Load the stored user and turn it into an authenticated session
    pub async fn restore(&self) -> SessionResult<Option<AuthSession>> {
        match self.load().await? {
            Some(user) => AuthSession::new(user).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_returns_none_when_nothing_stored() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());

        assert!(store.load().await.unwrap().is_none());
        assert!(store.restore().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_restore_yields_session() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("profile"));
        let user = User::new("u1", "Ada").with_token("token-123");

        store.save(&user).await.unwrap();
        assert!(store.path().ends_with("userInfo.json"));

        let session = store.restore().await.unwrap().expect("session should exist");
        assert_eq!(session.user(), &user);
        assert_eq!(session.token(), "token-123");
    }

    #[tokio::test]
    async fn clear_removes_record_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store
            .save(&User::new("u1", "Ada").with_token("token-123"))
            .await
            .unwrap();

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_record_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        tokio::fs::write(store.path(), b"{not json").await.unwrap();

        assert!(matches!(
            store.load().await,
            Err(SessionError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn stored_user_without_token_cannot_restore() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        store.save(&User::new("u1", "Ada")).await.unwrap();

        assert!(matches!(
            store.restore().await,
            Err(SessionError::MissingToken)
        ));
    }
}
