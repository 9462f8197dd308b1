//! # Session
//!
//! The credential attached to every request, held in an explicit object
//! handed to [`ApiClient`](crate::ApiClient).
//!
//! ## Token Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  POST /api/auth/login ──► {token} ──► session.sign_in(token)            │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                                   TokenStore::save                      │
//! │                                   (memory or token file)                │
//! │                                            │                            │
//! │  every request ◄── Authorization: Bearer ──┘                            │
//! │       │                                                                 │
//! │       ├── 2xx ──► fine                                                  │
//! │       └── 401 ──► session.sign_out() ──► ClientError::AuthRequired      │
//! │                                                                         │
//! │  `rodeo logout` ──► session.sign_out()                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Auth Token
// =============================================================================

/// A bearer token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        AuthToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

// =============================================================================
// Token Store
// =============================================================================

/// Where the token lives between runs.
pub trait TokenStore: Send + Sync + fmt::Debug {
    fn load(&self) -> ClientResult<Option<AuthToken>>;
    fn save(&self, token: &AuthToken) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

/// Keeps the token for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        MemoryTokenStore::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ClientResult<Option<AuthToken>> {
        let token = self.token.read().unwrap_or_else(|e| e.into_inner());
        Ok(token.clone())
    }

    fn save(&self, token: &AuthToken) -> ClientResult<()> {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
        Ok(())
    }
}

/// Keeps the token in a plain file so it survives between CLI runs.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ClientResult<Option<AuthToken>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(AuthToken::new(token)))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::TokenStore(e.to_string())),
        }
    }

    fn save(&self, token: &AuthToken) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ClientError::TokenStore(e.to_string()))?;
        }
        fs::write(&self.path, token.as_str()).map_err(|e| ClientError::TokenStore(e.to_string()))
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::TokenStore(e.to_string())),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Shared handle to the token store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Session { store }
    }

    /// A session backed by [`MemoryTokenStore`].
    pub fn in_memory() -> Self {
        Session::new(Arc::new(MemoryTokenStore::new()))
    }

    /// The current token, or `AuthRequired` when there is none.
    pub fn token(&self) -> ClientResult<AuthToken> {
        self.store.load()?.ok_or(ClientError::AuthRequired)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.load(), Ok(Some(_)))
    }

    pub fn sign_in(&self, token: AuthToken) -> ClientResult<()> {
        self.store.save(&token)?;
        info!("Session started");
        Ok(())
    }

    /// Drops the stored token. Safe to call when signed out.
    pub fn sign_out(&self) -> ClientResult<()> {
        self.store.clear()?;
        debug!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_token_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("rodeo-test-{}", uuid::Uuid::new_v4()))
            .join("token")
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("secret-value");
        assert_eq!(format!("{:?}", token), "AuthToken(***)");
    }

    #[test]
    fn test_memory_session_lifecycle() {
        let session = Session::in_memory();
        assert_eq!(session.token(), Err(ClientError::AuthRequired));
        assert!(!session.is_authenticated());

        session.sign_in(AuthToken::new("abc")).unwrap();
        assert_eq!(session.token().unwrap().as_str(), "abc");

        session.sign_out().unwrap();
        session.sign_out().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_file_store_survives_new_instance() {
        let path = temp_token_path();
        let store = FileTokenStore::new(&path);
        assert_eq!(store.load().unwrap(), None);

        store.save(&AuthToken::new("persisted")).unwrap();
        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(AuthToken::new("persisted")));

        reopened.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        reopened.clear().unwrap();

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_clones_share_the_store() {
        let session = Session::in_memory();
        let other = session.clone();
        session.sign_in(AuthToken::new("shared")).unwrap();
        assert!(other.is_authenticated());
    }
}
