//! Credential lookup for authenticated requests.
//!
//! # Design
//! Two key-value sources are consulted for a serialized `userInfo` object:
//! a tab-scoped one first, then a persistent one. A missing key, unreadable
//! storage or malformed JSON falls through to the next source and finally to
//! "no credentials". The first readable entry decides, even without a token.
//! The store never writes.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::Deserialize;

use crate::error::CredentialError;

/// Key under which the login flow stores the signed-in user.
pub const USER_INFO_KEY: &str = "userInfo";

/// A readable key-value store.
pub trait CredentialSource: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError>;
}

/// Process-local store, the equivalent of a tab-scoped session store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}

impl CredentialSource for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }
}

/// Durable store backed by a JSON object on disk (`{"key": "value", ...}`).
/// A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn put(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<(), CredentialError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<HashMap<String, String>, CredentialError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl CredentialSource for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.load()?.remove(key))
    }
}

#[derive(Deserialize)]
struct StoredUser {
    #[serde(default)]
    token: Option<String>,
}

/// Produces `Authorization` headers from the stored user info.
pub struct CredentialStore {
    tab: Box<dyn CredentialSource>,
    persistent: Box<dyn CredentialSource>,
}

impl CredentialStore {
    pub fn new(tab: impl CredentialSource + 'static, persistent: impl CredentialSource + 'static) -> Self {
        Self {
            tab: Box::new(tab),
            persistent: Box::new(persistent),
        }
    }

    /// A store with nothing in it. Requests made through it are
    /// unauthenticated.
    pub fn empty() -> Self {
        Self::new(MemoryStore::new(), MemoryStore::new())
    }

    /// Bearer token from the first store holding a readable user entry. The
    /// persistent store is only consulted when the tab entry is absent or
    /// unreadable; a readable entry without a token means "signed out".
    pub fn token(&self) -> Option<String> {
        for (name, source) in [("tab", &self.tab), ("persistent", &self.persistent)] {
            match read_user(source.as_ref()) {
                Ok(Some(user)) => return user.token.filter(|t| !t.is_empty()),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(store = name, error = %e, "ignoring unreadable credentials");
                }
            }
        }
        None
    }

    /// `[("Authorization", "Bearer <token>")]`, or nothing when no token is
    /// stored.
    pub fn auth_headers(&self) -> Vec<(String, String)> {
        match self.token() {
            Some(token) => vec![("Authorization".to_string(), format!("Bearer {token}"))],
            None => Vec::new(),
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

fn read_user(source: &dyn CredentialSource) -> Result<Option<StoredUser>, CredentialError> {
    let Some(raw) = source.get(USER_INFO_KEY)? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
}
