//!
//! # Session Store
//!
//! The client keeps exactly one session: a bearer token and the signed-in user,
//! stored under two keys of a key-value medium. The medium is injectable through
//! the `KeyValueStore` trait; `MemoryStore` is used by tests and the mock backend,
//! `FileStore` persists the session as a JSON object on disk.

use crate::error::AppError;
use crate::models::User;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::NamedTempFile;

/// Key holding the opaque bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Key holding the JSON-serialized `User`.
pub const USER_DATA_KEY: &str = "user_data";

/// A string key-value medium, shaped like browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove_item(&self, key: &str) -> Result<(), AppError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-local storage; forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(lock(&self.items).get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        lock(&self.items).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), AppError> {
        lock(&self.items).remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file. A missing file reads as empty.
///
/// A file that does not decode (say, cut short by a crash) also reads as empty and
/// is replaced on the next write. Writes go to a temporary file that is then renamed
/// over the old one.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Decoded file contents; `intact` is false when the file held undecodable data.
struct Contents {
    items: HashMap<String, String>,
    intact: bool,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<Contents, AppError> {
        let mut contents = Contents {
            items: HashMap::new(),
            intact: true,
        };
        if !self.path.exists() {
            return Ok(contents);
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(contents);
        }
        match serde_json::from_str(&raw) {
            Ok(items) => contents.items = items,
            Err(e) => {
                warn!(
                    "Session file {} is unreadable, treating it as empty: {}",
                    self.path.display(),
                    e
                );
                contents.intact = false;
            }
        }
        Ok(contents)
    }

    fn write_all(&self, items: &HashMap<String, String>) -> Result<(), AppError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(serde_json::to_string_pretty(items)?.as_bytes())?;
        file.persist(&self.path).map_err(|e| AppError::from(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.read_all()?.items.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let _guard = lock(&self.write_lock);
        let mut contents = self.read_all()?;
        contents.items.insert(key.to_string(), value.to_string());
        self.write_all(&contents.items)
    }

    fn remove_item(&self, key: &str) -> Result<(), AppError> {
        let _guard = lock(&self.write_lock);
        let mut contents = self.read_all()?;
        if contents.items.remove(key).is_some() || !contents.intact {
            self.write_all(&contents.items)?;
        }
        Ok(())
    }
}

/// Typed access to the token and user held in a `KeyValueStore`.
///
/// Cloning is cheap; all clones share the same medium.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(FileStore::new(path)))
    }

    pub fn token(&self) -> Result<Option<String>, AppError> {
        self.storage.get_item(AUTH_TOKEN_KEY)
    }

    pub fn user(&self) -> Result<Option<User>, AppError> {
        match self.storage.get_item(USER_DATA_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_token(&self, token: &str) -> Result<(), AppError> {
        self.storage.set_item(AUTH_TOKEN_KEY, token)
    }

    pub fn set_user(&self, user: &User) -> Result<(), AppError> {
        self.storage
            .set_item(USER_DATA_KEY, &serde_json::to_string(user)?)
    }

    /// Overwrites the whole session after a successful authentication.
    pub fn set(&self, token: &str, user: &User) -> Result<(), AppError> {
        self.set_token(token)?;
        self.set_user(user)
    }

    /// Token and user id, or `Unauthenticated` when either is missing.
    pub fn credentials(&self) -> Result<(String, String), AppError> {
        let token = self
            .token()?
            .ok_or_else(|| AppError::Unauthenticated("No authentication token found".into()))?;
        let user = self
            .user()?
            .ok_or_else(|| AppError::Unauthenticated("No user ID found".into()))?;
        if user.id.is_empty() {
            return Err(AppError::Unauthenticated("No user ID found".into()));
        }
        Ok((token, user.id))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    /// Removes both keys. Both removals are attempted even if the first one fails.
    pub fn clear(&self) -> Result<(), AppError> {
        debug!("Clearing session");
        let token_result = self.remove(AUTH_TOKEN_KEY);
        let user_result = self.remove(USER_DATA_KEY);
        token_result.and(user_result)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.storage.remove_item(key).map_err(|e| {
            warn!("Failed to remove {}: {}", key, e);
            e
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
