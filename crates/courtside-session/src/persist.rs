//! Durable credential storage.
//!
//! The session keeps exactly one value across restarts: the bearer
//! credential, under a single key. Everything else is re-derived from the
//! authority. The [`CredentialStore`] trait lets the embedding application
//! decide where that value lives: a file in the user's config directory, a
//! platform keychain, or plain memory in tests.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use courtside_protocol::Credential;
use parking_lot::Mutex;

/// Persists the session credential under a key.
///
/// Methods are synchronous: logout must clear storage without suspending.
/// [`SessionStore`](crate::SessionStore) calls them while holding its
/// state lock, so implementations must not block for long (a small file
/// write at most) and must not call back into the session.
pub trait CredentialStore: Send + Sync + 'static {
    /// Reads the credential stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    fn load(&self, key: &str) -> io::Result<Option<Credential>>;

    /// Stores `credential` under `key`, replacing any previous value.
    fn save(&self, key: &str, credential: &Credential) -> io::Result<()>;

    /// Removes the value under `key`. Removing a missing value is not an
    /// error.
    fn clear(&self, key: &str) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// FileCredentialStore
// ---------------------------------------------------------------------------

/// Stores each key as a file inside one directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store rooted at `dir`. The directory is created on the
    /// first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the credential files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\'])
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key {key:?}"),
            ));
        }
        Ok(self.dir.join(key))
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self, key: &str) -> io::Result<Option<Credential>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Credential::new(token)))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, key: &str, credential: &Credential) -> io::Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&path)?;
        // A file left by an earlier version may have wider permissions.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(credential.as_str().as_bytes())?;

        tracing::debug!(path = %path.display(), "credential persisted");
        Ok(())
    }

    fn clear(&self, key: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryCredentialStore
// ---------------------------------------------------------------------------

/// Keeps credentials in memory only. Useful for tests and for sessions
/// that must not outlive the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `credential` under `key`, as if
    /// a previous process had saved it.
    pub fn with_credential(key: &str, credential: &Credential) -> Self {
        let store = Self::new();
        store
            .slots
            .lock()
            .insert(key.to_string(), credential.as_str().to_string());
        store
    }

    /// Returns `true` if anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.slots.lock().contains_key(key)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self, key: &str) -> io::Result<Option<Credential>> {
        Ok(self.slots.lock().get(key).map(Credential::new))
    }

    fn save(&self, key: &str, credential: &Credential) -> io::Result<()> {
        self.slots
            .lock()
            .insert(key.to_string(), credential.as_str().to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> io::Result<()> {
        self.slots.lock().remove(key);
        Ok(())
    }
}
