//! Keyed session persistence.
//!
//! Writes for one key are last-write-wins. The file backend serializes writers per key and
//! replaces files atomically, so a reader sees either the previous or the new session.

use crate::error::{SessionError, SessionErrorExt};
use crate::session::{Session, StoredSession};
use dtab_kernel::domain::config::{SessionBackend, SessionsConfig};
use dtab_kernel::session_key::SessionKey;
use fxhash::FxHashMap;
use parking_lot::{Mutex, RwLock};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

/// Session storage selected by `sessions.backend`.
#[derive(Debug, Clone)]
pub enum SessionStore {
    Memory(MemoryStore),
    File(FileStore),
}

impl SessionStore {
    /// # Errors
    /// Returns [`SessionError::Io`] when the file backend cannot create its directory.
    pub fn from_config(config: &SessionsConfig) -> Result<Self, SessionError> {
        match config.backend {
            SessionBackend::Memory => Ok(Self::Memory(MemoryStore::default())),
            SessionBackend::File => FileStore::open(&config.dir).map(Self::File),
        }
    }

    /// # Errors
    /// Returns [`SessionError::Io`] when an existing session file cannot be read.
    pub async fn get(&self, key: &SessionKey) -> Result<Option<Session>, SessionError> {
        match self {
            Self::Memory(store) => Ok(store.get(key)),
            Self::File(store) => store.get(key).await,
        }
    }

    /// The saved session, or an empty one when nothing was saved under `key`.
    ///
    /// # Errors
    /// See [`SessionStore::get`].
    pub async fn load(&self, key: &SessionKey) -> Result<Session, SessionError> {
        Ok(self.get(key).await?.unwrap_or_default())
    }

    /// Replaces the session stored under `key`.
    ///
    /// # Errors
    /// Returns [`SessionError`] when the file backend fails to encode or write the session.
    pub async fn put(&self, key: &SessionKey, session: &Session) -> Result<(), SessionError> {
        match self {
            Self::Memory(store) => {
                store.put(key, session.clone());
                Ok(())
            },
            Self::File(store) => store.put(key, session).await,
        }?;

        debug!(
            session = %key,
            items = session.items.len(),
            selected = session.selected.len(),
            "Session saved"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<RwLock<FxHashMap<SessionKey, Session>>>,
}

impl MemoryStore {
    fn get(&self, key: &SessionKey) -> Option<Session> {
        self.sessions.read().get(key).cloned()
    }

    fn put(&self, key: &SessionKey, session: Session) {
        self.sessions.write().insert(key.clone(), session);
    }
}

/// One `<key>.json` file per session under `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    writers: Arc<Mutex<FxHashMap<SessionKey, Arc<AsyncMutex<()>>>>>,
}

impl FileStore {
    /// Creates `dir` if needed.
    ///
    /// # Errors
    /// Returns [`SessionError::Io`] when the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, SessionError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).context(format!("creating {}", dir.display()))?;
        Ok(Self { dir, writers: Arc::default() })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &SessionKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn writer_lock(&self, key: &SessionKey) -> Arc<AsyncMutex<()>> {
        Arc::clone(self.writers.lock().entry(key.clone()).or_default())
    }

    async fn get(&self, key: &SessionKey) -> Result<Option<Session>, SessionError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SessionError::Io {
                    source,
                    context: Some(format!("reading {}", path.display()).into()),
                });
            },
        };

        match serde_json::from_slice::<StoredSession>(&bytes) {
            Ok(stored) => Ok(Some(stored.into())),
            Err(e) => {
                warn!(session = %key, error = %e, "Ignoring unreadable session file");
                Ok(None)
            },
        }
    }

    async fn put(&self, key: &SessionKey, session: &Session) -> Result<(), SessionError> {
        let bytes = serde_json::to_vec_pretty(session).context("encoding session")?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let lock = self.writer_lock(key);
        let result = {
            let _guard = lock.lock().await;
            write_atomic(&tmp, &path, &bytes).await
        };
        drop(lock);
        self.release_writer(key);
        result
    }

    /// Drops the per-key lock once no writer holds or waits on it.
    fn release_writer(&self, key: &SessionKey) {
        let mut writers = self.writers.lock();
        if writers.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            writers.remove(key);
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_writers(&self) -> usize {
        self.writers.lock().len()
    }
}

async fn write_atomic(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<(), SessionError> {
    tokio::fs::write(tmp, bytes).await.context(format!("writing {}", tmp.display()))?;
    tokio::fs::rename(tmp, path).await.context(format!("replacing {}", path.display()))?;
    Ok(())
}
#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> SessionKey {
        SessionKey::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn writer_locks_are_released_after_put() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        for raw in ["alpha", "beta", "gamma"] {
            store.put(&key(raw), &Session::default()).await.unwrap();
        }

        assert_eq!(store.tracked_writers(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_leave_no_locks_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let raw = if i % 2 == 0 { "shared" } else { "other" };
                    store.put(&key(raw), &Session::default()).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.tracked_writers(), 0);
        assert!(store.get(&key("shared")).await.unwrap().is_some());
    }
}
