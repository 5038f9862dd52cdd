use std::{
    collections::HashMap,
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{config::SessionBackend, error::StoreResult, info, types::SessionState, utils};

/// Keyed storage for per-user session state between requests.
///
/// Sessions idle for longer than the store's lifetime are gone: `load`
/// removes and hides them, `purge_expired` sweeps them all.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Human-readable backend name ("memory", "file").
    fn backend_name(&self) -> &str;

    /// The session `id`, or `None` when unknown or idle-expired.
    async fn load(&self, id: &str) -> StoreResult<Option<SessionState>>;

    /// Stores `state` under its session id and marks it as seen now.
    async fn save(&self, state: &SessionState) -> StoreResult<()>;

    async fn remove(&self, id: &str) -> StoreResult<()>;

    /// All sessions, expired ones included.
    async fn list(&self) -> StoreResult<Vec<SessionState>>;

    /// Removes idle-expired sessions and returns how many were dropped.
    async fn purge_expired(&self) -> StoreResult<usize>;
}

/// Opens the store for `backend`; `dir` is only used by the file backend.
pub fn open_store(backend: SessionBackend, dir: PathBuf, lifetime: Duration) -> Arc<dyn SessionStore> {
    match backend {
        SessionBackend::File => Arc::new(FileSessionStore::new(dir, lifetime)),
        SessionBackend::Memory => Arc::new(MemorySessionStore::new(lifetime)),
    }
}

fn touched(state: &SessionState) -> SessionState {
    let mut state = state.clone();
    state.last_seen = utils::now();
    state
}

pub struct MemorySessionStore {
    lifetime: Duration,
    sessions: Mutex<HashMap<String, SessionState>>,
}

impl MemorySessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn load(&self, id: &str) -> StoreResult<Option<SessionState>> {
        let mut sessions = self.sessions.lock().await;
        let expired = match sessions.get(id) {
            Some(state) => state.is_expired(utils::now(), self.lifetime.as_secs()),
            None => return Ok(None),
        };

        if expired {
            sessions.remove(id);
            info!("Session {} expired.", id);
            return Ok(None);
        }
        Ok(sessions.get(id).cloned())
    }

    async fn save(&self, state: &SessionState) -> StoreResult<()> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(state.session_id.clone(), touched(state));
        Ok(())
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        self.sessions.lock().await.remove(id);
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<SessionState>> {
        Ok(self.sessions.lock().await.values().cloned().collect())
    }

    async fn purge_expired(&self) -> StoreResult<usize> {
        let now = utils::now();
        let lifetime = self.lifetime.as_secs();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, state| !state.is_expired(now, lifetime));
        Ok(before - sessions.len())
    }
}

/// One JSON file per session under a directory.
pub struct FileSessionStore {
    dir: PathBuf,
    lifetime: Duration,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>, lifetime: Duration) -> Self {
        Self {
            dir: dir.into(),
            lifetime,
        }
    }

    fn get_path(&self, id: &str) -> Option<PathBuf> {
        utils::is_valid_session_id(id).then(|| self.dir.join(format!("{}.json", id)))
    }

    async fn read(path: &Path) -> StoreResult<Option<SessionState>> {
        match async_fs::read_to_string(path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_path(path: &Path) -> StoreResult<()> {
        match async_fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn session_files(&self) -> StoreResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    fn backend_name(&self) -> &str {
        "file"
    }

    async fn load(&self, id: &str) -> StoreResult<Option<SessionState>> {
        let Some(path) = self.get_path(id) else {
            return Ok(None);
        };

        match Self::read(&path).await? {
            Some(state) if state.is_expired(utils::now(), self.lifetime.as_secs()) => {
                Self::remove_path(&path).await?;
                info!("Session {} expired.", id);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn save(&self, state: &SessionState) -> StoreResult<()> {
        let path = self.get_path(&state.session_id).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("invalid session id {:?}", state.session_id),
            )
        })?;

        async_fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string(&touched(state))?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        match self.get_path(id) {
            Some(path) => Self::remove_path(&path).await,
            None => Ok(()),
        }
    }

    async fn list(&self) -> StoreResult<Vec<SessionState>> {
        let mut sessions = Vec::new();
        for path in self.session_files().await? {
            if let Some(state) = Self::read(&path).await? {
                sessions.push(state);
            }
        }
        Ok(sessions)
    }

    async fn purge_expired(&self) -> StoreResult<usize> {
        let now = utils::now();
        let lifetime = self.lifetime.as_secs();
        let mut purged = 0;

        for path in self.session_files().await? {
            if let Some(state) = Self::read(&path).await? {
                if state.is_expired(now, lifetime) {
                    Self::remove_path(&path).await?;
                    purged += 1;
                }
            }
        }
        Ok(purged)
    }
}
