//! Persisted sign-in credentials.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tokio::{fs, sync::Mutex};

use crate::session::Session;

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("failed to access credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("credential file {path} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode credentials: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Where the current session survives restarts.
#[automock]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// The stored session, if any.
    async fn load(&self) -> Result<Option<Session>, CredentialStoreError>;

    async fn save(&self, session: &Session) -> Result<(), CredentialStoreError>;

    /// Remove the stored session. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// Process-local store; clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Arc<Mutex<Option<Session>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<Session>, CredentialStoreError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), CredentialStoreError> {
        *self.slot.lock().await = Some(session.clone());

        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        *self.slot.lock().await = None;

        Ok(())
    }
}

/// JSON file store. The file is created owner-readable only on Unix.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> CredentialStoreError {
        CredentialStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<Session>, CredentialStoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(self.io_error(error)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| CredentialStoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    async fn save(&self, session: &Session) -> Result<(), CredentialStoreError> {
        let json = serde_json::to_vec_pretty(session).map_err(CredentialStoreError::Encode)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|error| self.io_error(error))?;
        }

        fs::write(&self.path, json)
            .await
            .map_err(|error| self.io_error(error))?;

        #[cfg(unix)]
        {
            use std::{fs::Permissions, os::unix::fs::PermissionsExt};

            fs::set_permissions(&self.path, Permissions::from_mode(0o600))
                .await
                .map_err(|error| self.io_error(error))?;
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(error)),
        }
    }
}
