use crate::session::store::StoredSession;
use crate::session::{SessionError, SessionStore, SessionTokens};
use common_types::UserRole;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Session persisted as a small JSON file, so a login survives restarts.
///
/// Every write goes through a temp file in the same directory and is renamed
/// into place, so a crash never leaves a half-written token pair behind.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    state: RwLock<StoredSession>,
}

impl FileSessionStore {
    /// Opens the session file, starting logged out when it does not exist or
    /// cannot be parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let state = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("Ignoring unreadable session file {}: {e}", path.display());
                StoredSession::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredSession::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-modify-write under a single write guard, so a concurrent `clear`
    /// cannot land between reading the state and persisting the update.
    fn update(
        &self,
        change: impl FnOnce(&StoredSession) -> Result<StoredSession, SessionError>,
    ) -> Result<(), SessionError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next = change(&state)?;
        persist(&self.path, &next)?;
        *state = next;
        Ok(())
    }

    fn current(&self) -> StoredSession {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn persist(path: &Path, session: &StoredSession) -> Result<(), SessionError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(&serde_json::to_vec_pretty(session)?)?;
    temp.flush()?;
    temp.persist(path)?;
    debug!("Session written to {}", path.display());
    Ok(())
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<SessionTokens> {
        self.current().tokens()
    }

    fn set(&self, tokens: SessionTokens) -> Result<(), SessionError> {
        self.update(|state| Ok(state.with_tokens(tokens)))
    }

    fn set_access_token(&self, access_token: String) -> Result<(), SessionError> {
        self.update(|state| state.with_access_token(access_token))
    }

    fn role(&self) -> Option<UserRole> {
        let state = self.current();
        state.tokens().and(state.user_role)
    }

    fn set_role(&self, role: Option<UserRole>) -> Result<(), SessionError> {
        self.update(|state| {
            let mut next = state.clone();
            next.user_role = role;
            Ok(next)
        })
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.update(|_| Ok(StoredSession::default()))
    }
}
