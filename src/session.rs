//! Authenticated session: the bearer token obtained at login.
//!
//! Lifecycle is explicit: [`SessionContext::establish`] on login success,
//! [`SessionContext::current`] from any privileged command, and
//! [`SessionContext::clear`] on logout or once the configured TTL has elapsed.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::LoginResponse;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt session file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Veuillez vous connecter (oeuvreguard login)")]
    NotLoggedIn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub token_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from a login response. `None` when the backend sent no token.
    pub fn from_login(resp: &LoginResponse, issued_at: DateTime<Utc>) -> Option<Self> {
        let token = resp.access_token.as_deref().filter(|t| !t.is_empty())?;
        Some(Self {
            token: token.to_string(),
            token_type: resp.token_type.clone(),
            user_id: resp.user_id.clone(),
            email: resp.email.clone(),
            issued_at,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) => now - self.issued_at >= ttl,
            None => false,
        }
    }
}

/// Durable storage for the session: a JSON file readable only by its owner.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }
        Ok(())
    }

    pub fn remove(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

pub struct SessionContext {
    store: SessionStore,
    ttl: Option<Duration>,
    session: Option<Session>,
}

impl SessionContext {
    /// Restore whatever session the store holds.
    pub fn open(store: SessionStore, ttl: Option<Duration>) -> Result<Self, SessionError> {
        let session = store.load()?;
        Ok(Self {
            store,
            ttl,
            session,
        })
    }

    /// Record a successful login. Returns `None`, and leaves any previous
    /// session untouched, when the response carried no token.
    pub fn establish(&mut self, resp: &LoginResponse) -> Result<Option<&Session>, SessionError> {
        let Some(session) = Session::from_login(resp, Utc::now()) else {
            warn!("login succeeded without a token; no session stored");
            return Ok(None);
        };
        self.store.save(&session)?;
        info!(path = %self.store.path().display(), "session stored");
        self.session = Some(session);
        Ok(self.session.as_ref())
    }

    /// The live session, if any. An expired session is cleared on read.
    pub fn current(&mut self) -> Option<&Session> {
        self.current_at(Utc::now())
    }

    pub fn current_at(&mut self, now: DateTime<Utc>) -> Option<&Session> {
        let expired = self
            .session
            .as_ref()
            .is_some_and(|s| s.is_expired_at(now, self.ttl));
        if expired {
            info!("session expired");
            if let Err(e) = self.clear() {
                warn!(error = %e, "failed to remove expired session");
                self.session = None;
            }
        }
        self.session.as_ref()
    }

    /// Like [`current`](Self::current) but an error when nobody is logged in.
    pub fn require(&mut self) -> Result<&Session, SessionError> {
        self.current().ok_or(SessionError::NotLoggedIn)
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.session = None;
        self.store.remove()
    }
}
