//! Login session persisted between CLI invocations.
//!
//! The file only marks who is logged in (id, account type, display name,
//! status). It is created on login, rewritten when the display name changes
//! and removed on logout.

use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{AccountType, LoginResponse, UserStatus};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Login response is missing {0}")]
    Incomplete(&'static str),

    #[error("You are not logged in. Run `maduve login` first.")]
    NotLoggedIn,

    #[error("This command requires a {expected} account")]
    WrongAccountType { expected: AccountType },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub user: SessionUser,
    pub user_type: AccountType,
}

#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    current: Option<PersistedSession>,
}

impl Session {
    /// Logged-out session bound to `path`; nothing is read or written.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: None,
        }
    }

    /// Load the session at `path`. A file that cannot be parsed is removed
    /// and the session starts logged out.
    pub fn restore(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::empty(path));
        }

        let raw = read_locked(&path)?;
        match serde_json::from_str::<PersistedSession>(&raw) {
            Ok(session) => {
                debug!(user_id = %session.user.id, "Session restored");
                Ok(Self {
                    path,
                    current: Some(session),
                })
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Discarding unreadable session file");
                remove_if_present(&path)?;
                Ok(Self::empty(path))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Option<&PersistedSession> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.user.id.as_str())
    }

    /// Start a session from a successful login. `account` is used when the
    /// response does not say which kind of account logged in.
    pub fn start(
        &mut self,
        response: &LoginResponse,
        account: AccountType,
    ) -> Result<&PersistedSession, SessionError> {
        let id = response
            .user_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(SessionError::Incomplete("userId"))?;

        let session = PersistedSession {
            user: SessionUser {
                id,
                full_name: response.user_name.clone().unwrap_or_default(),
                status: response.status,
            },
            user_type: response.user_type.unwrap_or(account),
        };
        self.persist(&session)?;
        info!(user_id = %session.user.id, user_type = %session.user_type, "Session started");
        Ok(self.current.insert(session))
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.current = None;
        remove_if_present(&self.path)?;
        info!("Session cleared");
        Ok(())
    }

    pub fn update_display_name(&mut self, full_name: &str) -> Result<(), SessionError> {
        let Some(mut session) = self.current.clone() else {
            return Err(SessionError::NotLoggedIn);
        };
        session.user.full_name = full_name.to_string();
        self.persist(&session)?;
        self.current = Some(session);
        Ok(())
    }

    pub fn require_user(&self) -> Result<&SessionUser, SessionError> {
        self.require(AccountType::User)
    }

    pub fn require_admin(&self) -> Result<&SessionUser, SessionError> {
        self.require(AccountType::Admin)
    }

    fn require(&self, expected: AccountType) -> Result<&SessionUser, SessionError> {
        let session = self.current.as_ref().ok_or(SessionError::NotLoggedIn)?;
        if session.user_type != expected {
            return Err(SessionError::WrongAccountType { expected });
        }
        Ok(&session.user)
    }

    fn persist(&self, session: &PersistedSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.path)?;
        let mut lock = RwLock::new(file);
        let mut guard = lock.write()?;
        guard.set_len(0)?;
        guard.write_all(json.as_bytes())?;
        guard.flush()?;
        Ok(())
    }
}

fn read_locked(path: &Path) -> Result<String, SessionError> {
    let lock = RwLock::new(File::open(path)?);
    let guard = lock.read()?;
    let mut raw = String::new();
    (&*guard).read_to_string(&mut raw)?;
    Ok(raw)
}

fn remove_if_present(path: &Path) -> Result<(), SessionError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
