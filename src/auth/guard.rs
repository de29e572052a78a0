//! Gate for the admin dashboard.
//!
//! A guard starts `Unchecked` for every render, issues exactly one probe,
//! and settles on `Authenticated` or `Unauthenticated`. A probe that fails
//! counts as unauthenticated.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::auth::session::SessionStore;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unchecked,
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Answers "is the current caller signed in?".
#[async_trait]
pub trait SessionProbe: Send + Sync {
    async fn authenticated(&self) -> Result<bool, AppError>;
}

#[derive(Debug)]
pub struct SessionGuard {
    state: GuardState,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGuard {
    pub fn new() -> Self {
        Self {
            state: GuardState::Unchecked,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == GuardState::Authenticated
    }

    /// Run the probe once. Later calls return the settled state.
    pub async fn resolve<P: SessionProbe + ?Sized>(&mut self, probe: &P) -> GuardState {
        if self.state != GuardState::Unchecked {
            return self.state;
        }

        self.state = GuardState::Checking;
        self.state = match probe.authenticated().await {
            Ok(true) => GuardState::Authenticated,
            Ok(false) => GuardState::Unauthenticated,
            Err(e) => {
                tracing::warn!("Session check failed: {}", e);
                GuardState::Unauthenticated
            }
        };
        self.state
    }
}

/// Probe backed by the in-memory session store and the request's cookie.
pub struct CookieProbe<'a> {
    sessions: &'a Mutex<SessionStore>,
    token: Option<&'a str>,
}

impl<'a> CookieProbe<'a> {
    pub fn new(sessions: &'a Mutex<SessionStore>, token: Option<&'a str>) -> Self {
        Self { sessions, token }
    }
}

#[async_trait]
impl SessionProbe for CookieProbe<'_> {
    async fn authenticated(&self) -> Result<bool, AppError> {
        match self.token {
            Some(token) => Ok(self.sessions.lock().await.is_valid(token)),
            None => Ok(false),
        }
    }
}
