//! Session store: who is signed in.
//!
//! DESIGN
//! ======
//! The status is tri-state. `Unknown` holds from construction until the
//! first identity probe resolves and is never re-entered. Views must treat
//! `Unknown` as "do not render user-dependent content yet".
//!
//! Every request-starting action bumps `request`; completions carry the
//! token they were started with and are dropped if a newer request (or a
//! logout) has happened since. Logout always commits locally, whatever the
//! server said.

use std::sync::Arc;

use super::StoreError;
use super::store::{Reduce, Store, SubscriptionId};
use crate::net::LmsApi;
use crate::net::types::User;

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Unknown,
    Authenticated(User),
    Unauthenticated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    /// A probe, login, or logout is outstanding.
    pub pending: bool,
    /// Last failure message. A plain 401 on the probe is not a failure.
    pub error: Option<String>,
    request: u64,
}

impl SessionState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match &self.status {
            SessionStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self.status, SessionStatus::Unknown)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.status, SessionStatus::Authenticated(_))
    }

    /// Token of the most recently started request.
    #[must_use]
    pub fn request(&self) -> u64 {
        self.request
    }
}

#[derive(Debug, Clone)]
pub enum SessionAction {
    ProbeStarted,
    ProbeSucceeded { request: u64, user: User },
    ProbeFailed { request: u64, error: Option<String> },
    LoginStarted,
    LoginSucceeded { request: u64, user: User },
    LoginFailed { request: u64, error: String },
    LogoutStarted,
    LoggedOut { error: Option<String> },
    ClearError,
}

impl Reduce for SessionState {
    type Action = SessionAction;

    fn reduce(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::ProbeStarted | SessionAction::LoginStarted | SessionAction::LogoutStarted => {
                self.request += 1;
                self.pending = true;
                self.error = None;
            }
            SessionAction::ProbeSucceeded { request, user } | SessionAction::LoginSucceeded { request, user } => {
                if request != self.request {
                    return false;
                }
                self.pending = false;
                self.status = SessionStatus::Authenticated(user);
            }
            SessionAction::ProbeFailed { request, error } => {
                if request != self.request {
                    return false;
                }
                self.pending = false;
                self.status = SessionStatus::Unauthenticated;
                self.error = error;
            }
            SessionAction::LoginFailed { request, error } => {
                if request != self.request {
                    return false;
                }
                self.pending = false;
                self.status = SessionStatus::Unauthenticated;
                self.error = Some(error);
            }
            SessionAction::LoggedOut { error } => {
                self.request += 1;
                self.pending = false;
                self.status = SessionStatus::Unauthenticated;
                self.error = error;
            }
            SessionAction::ClearError => {
                if self.error.is_none() {
                    return false;
                }
                self.error = None;
            }
        }
        true
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// Session service: the store plus the operations that drive it.
#[derive(Clone)]
pub struct SessionStore {
    store: Store<SessionState>,
    api: Arc<dyn LmsApi>,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<dyn LmsApi>) -> Self {
        Self { store: Store::new(SessionState::default()), api }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.store.snapshot()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.store.read(|s| s.status.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.read(SessionState::is_authenticated)
    }

    pub fn subscribe(&self, listener: impl Fn(&SessionState) + Send + Sync + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Ask the backend who we are. A 401 settles the session as signed out
    /// without recording an error; any other failure is recorded.
    pub async fn probe(&self) -> SessionStatus {
        let request = self.store.dispatch(SessionAction::ProbeStarted).request;
        let action = match self.api.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session probe authenticated");
                SessionAction::ProbeSucceeded { request, user }
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("session probe: not authenticated");
                SessionAction::ProbeFailed { request, error: None }
            }
            Err(e) => {
                tracing::warn!(error = %e, "session probe failed");
                SessionAction::ProbeFailed { request, error: Some(e.to_string()) }
            }
        };
        self.store.dispatch(action).status
    }

    /// Exchange a Google ID token for a server session and adopt the
    /// returned profile. Re-probes when the response carries no profile.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an empty token (no request is
    /// made), the API error when the exchange fails, or
    /// [`StoreError::Superseded`] when a logout or newer request landed
    /// while the exchange was in flight.
    pub async fn login(&self, provider_token: &str) -> Result<User, StoreError> {
        let token = provider_token.trim();
        if token.is_empty() {
            return Err(StoreError::Validation("Google credential is missing.".into()));
        }

        let request = self.store.dispatch(SessionAction::LoginStarted).request;
        let user = match self.api.login_with_google(token).await {
            Ok(Some(user)) => user,
            Ok(None) => match self.api.current_user().await {
                Ok(user) => user,
                Err(e) => return Err(self.login_failed(request, e.into())),
            },
            Err(e) => return Err(self.login_failed(request, e.into())),
        };

        let state = self.store.dispatch(SessionAction::LoginSucceeded { request, user: user.clone() });
        if state.request != request {
            tracing::warn!(user_id = %user.id, "login result superseded by a newer session request");
            return Err(StoreError::Superseded);
        }
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(user)
    }

    fn login_failed(&self, request: u64, err: StoreError) -> StoreError {
        tracing::warn!(error = %err, "login failed");
        self.store.dispatch(SessionAction::LoginFailed { request, error: err.to_string() });
        err
    }

    /// End the server session. The local session is cleared even when the
    /// server call fails; that failure is returned and kept in `error`.
    ///
    /// # Errors
    ///
    /// Returns the API error from `POST /auth/logout`.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.store.dispatch(SessionAction::LogoutStarted);
        let result = self.api.logout().await;
        let error = result.as_ref().err().map(ToString::to_string);
        if let Some(e) = &error {
            tracing::warn!(error = %e, "server logout failed; clearing local session anyway");
        } else {
            tracing::info!("logged out");
        }
        self.store.dispatch(SessionAction::LoggedOut { error });
        result.map_err(StoreError::from)
    }

    pub fn clear_error(&self) {
        self.store.dispatch(SessionAction::ClearError);
    }
}
