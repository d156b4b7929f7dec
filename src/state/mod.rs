//! Client-side state: the session and the course resources that depend on it.
//!
//! DESIGN
//! ======
//! Each domain has a plain state struct with a pure reducer and a service
//! handle that performs the network calls and dispatches the results. The
//! course store listens to the session store so that signing out clears
//! every course it holds.

pub mod courses;
pub mod ordering;
pub mod session;
pub mod store;

use crate::net::ApiError;

/// Errors returned by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The operation needs a signed-in user.
    #[error("you must be logged in to do that")]
    NotAuthenticated,

    /// A newer session request (or a logout) finished first; the result
    /// was not applied.
    #[error("superseded by a newer session change")]
    Superseded,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Progress of one fetch or mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl LoadState {
    /// `Idle` counts as loading: the fetch has not been issued yet.
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Idle | Self::Pending)
    }
}
