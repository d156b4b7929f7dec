//! Application root.
//!
//! DESIGN
//! ======
//! `Classroom` wires the API client, the session store and the course store
//! together and owns their lifecycle. Nothing is global: front-ends build a
//! `Classroom`, call [`Classroom::init`] once, and hand out clones of the
//! store handles. [`Classroom::teardown`] detaches the course store from
//! the session and drops all cached data.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::{ApiError, HttpApi, LmsApi};
use crate::state::courses::CoursesStore;
use crate::state::session::{SessionStatus, SessionStore};

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

#[derive(Clone)]
pub struct Classroom {
    pub session: SessionStore,
    pub courses: CoursesStore,
    http: Option<Arc<HttpApi>>,
}

impl Classroom {
    /// Build over any API implementation.
    #[must_use]
    pub fn new(api: Arc<dyn LmsApi>) -> Self {
        let session = SessionStore::new(Arc::clone(&api));
        let courses = CoursesStore::new(api, session.clone());
        courses.attach();
        Self { session, courses, http: None }
    }

    /// Build over the HTTP client, optionally seeding a saved session token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig, session_token: Option<&str>) -> Result<Self, ApiError> {
        let http = Arc::new(HttpApi::new(config)?);
        if let Some(token) = session_token.filter(|t| !t.is_empty()) {
            http.restore_session(token);
        }
        let mut app = Self::new(http.clone());
        app.http = Some(http);
        Ok(app)
    }

    /// Probe the identity endpoint. Call once at startup.
    pub async fn init(&self) -> SessionStatus {
        let status = self.session.probe().await;
        tracing::debug!(authenticated = matches!(status, SessionStatus::Authenticated(_)), "classroom initialized");
        status
    }

    /// Session cookie currently held by the HTTP client, if any.
    #[must_use]
    pub fn session_token(&self) -> Option<String> {
        self.http.as_ref().and_then(|h| h.session_token())
    }

    pub fn teardown(&self) {
        self.courses.detach();
        self.courses.reset();
    }
}
