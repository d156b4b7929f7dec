//! REST client for the LMS backend.
//!
//! DESIGN
//! ======
//! [`LmsApi`] is the seam between the stores and the network. Stores hold
//! an `Arc<dyn LmsApi>` so tests can script responses without a server.
//! [`HttpApi`] is the production implementation: a `reqwest` client with a
//! cookie jar, so the session cookie set by `POST /auth/google` rides along
//! on every later request.
//!
//! ERROR HANDLING
//! ==============
//! Every call resolves to `Result<_, ApiError>`. A 401 maps to
//! [`ApiError::Unauthorized`]; other non-2xx statuses carry the server's
//! `detail` messages; unparseable bodies map to [`ApiError::Decode`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::cookie::{CookieStore, Jar};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{Course, GoogleLogin, Id, LoginResponse, Module, NewCourse, NewModule, NewUnit, Unit, User};
use crate::config::ClientConfig;

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

// =============================================================================
// TRAIT
// =============================================================================

/// Operations the client needs from the backend.
#[async_trait::async_trait]
pub trait LmsApi: Send + Sync {
    /// `GET {identity_path}`: the profile behind the current session.
    async fn current_user(&self) -> Result<User, ApiError>;

    /// `POST /auth/google`: exchange a Google ID token for a session.
    /// Returns the profile when the response body carries one.
    async fn login_with_google(&self, token: &str) -> Result<Option<User>, ApiError>;

    /// `POST /auth/logout`.
    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /courses`.
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError>;

    /// `GET /courses/{id}`.
    async fn get_course(&self, course_id: &Id) -> Result<Course, ApiError>;

    /// `POST /courses`.
    async fn create_course(&self, input: &NewCourse) -> Result<Course, ApiError>;

    /// `GET /courses/{id}/modules`.
    async fn list_modules(&self, course_id: &Id) -> Result<Vec<Module>, ApiError>;

    /// `POST /courses/{id}/modules`.
    async fn create_module(&self, course_id: &Id, input: &NewModule) -> Result<Module, ApiError>;

    /// `GET /modules/{id}/units`.
    async fn list_units(&self, module_id: &Id) -> Result<Vec<Unit>, ApiError>;

    /// `POST /modules/{id}/units`.
    async fn create_unit(&self, module_id: &Id, input: &NewUnit) -> Result<Unit, ApiError>;
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

pub struct HttpApi {
    http: reqwest::Client,
    jar: Arc<Jar>,
    origin: reqwest::Url,
    config: ClientConfig,
}

impl HttpApi {
    /// Build a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// fails to build.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let origin = reqwest::Url::parse(&config.base_url).map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, jar, origin, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Seed the cookie jar with a previously issued session token.
    pub fn restore_session(&self, token: &str) {
        let cookie = format!("{}={}; Path=/", self.config.session_cookie, token.trim());
        self.jar.add_cookie_str(&cookie, &self.origin);
    }

    /// Current value of the session cookie, if the server has set one.
    #[must_use]
    pub fn session_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.origin)?;
        let raw = header.to_str().ok()?;
        raw.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == self.config.session_cookie && !value.is_empty()).then(|| value.to_owned())
        })
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.config.url(path);
        tracing::debug!(%method, %url, "api request");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        if !(200..300).contains(&status) {
            let err = ApiError::from_response(status, &text);
            if err.is_unauthorized() {
                tracing::debug!(%method, %url, "api request unauthorized");
            } else {
                tracing::warn!(%method, %url, status, error = %err, "api request failed");
            }
            return Err(err);
        }
        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.send::<()>(Method::GET, path, None).await?;
        decode(&text)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let text = self.send(Method::POST, path, Some(body)).await?;
        decode(&text)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl LmsApi for HttpApi {
    async fn current_user(&self) -> Result<User, ApiError> {
        self.get_json(&self.config.identity_path).await
    }

    async fn login_with_google(&self, token: &str) -> Result<Option<User>, ApiError> {
        let text = self
            .send(Method::POST, "/auth/google", Some(&GoogleLogin { token }))
            .await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let response: LoginResponse = decode(&text)?;
        Ok(response.into_user())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send(Method::POST, "/auth/logout", Some(&serde_json::json!({})))
            .await?;
        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get_json("/courses").await
    }

    async fn get_course(&self, course_id: &Id) -> Result<Course, ApiError> {
        self.get_json(&format!("/courses/{course_id}")).await
    }

    async fn create_course(&self, input: &NewCourse) -> Result<Course, ApiError> {
        self.post_json("/courses", input).await
    }

    async fn list_modules(&self, course_id: &Id) -> Result<Vec<Module>, ApiError> {
        self.get_json(&format!("/courses/{course_id}/modules"))
            .await
    }

    async fn create_module(&self, course_id: &Id, input: &NewModule) -> Result<Module, ApiError> {
        self.post_json(&format!("/courses/{course_id}/modules"), input)
            .await
    }

    async fn list_units(&self, module_id: &Id) -> Result<Vec<Unit>, ApiError> {
        self.get_json(&format!("/modules/{module_id}/units"))
            .await
    }

    async fn create_unit(&self, module_id: &Id, input: &NewUnit) -> Result<Unit, ApiError> {
        self.post_json(&format!("/modules/{module_id}/units"), input)
            .await
    }
}
