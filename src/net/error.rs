//! Errors produced at the HTTP boundary.

use super::types::parse_error_detail;

/// Errors produced by [`LmsApi`](super::api::LmsApi) operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response: connection refused, timeout, TLS failure.
    #[error("network error: {0}")]
    Network(String),

    /// The session cookie is missing or no longer valid.
    #[error("not authenticated")]
    Unauthorized,

    /// A non-success status. `detail` holds the server's messages, if any.
    #[error("{}", status_message(.status, .detail))]
    Status { status: u16, detail: Vec<String> },

    /// The response body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Build the error for a non-success response from its status and body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return Self::Unauthorized;
        }
        Self::Status { status, detail: parse_error_detail(body) }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Individual messages suitable for a list of inline alerts.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Status { detail, .. } if !detail.is_empty() => detail.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn status_message(status: &u16, detail: &[String]) -> String {
    if detail.is_empty() {
        format!("request failed with status {status}")
    } else {
        detail.join("; ")
    }
}
