//! Wire types for the LMS REST API.
//!
//! DESIGN
//! ======
//! Response types are lenient where the backend has drifted between
//! releases: ids arrive as UUID strings (courses) or integers (users,
//! modules, units), the unit kind arrives as `unit_type` or `type`, and
//! optional text fields may be `null` or missing. Request types are strict
//! and always serialize the canonical field names.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

// =============================================================================
// IDS
// =============================================================================

/// Opaque entity id. Accepts a JSON string or integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for Id {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

macro_rules! id_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Id {
            fn from(raw: $t) -> Self {
                Self(raw.to_string())
            }
        }
    )*};
}

id_from_int!(i32, i64, u32, u64);

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

// =============================================================================
// USER
// =============================================================================

/// Authenticated user profile returned by the identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    /// Name to show in the UI: the profile name, or the email when unnamed.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

// =============================================================================
// COURSE / MODULE / UNIT
// =============================================================================

/// A course with its nested modules. List responses may omit `modules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub modules: Vec<Module>,
}

impl Course {
    #[must_use]
    pub fn module(&self, module_id: &Id) -> Option<&Module> {
        self.modules.iter().find(|m| &m.id == module_id)
    }

    pub fn module_mut(&mut self, module_id: &Id) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| &m.id == module_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: Id,
    pub title: String,
    #[serde(alias = "type")]
    pub unit_type: UnitType,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

/// Kind of a unit inside a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    #[default]
    Material,
    Assignment,
    Video,
    Quiz,
    Discussion,
    ExternalLink,
    /// Any kind this client does not know about.
    #[serde(other)]
    Unknown,
}

impl UnitType {
    pub const ALL: [Self; 6] =
        [Self::Material, Self::Assignment, Self::Video, Self::Quiz, Self::Discussion, Self::ExternalLink];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Assignment => "assignment",
            Self::Video => "video",
            Self::Quiz => "quiz",
            Self::Discussion => "discussion",
            Self::ExternalLink => "external_link",
            Self::Unknown => "unknown",
        }
    }

    /// Human label, e.g. `external link`.
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown unit type: {raw}"))
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

/// Body of `POST /auth/google`.
#[derive(Debug, Clone, Serialize)]
pub struct GoogleLogin<'a> {
    pub token: &'a str,
}

/// Body of `POST /courses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCourse {
    pub name: String,
    pub description: Option<String>,
}

/// Body of `POST /courses/{id}/modules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewModule {
    pub title: String,
    pub description: Option<String>,
    pub order: Option<i64>,
}

/// Body of `POST /modules/{id}/units`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUnit {
    pub title: String,
    pub unit_type: UnitType,
    pub content: Option<String>,
    pub order: Option<i64>,
}

// =============================================================================
// RESPONSE ENVELOPES
// =============================================================================

/// `POST /auth/google` answers with either `{ "user": {...} }` or the bare
/// profile, depending on backend version. Anything else carries no profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Wrapped { user: User },
    Bare(User),
    Other(serde_json::Value),
}

impl LoginResponse {
    #[must_use]
    pub fn into_user(self) -> Option<User> {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => Some(user),
            Self::Other(_) => None,
        }
    }
}

/// Error body: `{ "detail": "..." }` or `{ "detail": [{ "msg": "..." }] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Items(Vec<ErrorItem>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorItem {
    pub msg: String,
}

impl ErrorDetail {
    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        match self {
            Self::Message(m) => vec![m],
            Self::Items(items) => items.into_iter().map(|i| i.msg).collect(),
        }
    }
}

/// Extract the `detail` messages from a raw error body. Malformed or
/// absent JSON yields no messages.
#[must_use]
pub fn parse_error_detail(body: &str) -> Vec<String> {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail.into_messages())
        .unwrap_or_default()
        .into_iter()
        .filter(|m| !m.trim().is_empty())
        .collect()
}
