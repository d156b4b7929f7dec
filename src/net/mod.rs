//! Network layer: wire types, errors, and the REST client.
//!
//! DESIGN
//! ======
//! Stores talk to the backend only through the [`api::LmsApi`] trait.
//! The HTTP implementation keeps the session cookie in its own jar.

pub mod api;
pub mod error;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use api::{HttpApi, LmsApi};
pub use error::ApiError;
