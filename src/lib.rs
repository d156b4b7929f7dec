//! Client core for a classroom LMS backend.
//!
//! The crate keeps two pieces of client state in sync: who is signed in,
//! and the course resources that depend on it. Course data is only fetched
//! once the session is known, is dropped on logout, and late responses
//! from superseded requests are discarded.
//!
//! - [`net`]: JSON contract and the HTTP client behind the [`net::LmsApi`] trait
//! - [`state`]: observable stores for the session and courses
//! - [`view`]: pure gating rules and text rendering
//! - [`app`]: composition root with `init`/`teardown`
//! - [`config`]: environment-driven client settings

pub mod app;
pub mod config;
pub mod net;
pub mod state;
pub mod view;
