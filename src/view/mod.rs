//! Pure view models derived from store snapshots.
//!
//! Nothing here performs I/O or holds state. Each function takes snapshots
//! and returns what a front-end should show; [`render`] turns those into
//! text for the terminal.

pub mod classwork;
pub mod gate;
pub mod navbar;
pub mod render;

pub use classwork::{Classwork, ModuleView, UnitView};
pub use gate::{Access, Gate};
pub use navbar::NavControl;
