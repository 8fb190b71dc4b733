//! Module definitions for the rustvfs interface
//!
//! ## Interface Module
//!
//! Thin wrapper layer over the libraries the fd server depends on. Libraries
//! are imported only via `use` statements within these files so the rest of
//! the crate programs against one slim, swappable surface.

pub mod errnos;
mod misc;
mod types;
pub use errnos::*;
pub use misc::*;
pub use types::*;
