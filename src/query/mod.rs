//! Query side: bounded views, snippets and the work registry
//!
//! - [`view`] - Case-insensitive search restricted to a byte range
//! - [`snippet`] - Context windows around matches
//! - [`registry`] - Named works routed to their views

pub mod registry;
pub mod snippet;
pub mod view;

pub use registry::{ALL_WORKS, Registry, WorkRange, WorkTable, default_works};
pub use snippet::{DEFAULT_CONTEXT, Snippet};
pub use view::View;
