//! Utility functions shared by the library and the binary
//!
//! - [`app_data`] - Configuration in the application data directory
//! - [`progress`] - Progress spinner, a no-op without the `progress` feature

pub mod app_data;
pub mod progress;

pub use app_data::*;
