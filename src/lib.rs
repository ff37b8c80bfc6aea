//! # shakesearch - Anthology Substring Search
//!
//! Case-insensitive substring search over a large, static text corpus such
//! as the Complete Works of Shakespeare. Every occurrence of a query is
//! returned with surrounding context, optionally restricted to one work.
//!
//! ## Architecture
//!
//! - [`index`] - Corpus loading, suffix array, line table and byte bounds
//! - [`query`] - Bounded views, snippets and the work registry
//! - [`server`] - Daemon answering `(work, query)` requests over a Unix socket
//! - [`output`] - Terminal output for results
//! - [`utils`] - Configuration and progress reporting
//!
//! ## Quick Start
//!
//! ```no_run
//! use shakesearch::index::Corpus;
//! use shakesearch::query::View;
//! use std::path::Path;
//!
//! let corpus = Corpus::load(Path::new("completeworks.txt")).unwrap();
//!
//! // Whole corpus
//! let all = View::unrestricted(corpus.clone());
//! println!("{} matches", all.search("Romeo").len());
//!
//! // Lines 121875..127131 only
//! let rnj = View::with_bound(corpus, 121875, 127131).unwrap();
//! for snippet in rnj.search("wherefore") {
//!     println!("{snippet}");
//! }
//! ```
//!
//! The corpus, its suffix array and its line table are built once and never
//! mutated; views share them through an `Arc` and may be searched from any
//! number of threads.

pub mod error;
pub mod index;
pub mod output;
pub mod query;
#[cfg(unix)]
pub mod server;
pub mod utils;

pub use error::{LoadError, RangeError};
