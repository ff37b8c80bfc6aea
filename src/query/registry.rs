//! Named works over one corpus
//!
//! The registry is built once at startup from a table of work names and
//! line ranges. Every view it holds shares the same corpus; they differ only
//! in bound. Requests name a work, or nothing / `"all"` for the whole corpus.

use crate::error::RangeError;
use crate::index::Corpus;
use crate::query::view::View;
use ahash::AHashMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Work name meaning "search everything"
pub const ALL_WORKS: &str = "all";

/// Line range `[start_line, end_line)` of one work, 0-based
///
/// Serialized as a two-element array: `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct WorkRange {
    pub start_line: usize,
    pub end_line: usize,
}

impl WorkRange {
    pub const fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }
}

impl From<[usize; 2]> for WorkRange {
    fn from([start_line, end_line]: [usize; 2]) -> Self {
        Self {
            start_line,
            end_line,
        }
    }
}

impl From<WorkRange> for [usize; 2] {
    fn from(range: WorkRange) -> Self {
        [range.start_line, range.end_line]
    }
}

/// Work name to line range
pub type WorkTable = BTreeMap<String, WorkRange>;

/// Line ranges of the works in the Complete Works of Shakespeare
/// (Project Gutenberg edition)
pub fn default_works() -> WorkTable {
    const WORKS: &[(&str, usize, usize)] = &[
        ("sonnets", 132, 2909),
        ("alls-well", 2910, 7872),
        ("antony-and-cleopatra", 7873, 14513),
        ("as-you-like-it", 14514, 17306),
        ("the-comedy-of-errors", 17306, 20506),
        ("coriolanus", 20507, 24623),
        ("cymbeline", 24624, 30498),
        ("hamlet", 30500, 37186),
        ("henry-iv-1", 37186, 41902),
        ("henry-iv-2", 41902, 45311),
        ("henry-v", 45311, 50245),
        ("henry-vi-1", 50246, 53518),
        ("macbeth", 80513, 84660),
        ("romeo-and-juliet", 121875, 127131),
    ];

    WORKS
        .iter()
        .map(|&(name, start, end)| (name.to_string(), WorkRange::new(start, end)))
        .collect()
}

/// All views over one corpus, by work name
pub struct Registry {
    default_view: View,
    works: AHashMap<String, View>,
    rejected: Vec<(String, RangeError)>,
}

impl Registry {
    /// Build a view for every work in `table`
    ///
    /// A work whose range does not fit the corpus is left out and reported
    /// through [`Registry::rejected`]; the remaining works are unaffected.
    pub fn new(corpus: Arc<Corpus>, table: &WorkTable, context: usize) -> Self {
        let default_view = View::unrestricted(Arc::clone(&corpus)).with_context(context);
        let mut works = AHashMap::with_capacity(table.len());
        let mut rejected = Vec::new();

        for (name, range) in table {
            match View::with_bound(Arc::clone(&corpus), range.start_line, range.end_line) {
                Ok(view) => {
                    debug!("work {}: bytes {:?}", name, view.bound());
                    works.insert(name.clone(), view.with_context(context));
                }
                Err(e) => {
                    warn!("skipping work {}: {}", name, e);
                    rejected.push((name.clone(), e));
                }
            }
        }

        Self {
            default_view,
            works,
            rejected,
        }
    }

    /// Resolve a work name to its view
    ///
    /// An empty name or `"all"` selects the whole corpus.
    pub fn view(&self, work: &str) -> Option<&View> {
        if work.is_empty() || work == ALL_WORKS {
            return Some(&self.default_view);
        }
        self.works.get(work)
    }

    /// Search one work, or `None` if the work is unknown
    pub fn search_in(&self, work: &str, query: &str) -> Option<Vec<String>> {
        match self.view(work) {
            Some(view) => Some(view.search(query)),
            None => {
                warn!("requested work '{}' does not exist", work);
                None
            }
        }
    }

    pub fn default_view(&self) -> &View {
        &self.default_view
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        self.default_view.corpus()
    }

    /// Registered work names, sorted
    pub fn work_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.works.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Works left out because their range did not fit the corpus
    pub fn rejected(&self) -> &[(String, RangeError)] {
        &self.rejected
    }
}
