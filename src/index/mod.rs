pub mod bound;
pub mod corpus;
pub mod line_index;
pub mod suffix_array;

pub use bound::Bound;
pub use corpus::{Corpus, CorpusStats};
pub use line_index::LineIndex;
pub use suffix_array::SuffixArray;
