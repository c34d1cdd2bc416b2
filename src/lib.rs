//! Builds a bilingual lexicon from word-aligned parallel text.
//!
//! The inputs are a `source ||| target` training file and the aligner's
//! `i-j` output for it. The result has one `target source` line per aligned
//! word pair.

pub mod charset;
pub mod error;
pub mod extract;
pub mod reader;
pub mod record;

pub use error::{ExtractError, Stream};
pub use extract::{
    build_lexicon, extract, AlignmentPolicy, ExtractOptions, ExtractStats, LexiconPaths,
};
pub use record::{Link, RecordError, SentencePair};
