use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which input a read error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    SentencePairs,
    Alignments,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::SentencePairs => f.write_str("sentence pairs"),
            Stream::Alignments => f.write_str("alignments"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed reading {stream} at line {line}: {source}")]
    Read {
        stream: Stream,
        line: usize,
        source: io::Error,
    },

    #[error("failed writing lexicon: {source}")]
    Write { source: io::Error },

    #[error("record {record}: malformed alignment token {token:?}, expected <int>-<int>")]
    BadAlignmentToken { record: usize, token: String },

    #[error(
        "record {record}: alignment {token:?} out of range \
         (source has {source_len} tokens, target has {target_len})"
    )]
    IndexOutOfRange {
        record: usize,
        token: String,
        source_len: usize,
        target_len: usize,
    },
}
