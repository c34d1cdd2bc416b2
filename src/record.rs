use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::charset;

/// Separates the source sentence from the target sentence on a training line.
pub const DELIMITER: &str = " ||| ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected 2 sentences, found {count}: {parts:?}")]
    WrongPartCount { count: usize, parts: Vec<String> },

    #[error("malformed alignment token {0:?}")]
    BadToken(String),
}

/// Tokens of one `source ||| target` line, borrowed from the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentencePair<'a> {
    pub source: Vec<&'a str>,
    pub target: Vec<&'a str>,
}

impl<'a> SentencePair<'a> {
    /// Splits on single spaces, so runs of spaces yield empty tokens and the
    /// positions stay the ones the aligner counted.
    pub fn parse(line: &'a str) -> Result<Self, RecordError> {
        let parts: Vec<&str> = charset::trim(line).split(DELIMITER).collect();
        if parts.len() != 2 {
            return Err(RecordError::WrongPartCount {
                count: parts.len(),
                parts: parts.iter().map(|p| p.to_string()).collect(),
            });
        }

        Ok(SentencePair {
            source: parts[0].split(' ').collect(),
            target: parts[1].split(' ').collect(),
        })
    }

    /// Looks up both words of a link, lowercased, as `(target, source)`.
    pub fn word_pair(&self, link: Link) -> Option<(String, String)> {
        let source = self.source.get(link.source)?;
        let target = self.target.get(link.target)?;
        Some((target.to_lowercase(), source.to_lowercase()))
    }
}

/// One `i-j` alignment token: source word `i` aligns to target word `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
}

fn link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(r"^([0-9]+)-([0-9]+)$").expect("valid link pattern"))
}

impl Link {
    pub fn parse(token: &str) -> Result<Self, RecordError> {
        let bad = || RecordError::BadToken(token.to_string());
        let caps = link_regex().captures(token).ok_or_else(bad)?;
        let source = caps[1].parse().map_err(|_| bad())?;
        let target = caps[2].parse().map_err(|_| bad())?;
        Ok(Link { source, target })
    }
}

/// Non-empty tokens of an alignment line, in order.
pub fn alignment_tokens(line: &str) -> impl Iterator<Item = &str> {
    charset::trim(line).split(' ').filter(|t| !t.is_empty())
}
