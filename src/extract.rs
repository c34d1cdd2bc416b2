use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use tracing::{info, warn};

use crate::charset::is_strange;
use crate::error::ExtractError;
use crate::reader::{RawRecord, Records};
use crate::record::{alignment_tokens, Link, SentencePair};

/// What to do with an alignment token that is malformed or points past the
/// end of its sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentPolicy {
    /// Abort the run with an error.
    #[default]
    Strict,
    /// Log the token, count it, and move on.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub policy: AlignmentPolicy,
    /// Progress is logged whenever the completed count is a multiple of this.
    pub progress_interval: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            policy: AlignmentPolicy::Strict,
            progress_interval: 10_000,
        }
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub records_completed: usize,
    pub records_malformed: usize,
    pub pairs_written: usize,
    pub pairs_strange: usize,
    pub alignments_skipped: usize,
    pub invalid_lines: usize,
}

/// The three files of a lexicon build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconPaths {
    pub train_data: PathBuf,
    pub aligned_file: PathBuf,
    pub output_file: PathBuf,
}

/// Opens the inputs, truncates the output and runs [`extract`] over them.
pub fn build_lexicon(
    paths: &LexiconPaths,
    options: &ExtractOptions,
) -> Result<ExtractStats, ExtractError> {
    let open = |path: &PathBuf| {
        File::open(path).map_err(|source| ExtractError::Open {
            path: path.clone(),
            source,
        })
    };
    let pairs = BufReader::new(open(&paths.train_data)?);
    let alignments = BufReader::new(open(&paths.aligned_file)?);
    let output = File::create(&paths.output_file).map_err(|source| ExtractError::Open {
        path: paths.output_file.clone(),
        source,
    })?;

    info!(
        "Building lexicon from {:?} and {:?} into {:?}",
        paths.train_data, paths.aligned_file, paths.output_file
    );
    extract(pairs, alignments, BufWriter::new(output), options)
}

/// Writes one `target source` line per accepted aligned word pair.
///
/// Malformed sentence-pair lines and pairs with strange characters are
/// skipped. Bad alignment tokens follow `options.policy`. On error, `out` is
/// left holding whatever was written before the failure.
pub fn extract<P, A, W>(
    pairs: P,
    alignments: A,
    out: W,
    options: &ExtractOptions,
) -> Result<ExtractStats, ExtractError>
where
    P: BufRead,
    A: BufRead,
    W: Write,
{
    let mut extractor = Extractor {
        out,
        options,
        stats: ExtractStats::default(),
        last_reported: None,
    };

    let mut records = Records::new(pairs, alignments);
    for record in records.by_ref() {
        extractor.process(&record?)?;
    }
    extractor
        .out
        .flush()
        .map_err(|source| ExtractError::Write { source })?;

    let mut stats = extractor.stats;
    stats.invalid_lines = records.invalid_lines();
    info!(
        "Done: {} sentence pairs, {} pairs written, {} strange, {} malformed records, \
         {} alignments skipped, {} lines with encoding errors",
        stats.records_completed,
        stats.pairs_written,
        stats.pairs_strange,
        stats.records_malformed,
        stats.alignments_skipped,
        stats.invalid_lines
    );
    Ok(stats)
}

struct Extractor<'o, W> {
    out: W,
    options: &'o ExtractOptions,
    stats: ExtractStats,
    last_reported: Option<usize>,
}

impl<W: Write> Extractor<'_, W> {
    fn report_progress(&mut self) {
        let completed = self.stats.records_completed;
        if completed % self.options.progress_interval.max(1) == 0
            && self.last_reported != Some(completed)
        {
            info!("Completed {} sentence pairs", completed);
            self.last_reported = Some(completed);
        }
    }

    fn process(&mut self, record: &RawRecord) -> Result<(), ExtractError> {
        self.report_progress();

        let pair = match SentencePair::parse(&record.pair) {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Error on record {}: {}", record.index, e);
                self.stats.records_malformed += 1;
                return Ok(());
            }
        };

        for token in alignment_tokens(&record.alignment) {
            let link = match Link::parse(token) {
                Ok(link) => link,
                Err(_) => {
                    self.reject(ExtractError::BadAlignmentToken {
                        record: record.index,
                        token: token.to_string(),
                    })?;
                    continue;
                }
            };

            let Some((target, source)) = pair.word_pair(link) else {
                self.reject(ExtractError::IndexOutOfRange {
                    record: record.index,
                    token: token.to_string(),
                    source_len: pair.source.len(),
                    target_len: pair.target.len(),
                })?;
                continue;
            };

            if is_strange(&source) || is_strange(&target) {
                self.stats.pairs_strange += 1;
                warn!("Strange character found, source {}, target {}", source, target);
                continue;
            }

            writeln!(self.out, "{} {}", target, source)
                .map_err(|e| ExtractError::Write { source: e })?;
            self.stats.pairs_written += 1;
        }

        self.stats.records_completed += 1;
        Ok(())
    }

    fn reject(&mut self, err: ExtractError) -> Result<(), ExtractError> {
        match self.options.policy {
            AlignmentPolicy::Strict => Err(err),
            AlignmentPolicy::Lenient => {
                warn!("Skipping alignment: {}", err);
                self.stats.alignments_skipped += 1;
                Ok(())
            }
        }
    }
}
