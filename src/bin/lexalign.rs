use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lexalign::{build_lexicon, AlignmentPolicy, ExtractOptions, LexiconPaths};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Abort on a malformed or out-of-range alignment token
    Strict,
    /// Skip such tokens and keep going
    Lenient,
}

impl From<Policy> for AlignmentPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Strict => AlignmentPolicy::Strict,
            Policy::Lenient => AlignmentPolicy::Lenient,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lexalign")]
#[command(about = "Build a lexicon from word-aligned sentence pairs")]
struct Args {
    /// Sentence pairs, one `source ||| target` per line
    #[arg(long)]
    train_data: PathBuf,

    /// Alignment file produced by the aligner on the train data
    #[arg(long)]
    aligned_file: PathBuf,

    /// Lexicon file to write (truncated if it exists)
    #[arg(long)]
    output_file: PathBuf,

    /// How to handle bad alignment tokens
    #[arg(long, value_enum, default_value_t = Policy::Strict)]
    policy: Policy,

    /// Log progress every N sentence pairs
    #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    progress_every: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexalign=info")),
        )
        .init();

    let args = Args::parse();

    let paths = LexiconPaths {
        train_data: args.train_data,
        aligned_file: args.aligned_file,
        output_file: args.output_file,
    };
    let options = ExtractOptions {
        policy: args.policy.into(),
        progress_interval: usize::try_from(args.progress_every)
            .context("--progress-every is too large")?,
    };

    let stats = build_lexicon(&paths, &options)
        .with_context(|| format!("failed to build lexicon {:?}", paths.output_file))?;
    println!("Wrote {} word pairs", stats.pairs_written);

    Ok(())
}
