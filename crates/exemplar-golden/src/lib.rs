//! Fixture corpus runner for the Exemplar engine
//!
//! Fixtures are language-neutral JSON files shaped as
//! `{ group: { name: { set: [ { in, out | err }, ... ] } } }`. The runner
//! feeds each entry to a subject closure and compares what comes back,
//! so this crate knows nothing about the engine it checks.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod corpus;
pub mod diff;
pub mod runner;

use std::path::PathBuf;
use thiserror::Error;

pub use corpus::{CorpusManager, Fixture, FixtureEntry, NULLMARK, UNDEFMARK};
pub use diff::{DiffEngine, DiffOptions, DiffResult};
pub use runner::{EntryFailure, FixtureResult, GoldenTestRunner};

/// Golden test error types
#[derive(Debug, Error)]
pub enum GoldenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corpus error: {0}")]
    CorpusError(String),

    #[error("Test failed: {0}")]
    TestFailed(String),
}

pub type Result<T> = std::result::Result<T, GoldenError>;

/// Configuration for golden tests
#[derive(Debug, Clone)]
pub struct GoldenConfig {
    /// Root directory of the fixture corpus
    pub corpus_dir: PathBuf,

    /// Diff options
    pub diff_options: DiffOptions,

    /// Print every result, not just failures
    pub verbose: bool,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures"),
            diff_options: DiffOptions::default(),
            verbose: false,
        }
    }
}

impl GoldenConfig {
    /// Create config from environment and defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(corpus_dir) = std::env::var("EXEMPLAR_GOLDEN_DIR") {
            config.corpus_dir = PathBuf::from(corpus_dir);
        }

        if let Ok(verbose) = std::env::var("GOLDEN_VERBOSE") {
            config.verbose = verbose == "1" || verbose.to_lowercase() == "true";
        }

        if std::env::var_os("NO_COLOR").is_some() {
            config.diff_options.colored = false;
        }

        config
    }
}
