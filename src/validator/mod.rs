//! # Validator
//!
//! Runs postcli for a single data file and classifies what it printed.
//! Capturing output and classifying it are separate so the matching rule can
//! be exercised without launching a process.

pub mod postcli;

use std::fmt;

use memchr::memmem;
use thiserror::Error;
use tracing::warn;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Verdict for one data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
    /// Output matched neither marker. Reported as a failure.
    Unknown,
}

impl Outcome {
    pub fn is_valid(self) -> bool {
        matches!(self, Outcome::Valid)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Valid => "valid",
            Outcome::Invalid => "invalid",
            Outcome::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Output captured from one postcli invocation.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    /// Stdout followed by stderr.
    pub fn combined(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.stdout.len() + self.stderr.len());
        out.extend_from_slice(&self.stdout);
        out.extend_from_slice(&self.stderr);
        out
    }
}

/// Produces postcli output for a file index.
pub trait OutputSource {
    fn capture(&self, file_index: u64) -> Result<CapturedOutput, ValidatorError>;
}

/// The two literal substrings postcli uses to report a verdict.
#[derive(Debug, Clone)]
pub struct Markers {
    success: Vec<u8>,
    failure: Vec<u8>,
}

impl Markers {
    pub fn new(success: &str, failure: &str) -> Self {
        Self {
            success: success.as_bytes().to_vec(),
            failure: failure.as_bytes().to_vec(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.success_marker, &cfg.failure_marker)
    }

    /// Success marker wins over failure marker; neither yields `Unknown`.
    pub fn classify(&self, output: &[u8]) -> Outcome {
        if memmem::find(output, &self.success).is_some() {
            Outcome::Valid
        } else if memmem::find(output, &self.failure).is_some() {
            Outcome::Invalid
        } else {
            Outcome::Unknown
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::new(
            crate::constants::SUCCESS_MARKER,
            crate::constants::FAILURE_MARKER,
        )
    }
}

/// Validates data files one at a time through an [`OutputSource`].
pub trait FileValidator {
    fn validate(&self, file_index: u64) -> Outcome;
}

pub struct Validator<S> {
    source: S,
    markers: Markers,
}

impl<S: OutputSource> Validator<S> {
    pub fn new(source: S, markers: Markers) -> Self {
        Self { source, markers }
    }
}

impl<S: OutputSource> FileValidator for Validator<S> {
    fn validate(&self, file_index: u64) -> Outcome {
        let captured = match self.source.capture(file_index) {
            Ok(captured) => captured,
            Err(err) => {
                warn!("file {file_index}: {err}; treating as failure");
                return Outcome::Unknown;
            }
        };
        let outcome = self.markers.classify(&captured.combined());
        if outcome == Outcome::Unknown {
            warn!(
                "unexpected output for file {file_index} (exit code {:?}); treating as failure",
                captured.exit_code
            );
        }
        outcome
    }
}
