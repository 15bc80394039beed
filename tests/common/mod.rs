//! Shared fixtures for run tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use spudcheck::run::RunOptions;
use spudcheck::run::RunSummary;
use spudcheck::run::progress::ProgressReporter;
use spudcheck::validator::{CapturedOutput, Outcome, OutputSource, ValidatorError};

pub const VALID: &str = "2024-05-01T10:00:00Z INFO verifying\ncli: POS data is valid\n";
pub const INVALID: &str = "cli: invalid POS: label 1234 has wrong value\n";
pub const GARBAGE: &str = "panic: runtime error: index out of range\n";

/// A data directory with a postcli stand-in file next to it.
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub data_dir: PathBuf,
    pub postcli_path: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_dir = dir.path().join("post");
        fs::create_dir_all(&data_dir).expect("data dir");
        let postcli_path = dir.path().join("postcli");
        fs::write(&postcli_path, b"").expect("postcli placeholder");
        Self {
            dir,
            data_dir,
            postcli_path,
        }
    }

    pub fn with_metadata(json: &str) -> Self {
        let ws = Self::new();
        fs::write(ws.data_dir.join("postdata_metadata.json"), json).expect("metadata");
        ws
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            run_id: "test_run".to_string(),
            config_hash: "0".repeat(64),
            postcli_path: self.postcli_path.clone(),
            data_dir: self.data_dir.clone(),
            fraction: 0.001,
            assume_yes: false,
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.data_dir.join("failed_validations.csv")
    }

    pub fn read_report(&self) -> Option<String> {
        fs::read_to_string(self.report_path()).ok()
    }
}

/// Replays canned postcli output per file index and records every call.
#[derive(Default)]
pub struct ScriptedSource {
    outputs: HashMap<u64, CapturedOutput>,
    pub calls: RefCell<Vec<u64>>,
}

impl ScriptedSource {
    pub fn new(outputs: &[(u64, &str)]) -> Self {
        let outputs = outputs
            .iter()
            .map(|(index, text)| {
                (
                    *index,
                    CapturedOutput {
                        stdout: text.as_bytes().to_vec(),
                        stderr: Vec::new(),
                        exit_code: Some(0),
                    },
                )
            })
            .collect();
        Self {
            outputs,
            calls: RefCell::default(),
        }
    }
}

impl OutputSource for &ScriptedSource {
    fn capture(&self, file_index: u64) -> Result<CapturedOutput, ValidatorError> {
        self.calls.borrow_mut().push(file_index);
        Ok(self.outputs.get(&file_index).cloned().unwrap_or_default())
    }
}

/// Collects progress events instead of printing them.
#[derive(Default)]
pub struct RecordingReporter {
    pub started: RefCell<Vec<u64>>,
    pub done: RefCell<Vec<(u64, Outcome)>>,
    pub finished: RefCell<Option<RunSummary>>,
}

impl ProgressReporter for RecordingReporter {
    fn on_file_start(&self, file_index: u64, _total_files: u64) {
        self.started.borrow_mut().push(file_index);
    }

    fn on_file_done(&self, file_index: u64, outcome: Outcome) {
        self.done.borrow_mut().push((file_index, outcome));
    }

    fn on_finish(&self, summary: &RunSummary) {
        *self.finished.borrow_mut() = Some(summary.clone());
    }
}
