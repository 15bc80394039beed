//! # Run Progress
//!
//! Console lines emitted while files are validated.

use std::io::Write;

use crate::run::RunSummary;
use crate::validator::Outcome;

/// Progress callbacks for a validation run.
pub trait ProgressReporter {
    fn on_file_start(&self, file_index: u64, total_files: u64);
    fn on_file_done(&self, file_index: u64, outcome: Outcome);
    fn on_finish(&self, summary: &RunSummary);
}

/// Prints progress to stdout.
pub struct ConsoleReporter;

impl ConsoleReporter {
    fn emit(&self, line: std::fmt::Arguments<'_>) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        // A closed stdout must not abort the run.
        let _ = lock.write_fmt(line);
        let _ = lock.write_all(b"\n");
    }
}

impl ProgressReporter for ConsoleReporter {
    fn on_file_start(&self, file_index: u64, total_files: u64) {
        self.emit(format_args!(
            "Checking file {file_index}/{}...",
            total_files.saturating_sub(1)
        ));
    }

    fn on_file_done(&self, file_index: u64, outcome: Outcome) {
        if outcome.is_valid() {
            self.emit(format_args!("File {file_index} passed validation."));
        } else {
            self.emit(format_args!(
                "File {file_index} failed validation ({outcome})."
            ));
        }
    }

    fn on_finish(&self, summary: &RunSummary) {
        if summary.interrupted {
            self.emit(format_args!(
                "Validation interrupted after {} of {} files.",
                summary.files_checked, summary.total_files
            ));
        } else {
            self.emit(format_args!("Validation complete."));
        }
        self.emit(format_args!("Failed files: {}", summary.failed.len()));
        match &summary.report_path {
            Some(path) => self.emit(format_args!("Results written to {}", path.display())),
            None => self.emit(format_args!("No files checked; report not written.")),
        }
    }
}
