//! # Run Module
//!
//! Orchestrates a validation run: pre-flight checks, metadata, operator
//! confirmation, the sequential per-file loop and the failure report.

pub mod progress;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::confirm::{self, RunPlan};
use crate::metadata::{self, MetadataError};
use crate::report::{self, ReportError};
use crate::validator::FileValidator;

use progress::ProgressReporter;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{what} not found at {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("failed to write report: {0}")]
    Report(#[from] ReportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub run_id: String,
    /// SHA-256 of the config bytes the run was started with.
    pub config_hash: String,
    pub postcli_path: PathBuf,
    pub data_dir: PathBuf,
    pub fraction: f64,
    /// Skip the confirmation prompt.
    pub assume_yes: bool,
}

/// Result of a finished (possibly interrupted) run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub config_hash: String,
    pub total_files: u64,
    pub files_checked: u64,
    /// Failed file indices in ascending order.
    pub failed: Vec<u64>,
    /// Stopped early by a shutdown request.
    pub interrupted: bool,
    pub elapsed_seconds: f64,
    /// `None` when a shutdown request arrived before any file was checked;
    /// an existing report is then left in place.
    pub report_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Reported(RunSummary),
    /// The operator declined, or a shutdown request arrived before
    /// validation started. No report was written.
    Cancelled,
}

/// Failures collected by the per-file loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationPass {
    pub failed: Vec<u64>,
    pub files_checked: u64,
    pub interrupted: bool,
}

fn require_exists(what: &'static str, path: &Path) -> Result<(), RunError> {
    if path.exists() {
        Ok(())
    } else {
        Err(RunError::NotFound {
            what,
            path: path.to_path_buf(),
        })
    }
}

/// Check inputs and load metadata. Nothing is launched here.
pub fn prepare(opts: &RunOptions) -> Result<RunPlan, RunError> {
    require_exists("postcli executable", &opts.postcli_path)?;
    require_exists("data directory", &opts.data_dir)?;

    let meta = metadata::load_metadata(&opts.data_dir)?;
    let total_files = meta.file_count()?;
    info!(
        "metadata loaded num_units={} max_file_size={} total_files={}",
        meta.num_units, meta.max_file_size, total_files
    );

    Ok(RunPlan {
        postcli_path: opts.postcli_path.clone(),
        data_dir: opts.data_dir.clone(),
        fraction: opts.fraction,
        total_files,
    })
}

/// Validate files `0..total_files` in order, stopping early once `cancel` is set.
///
/// A file whose validation was in flight when the flag was raised is not
/// recorded, since postcli receives the same interrupt.
pub fn validate_all(
    total_files: u64,
    validator: &dyn FileValidator,
    reporter: &dyn ProgressReporter,
    cancel: &AtomicBool,
) -> ValidationPass {
    let mut pass = ValidationPass::default();
    for file_index in 0..total_files {
        if cancel.load(Ordering::Relaxed) {
            pass.interrupted = true;
            break;
        }
        reporter.on_file_start(file_index, total_files);
        let outcome = validator.validate(file_index);
        if cancel.load(Ordering::Relaxed) {
            pass.interrupted = true;
            break;
        }
        debug!("file {file_index} outcome={outcome}");
        if !outcome.is_valid() {
            pass.failed.push(file_index);
        }
        pass.files_checked += 1;
        reporter.on_file_done(file_index, outcome);
    }
    if pass.interrupted {
        info!("shutdown requested; stopping early");
    }
    pass
}

/// Prepare the run and ask the operator. `None` means the run was declined.
pub fn confirm_run<R: BufRead, W: Write>(
    opts: &RunOptions,
    input: &mut R,
    out: &mut W,
) -> Result<Option<RunPlan>, RunError> {
    let plan = prepare(opts)?;

    confirm::write_plan(out, &plan)?;
    if opts.assume_yes {
        info!("confirmation skipped (--yes)");
    } else if !confirm::confirm(input, out)? {
        writeln!(out, "Validation cancelled.")?;
        info!("run {} cancelled by operator", opts.run_id);
        return Ok(None);
    }
    Ok(Some(plan))
}

/// Validate every planned file and write the report.
///
/// An interrupted run that checked no file writes nothing, so a previous
/// report is never replaced by an empty one.
pub fn execute(
    opts: &RunOptions,
    plan: &RunPlan,
    validator: &dyn FileValidator,
    reporter: &dyn ProgressReporter,
    cancel: &AtomicBool,
) -> Result<RunSummary, RunError> {
    let started = Instant::now();
    info!(
        "starting run_id={} postcli={} data_dir={} fraction={} total_files={}",
        opts.run_id,
        plan.postcli_path.display(),
        plan.data_dir.display(),
        plan.fraction,
        plan.total_files
    );

    let pass = validate_all(plan.total_files, validator, reporter, cancel);
    let report_path = if pass.interrupted && pass.files_checked == 0 {
        info!("no files checked; existing report left untouched");
        None
    } else {
        Some(report::write_failures(&plan.data_dir, &pass.failed)?)
    };

    let summary = RunSummary {
        run_id: opts.run_id.clone(),
        config_hash: opts.config_hash.clone(),
        total_files: plan.total_files,
        files_checked: pass.files_checked,
        failed: pass.failed,
        interrupted: pass.interrupted,
        elapsed_seconds: started.elapsed().as_secs_f64(),
        report_path,
    };
    info!(
        "run {} finished checked={} failed={} elapsed={:.1}s config_hash={}",
        summary.run_id,
        summary.files_checked,
        summary.failed.len(),
        summary.elapsed_seconds,
        summary.config_hash
    );
    reporter.on_finish(&summary);

    Ok(summary)
}

/// Run a full validation: prepare, confirm on `input`/`out`, validate, report.
///
/// A shutdown request already pending once confirmation returns cancels the
/// run like a declined prompt.
pub fn run<R: BufRead, W: Write>(
    opts: &RunOptions,
    validator: &dyn FileValidator,
    reporter: &dyn ProgressReporter,
    cancel: &AtomicBool,
    input: &mut R,
    out: &mut W,
) -> Result<RunOutcome, RunError> {
    let Some(plan) = confirm_run(opts, input, out)? else {
        return Ok(RunOutcome::Cancelled);
    };
    if cancel.load(Ordering::Relaxed) {
        info!("shutdown requested before validation started");
        return Ok(RunOutcome::Cancelled);
    }
    let summary = execute(opts, &plan, validator, reporter, cancel)?;
    Ok(RunOutcome::Reported(summary))
}
