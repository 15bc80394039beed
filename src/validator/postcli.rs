use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::validator::{CapturedOutput, OutputSource, ValidatorError};

/// Runs `postcli -verify` against one file of a POST data directory.
pub struct PostCliSource {
    program: PathBuf,
    data_dir: PathBuf,
    fraction: f64,
}

impl PostCliSource {
    pub fn new(program: &Path, data_dir: &Path, fraction: f64) -> Self {
        Self {
            program: program.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
            fraction,
        }
    }

    /// Arguments for verifying the inclusive range `[file_index, file_index]`.
    pub fn args(&self, file_index: u64) -> Vec<OsString> {
        let index = file_index.to_string();
        vec![
            "-verify".into(),
            "-datadir".into(),
            self.data_dir.clone().into_os_string(),
            "-fraction".into(),
            self.fraction.to_string().into(),
            "-fromFile".into(),
            index.clone().into(),
            "-toFile".into(),
            index.into(),
        ]
    }
}

impl OutputSource for PostCliSource {
    fn capture(&self, file_index: u64) -> Result<CapturedOutput, ValidatorError> {
        let args = self.args(file_index);
        debug!(
            "executing: {} {}",
            self.program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| ValidatorError::Launch {
                program: self.program.display().to_string(),
                source,
            })?;

        debug!(
            "file {file_index} exited with {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        Ok(CapturedOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code(),
        })
    }
}
