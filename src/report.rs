use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::REPORT_FILE_NAME;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Path of the failure report inside `dir`.
pub fn report_path(dir: &Path) -> PathBuf {
    dir.join(REPORT_FILE_NAME)
}

/// Render failed indices as a single comma-separated line without a newline.
pub fn render_failures(failed: &[u64]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    if !failed.is_empty() {
        writer.write_record(failed.iter().map(|index| index.to_string()))?;
    }
    let mut line = writer
        .into_inner()
        .map_err(|err| {
            let inner = err.error();
            ReportError::Io(std::io::Error::new(inner.kind(), inner.to_string()))
        })?;
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    Ok(line)
}

/// Write the failure report into `dir`, replacing any previous one.
pub fn write_failures(dir: &Path, failed: &[u64]) -> Result<PathBuf, ReportError> {
    let path = report_path(dir);
    let line = render_failures(failed)?;
    std::fs::write(&path, line)?;
    Ok(path)
}
