//! Fixed names and sizes shared with postcli and the POST data layout.

/// Metadata sidecar written by postcli next to the POST data files.
pub const METADATA_FILE_NAME: &str = "postdata_metadata.json";

/// Report written into the data directory at the end of a run.
pub const REPORT_FILE_NAME: &str = "failed_validations.csv";

/// Bytes of POST data per space unit (64 GiB).
pub const UNIT_SIZE_BYTES: u64 = 64 * 1024 * 1024 * 1024;

pub const SUCCESS_MARKER: &str = "cli: POS data is valid";
pub const FAILURE_MARKER: &str = "cli: invalid POS:";

pub const DEFAULT_FRACTION: f64 = 0.001;
