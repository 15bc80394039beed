//! # POST Metadata
//!
//! Reads `postdata_metadata.json` from a POST data directory and derives how
//! many data files the directory should hold.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::{METADATA_FILE_NAME, UNIT_SIZE_BYTES};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata file {} not found", path.display())]
    NotFound { path: PathBuf },
    #[error("metadata file {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("metadata is missing required key {0}")]
    MissingField(&'static str),
    #[error("metadata key {field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The subset of POST metadata this tool needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostMetadata {
    pub num_units: u64,
    pub max_file_size: u64,
}

impl PostMetadata {
    /// Parse metadata from raw JSON bytes. `path` is only used in errors.
    ///
    /// The document must be a JSON object; keys other than `NumUnits` and
    /// `MaxFileSize` are ignored.
    pub fn from_slice(bytes: &[u8], path: &Path) -> Result<Self, MetadataError> {
        let object: Map<String, Value> =
            serde_json::from_slice(bytes).map_err(|source| MetadataError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            num_units: required_u64(&object, "NumUnits", path)?,
            max_file_size: required_u64(&object, "MaxFileSize", path)?,
        })
    }

    /// Total bytes of POST data described by the metadata.
    pub fn total_space(&self) -> u128 {
        u128::from(self.num_units) * u128::from(UNIT_SIZE_BYTES)
    }

    /// Number of data files: `NumUnits * 64 GiB / MaxFileSize`, rounded down.
    pub fn file_count(&self) -> Result<u64, MetadataError> {
        if self.max_file_size == 0 {
            return Err(MetadataError::InvalidField {
                field: "MaxFileSize",
                reason: "must be greater than zero".to_string(),
            });
        }
        let count = self.total_space() / u128::from(self.max_file_size);
        u64::try_from(count).map_err(|_| MetadataError::InvalidField {
            field: "NumUnits",
            reason: format!("file count {count} does not fit in 64 bits"),
        })
    }
}

/// A null value counts as absent.
fn required_u64(
    object: &Map<String, Value>,
    key: &'static str,
    path: &Path,
) -> Result<u64, MetadataError> {
    let value = object
        .get(key)
        .filter(|value| !value.is_null())
        .ok_or(MetadataError::MissingField(key))?;
    u64::deserialize(value).map_err(|source| MetadataError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Path of the metadata sidecar inside `data_dir`.
pub fn metadata_path(data_dir: &Path) -> PathBuf {
    data_dir.join(METADATA_FILE_NAME)
}

/// Load and validate the metadata sidecar from `data_dir`.
pub fn load_metadata(data_dir: &Path) -> Result<PostMetadata, MetadataError> {
    let path = metadata_path(data_dir);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(MetadataError::NotFound { path });
        }
        Err(err) => return Err(err.into()),
    };
    PostMetadata::from_slice(&bytes, &path)
}
