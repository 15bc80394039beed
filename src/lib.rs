//! Sequential validation of Spacemesh POST data files.
//!
//! Reads `postdata_metadata.json` to learn how many data files a directory
//! holds, runs `postcli -verify` for each file in turn and writes the indices
//! that failed to `failed_validations.csv`.

pub mod cli;
pub mod config;
pub mod confirm;
pub mod constants;
pub mod logging;
pub mod metadata;
pub mod report;
pub mod run;
pub mod validator;
