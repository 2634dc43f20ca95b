use std::path::PathBuf;

use cellflow_common::exit_code;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read record {line} of {path}: {source}")]
    Scan {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("cannot encode results: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IoError {
    pub fn exit_code(&self) -> u8 {
        match self {
            IoError::Open { .. } => exit_code::INPUT_FILE_OPEN,
            IoError::Scan { .. } => exit_code::INPUT_FILE_SCAN,
            IoError::Encode(_) | IoError::Write { .. } => exit_code::OUTPUT_FILE_WRITE,
        }
    }
}
