use std::path::PathBuf;
use thiserror::Error;

use super::run_file::EventSource;
use super::status::ProcessStatus;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Data directory {0:?} does not exist")]
    BadFilePath(PathBuf),
}

#[derive(Debug, Error)]
pub enum RunFileError {
    #[error("Could not open run file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Run file has no {0} event group to rewrite")]
    MissingGroup(EventSource),
    #[error("Event header {key} holds {len} values; timestamp index {index} is out of range")]
    ShortHeader {
        key: String,
        len: usize,
        index: usize,
    },
    #[error("Run file failed due to HDF5 error: {0}")]
    HDF5Error(#[from] hdf5::Error),
    #[error("Run file failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Error)]
pub enum AlignmentError {
    #[error("GET recorded {get_events} events but FRIB recorded {frib_events}; the sequences cannot be reconciled")]
    LengthMismatch {
        get_events: usize,
        frib_events: usize,
    },
    #[error("No single offset aligns FRIB numbering with GET; first divergence at pair {index} (GET {get_number}, FRIB {frib_number})")]
    NoUniformOffset {
        index: usize,
        get_number: u64,
        frib_number: u64,
    },
    #[error("FRIB numbering drops at positions {positions:?} but no reset split reconciles the run")]
    UnresolvedReset { positions: Vec<usize> },
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to RunFile error: {0}")]
    RunFileError(#[from] RunFileError),
    #[error("Run could not be aligned: {0}")]
    AlignmentError(#[from] AlignmentError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<ProcessStatus>),
}
