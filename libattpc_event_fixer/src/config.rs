use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::verifier::DEFAULT_TIMESTAMP_TOLERANCE;

/// Structure representing the application configuration. Contains pathing and run information.
/// Built directly from the command line; the tool takes a data directory and
/// an inclusive run range.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub first_run_number: i32,
    pub last_run_number: i32,
    pub timestamp_tolerance: f64,
}

impl Config {
    /// Generate a new Config object, checking that the data directory exists
    pub fn new(
        data_path: &Path,
        first_run_number: i32,
        last_run_number: i32,
    ) -> Result<Self, ConfigError> {
        if !data_path.exists() {
            return Err(ConfigError::BadFilePath(data_path.to_path_buf()));
        }
        Ok(Self {
            data_path: data_path.to_path_buf(),
            first_run_number,
            last_run_number,
            timestamp_tolerance: DEFAULT_TIMESTAMP_TOLERANCE,
        })
    }

    /// Check if a specific run exists by evaluating the existance of the merged file
    pub fn does_run_exist(&self, run_number: i32) -> bool {
        self.get_run_file_name(run_number).exists()
    }

    /// Get the path to the merged hdf5 file of a run
    pub fn get_run_file_name(&self, run_number: i32) -> PathBuf {
        self.data_path
            .join(format!("{}.h5", self.get_run_str(run_number)))
    }

    /// Construct the run string using the AT-TPC DAQ format
    fn get_run_str(&self, run_number: i32) -> String {
        format!("run_{run_number:0>4}")
    }

    pub fn is_run_range_valid(&self) -> bool {
        self.first_run_number <= self.last_run_number
    }
}
