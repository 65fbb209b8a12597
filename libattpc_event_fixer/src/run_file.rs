use std::fmt::Display;
use std::path::Path;

use fxhash::FxHashMap;
use hdf5::File;
use ndarray::Array1;

use super::error::RunFileError;

const META_GROUP_NAME: &str = "meta";
const META_DSET_NAME: &str = "meta";
const GET_GROUP_NAME: &str = "get";
const FRIB_GROUP_NAME: &str = "frib";
const FRIB_EVT_GROUP_NAME: &str = "evt";
const FRIB_EVT_PATH: &str = "frib/evt";
const EVENT_PREFIX: &str = "evt";
const HEADER_SUFFIX: &str = "_header";
// Staging prefix used while renumbering; never parses as an event key
const STAGING_PREFIX: &str = "fixtmp_";

// Positions inside the meta dataset
const META_MIN_EVENT: usize = 0;
const META_MAX_EVENT: usize = 2;

/// Which DAQ's datasets to operate on. Both sides of the file use the same
/// key scheme, but their header layouts differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Get,
    Frib,
}

impl EventSource {
    /// Path of the group holding this DAQ's event datasets
    fn group_path(&self) -> &'static str {
        match self {
            EventSource::Get => GET_GROUP_NAME,
            EventSource::Frib => FRIB_EVT_PATH,
        }
    }

    /// Position of the hardware timestamp in this DAQ's header dataset
    fn timestamp_index(&self) -> usize {
        match self {
            EventSource::Get => 2,
            EventSource::Frib => 1,
        }
    }
}

impl Display for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventSource::Get => write!(f, "GET"),
            EventSource::Frib => write!(f, "FRIBDAQ"),
        }
    }
}

/// One recorded event: the number carried in its dataset keys and the
/// hardware timestamp read from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub number: u64,
    pub timestamp: u64,
}

/// A simple struct which wraps around the hdf5-rust library.
///
/// Opens a merged run file in place for repair. Files follow the original
/// AT-TPC merged format, where an event's number lives in its dataset keys
/// rather than in the data itself.
#[derive(Debug)]
pub struct RunFile {
    file_handle: File,
}
// Structure
// |---- meta
// |    |---- meta(dset) - min_event, min_get_ts, max_event, max_get_ts
// |---- get
// |    |---- evt#_data(dset)
// |    |---- evt#_header(dset) - timestamp at index 2
// |---- frib
// |    |---- evt
// |    |    |---- evt#_header(dset) - timestamp at index 1
// |    |    |---- evt#_1903(dset)

impl RunFile {
    /// Open a run file for modification
    pub fn open(path: &Path) -> Result<Self, RunFileError> {
        if !path.exists() {
            return Err(RunFileError::BadFilePath(path.to_path_buf()));
        }
        Ok(Self {
            file_handle: File::open_rw(path)?,
        })
    }

    /// Size of the file on disk in bytes
    pub fn size_bytes(&self) -> u64 {
        self.file_handle.size()
    }

    /// Whether the file holds any FRIBDAQ event data. Runs recorded without
    /// the FRIBDAQ side are valid and skip the alignment stage.
    pub fn has_frib_events(&self) -> Result<bool, RunFileError> {
        if !member_exists(&self.file_handle, FRIB_GROUP_NAME)? {
            return Ok(false);
        }
        let frib_group = self.file_handle.group(FRIB_GROUP_NAME)?;
        if !member_exists(&frib_group, FRIB_EVT_GROUP_NAME)? {
            return Ok(false);
        }
        let evt_group = frib_group.group(FRIB_EVT_GROUP_NAME)?;
        Ok(evt_group
            .member_names()?
            .iter()
            .any(|key| split_event_key(key).is_some()))
    }

    /// Read every event on one side of the file, in acquisition order.
    ///
    /// The numbers come from the dataset keys (the numbering that may be about
    /// to be rewritten), the timestamps from each event's header. Key order
    /// stops matching acquisition order the moment a counter misbehaves, so
    /// records are ordered by timestamp instead.
    pub fn scan_events(&self, source: EventSource) -> Result<Vec<EventRecord>, RunFileError> {
        let group = self.event_group(source)?;
        let ts_index = source.timestamp_index();
        let mut records = Vec::new();
        for key in group.member_names()? {
            let Some((number, suffix)) = split_event_key(&key) else {
                continue;
            };
            if suffix != HEADER_SUFFIX {
                continue;
            }
            // Headers were written with mixed dtypes over the years; read as
            // f64 and let HDF5 convert
            let header: Vec<f64> = group.dataset(&key)?.read_raw()?;
            if header.len() <= ts_index {
                return Err(RunFileError::ShortHeader {
                    key,
                    len: header.len(),
                    index: ts_index,
                });
            }
            records.push(EventRecord {
                number,
                timestamp: header[ts_index] as u64,
            });
        }
        records.sort_by_key(|record| (record.timestamp, record.number));
        Ok(records)
    }

    /// Rewrite one side's numbering according to `mapping` (old number to new).
    ///
    /// Every dataset keyed by an old number is relinked, whatever its suffix.
    /// Events move to staging keys first and to their final keys only after
    /// all originals are cleared; renaming a block of events in place
    /// collides with itself in one direction or the other, and the two passes
    /// make the rewrite order-free. Dataset contents are untouched.
    pub fn renumber_events(
        &mut self,
        source: EventSource,
        mapping: &FxHashMap<u64, u64>,
    ) -> Result<(), RunFileError> {
        let group = self.event_group(source)?;
        let mut staged: Vec<(String, String)> = Vec::new();
        for key in group.member_names()? {
            let Some((number, suffix)) = split_event_key(&key) else {
                continue;
            };
            let Some(new_number) = mapping.get(&number) else {
                continue;
            };
            if *new_number == number {
                continue;
            }
            let final_key = format!("{EVENT_PREFIX}{new_number}{suffix}");
            let staging_key = format!("{STAGING_PREFIX}{final_key}");
            group.relink(&key, &staging_key)?;
            staged.push((staging_key, final_key));
        }
        for (staging_key, final_key) in staged.iter() {
            group.relink(staging_key, final_key)?;
        }
        Ok(())
    }

    /// Event bounds recorded in the meta dataset, if the file carries one
    pub fn meta_event_bounds(&self) -> Result<Option<(u64, u64)>, RunFileError> {
        if !member_exists(&self.file_handle, META_GROUP_NAME)? {
            return Ok(None);
        }
        let meta_group = self.file_handle.group(META_GROUP_NAME)?;
        if !member_exists(&meta_group, META_DSET_NAME)? {
            return Ok(None);
        }
        let values: Vec<f64> = meta_group.dataset(META_DSET_NAME)?.read_raw()?;
        if values.len() <= META_MAX_EVENT {
            return Ok(None);
        }
        Ok(Some((
            values[META_MIN_EVENT] as u64,
            values[META_MAX_EVENT] as u64,
        )))
    }

    /// Rewrite the meta event bounds after a renumbering. The timestamp
    /// bounds are left as recorded, since renumbering does not touch clocks.
    pub fn rewrite_meta_event_bounds(
        &mut self,
        min_event: u64,
        max_event: u64,
    ) -> Result<(), RunFileError> {
        let dataset = self
            .file_handle
            .group(META_GROUP_NAME)?
            .dataset(META_DSET_NAME)?;
        let mut values: Array1<f64> = dataset.read_1d()?;
        if values.len() <= META_MAX_EVENT {
            return Ok(());
        }
        values[META_MIN_EVENT] = min_event as f64;
        values[META_MAX_EVENT] = max_event as f64;
        dataset.write(&values)?;
        Ok(())
    }

    fn event_group(&self, source: EventSource) -> Result<hdf5::Group, RunFileError> {
        self.file_handle
            .group(source.group_path())
            .map_err(|_| RunFileError::MissingGroup(source))
    }
}

fn member_exists(group: &hdf5::Group, name: &str) -> Result<bool, RunFileError> {
    Ok(group.member_names()?.iter().any(|member| member == name))
}

/// Split a dataset key of the form `evt{number}{suffix}`, e.g. `evt52_header`
/// into (52, "_header"). Keys outside the scheme return None.
fn split_event_key(key: &str) -> Option<(u64, &str)> {
    let rest = key.strip_prefix(EVENT_PREFIX)?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let number = rest[..digits_end].parse().ok()?;
    Some((number, &rest[digits_end..]))
}
