use std::fmt::Display;

/// Allowed clock disagreement, in timestamp ticks.
///
/// The GET and FRIBDAQ timestamps come from separate hardware counters
/// running on the same clock, started at different moments. After removing
/// the start offset the elapsed times should agree to within a tick.
pub const DEFAULT_TIMESTAMP_TOLERANCE: f64 = 1.0;

/// A paired event whose two DAQs disagree on how much time has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampMismatch {
    pub event: u64,
    pub get_elapsed: u64,
    pub frib_elapsed: u64,
    pub deviation: f64,
}

impl Display for TimestampMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "event {}: GET clock advanced {} ticks but FRIBDAQ advanced {} (off by {})",
            self.event, self.get_elapsed, self.frib_elapsed, self.deviation
        )
    }
}

/// Compare elapsed time between the two DAQs for every aligned pair.
///
/// The first pair anchors both clocks; each later pair is checked on elapsed
/// ticks since that anchor. Every pair outside `tolerance` is returned, so a
/// run that drifted reports the full extent rather than the first symptom.
/// The numbering itself is not touched. Mismatches here mean the events were
/// paired wrong at merge time (or an event was dropped), which renumbering
/// cannot repair.
pub fn verify_timestamps(
    numbers: &[u64],
    get_stamps: &[u64],
    frib_stamps: &[u64],
    tolerance: f64,
) -> Vec<TimestampMismatch> {
    if get_stamps.is_empty() || frib_stamps.is_empty() {
        return Vec::new();
    }

    let get_start = get_stamps[0];
    let frib_start = frib_stamps[0];

    numbers
        .iter()
        .zip(get_stamps.iter().zip(frib_stamps.iter()))
        .filter_map(|(number, (get_stamp, frib_stamp))| {
            // Stamps are in acquisition order, so elapsed never underflows.
            let get_elapsed = get_stamp - get_start;
            let frib_elapsed = frib_stamp - frib_start;
            let deviation = get_elapsed as f64 - frib_elapsed as f64;
            if deviation.abs() > tolerance {
                Some(TimestampMismatch {
                    event: *number,
                    get_elapsed,
                    frib_elapsed,
                    deviation,
                })
            } else {
                None
            }
        })
        .collect()
}
