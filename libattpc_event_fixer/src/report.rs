use std::fmt::Display;

use super::aligner::FribCorrection;

/// Record of what one run file needed.
///
/// `correction` is None for runs with no FRIBDAQ data at all; a run whose
/// numbering was already consistent carries `Some(FribCorrection::None)`.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_number: i32,
    pub events: usize,
    pub rebase_offset: u64,
    pub correction: Option<FribCorrection>,
    pub timestamp_mismatches: usize,
}

impl RunReport {
    pub fn new(run_number: i32) -> Self {
        Self {
            run_number,
            events: 0,
            rebase_offset: 0,
            correction: None,
            timestamp_mismatches: 0,
        }
    }

    /// True if any dataset in the run was renamed or rewritten.
    pub fn was_modified(&self) -> bool {
        self.rebase_offset != 0
            || !matches!(self.correction, None | Some(FribCorrection::None))
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run {}: {} events, ", self.run_number, self.events)?;
        match self.rebase_offset {
            0 => write!(f, "GET numbering intact, ")?,
            offset => write!(f, "GET rebased by {offset}, ")?,
        }
        match &self.correction {
            Some(correction) => write!(f, "FRIB {correction}, ")?,
            None => write!(f, "no FRIBDAQ data, ")?,
        }
        write!(f, "{} timestamp mismatches", self.timestamp_mismatches)
    }
}

/// Tally across a whole run range. Skipped counts runs whose file was never
/// opened (missing on disk); failed counts runs abandoned partway;
/// timestamp_warnings counts mismatching event pairs, not runs.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub repaired: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub timestamp_warnings: usize,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: &RunReport) {
        if report.was_modified() {
            self.repaired += 1;
        } else {
            self.unchanged += 1;
        }
        self.timestamp_warnings += report.timestamp_mismatches;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }
}

impl Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} repaired, {} already consistent, {} skipped, {} failed, {} timestamp warnings",
            self.repaired, self.unchanged, self.skipped, self.failed, self.timestamp_warnings
        )
    }
}
