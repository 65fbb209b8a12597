use std::sync::mpsc::Sender;

use fxhash::FxHashMap;

use super::aligner::{align, apply_correction, FribCorrection};
use super::config::Config;
use super::error::ProcessorError;
use super::normalizer::{apply_rebase, rebase_offset};
use super::report::{BatchSummary, RunReport};
use super::run_file::{EventSource, RunFile};
use super::status::{ProcessStatus, Stage};
use super::verifier::verify_timestamps;

/// Cap on individually logged timestamp mismatches per run
const MAX_LOGGED_MISMATCHES: usize = 10;

/// The main loop of attpc_event_fixer.
///
/// Repairs a single run file in place. Stages run in a fixed order: scan both
/// sides, rebase the GET numbering to zero, align the FRIB numbering against
/// it, then check that the clocks agree. The GET rebase commits before
/// alignment starts, so an irreconcilable FRIB side still leaves the GET
/// repair on disk.
pub fn process_run(
    config: &Config,
    run_number: i32,
    tx: &Sender<ProcessStatus>,
    progress: f32,
) -> Result<RunReport, ProcessorError> {
    let mut report = RunReport::new(run_number);
    let mut run_file = RunFile::open(&config.get_run_file_name(run_number))?;
    log::info!(
        "Total run size: {}",
        human_bytes::human_bytes(run_file.size_bytes() as f64)
    );

    tx.send(ProcessStatus::new(progress, run_number, Stage::Scan))?;
    log::info!("Checking GET data...");
    let get_records = run_file.scan_events(EventSource::Get)?;
    report.events = get_records.len();
    if get_records.is_empty() {
        log::warn!("Run {} has no GET events. Nothing to repair.", run_number);
        return Ok(report);
    }

    // Meta bounds are derived data; the dataset keys are the record of
    // truth. Compare before touching anything so a stale meta shows up in
    // the log.
    let recorded: Vec<u64> = get_records.iter().map(|record| record.number).collect();
    let recorded_min = rebase_offset(&recorded).unwrap_or(0);
    let recorded_max = recorded.iter().max().copied().unwrap_or(0);
    let meta_bounds = run_file.meta_event_bounds()?;
    match meta_bounds {
        Some((meta_min, meta_max)) => {
            if (meta_min, meta_max) != (recorded_min, recorded_max) {
                log::warn!(
                    "Run {} meta bounds [{}, {}] do not match the recorded events [{}, {}]. The dataset keys take precedence.",
                    run_number, meta_min, meta_max, recorded_min, recorded_max
                );
            }
        }
        None => log::warn!(
            "Run {} has no meta information. The event bounds will not be updated.",
            run_number
        ),
    }

    // Rebase the GET numbering to start from zero
    let get_numbers = if recorded_min != 0 {
        log::info!("GET MuTaNT offset detected. Fixing...");
        tx.send(ProcessStatus::new(progress, run_number, Stage::Rebase))?;
        let rebased = apply_rebase(&recorded, recorded_min);
        let mapping: FxHashMap<u64, u64> = recorded
            .iter()
            .copied()
            .zip(rebased.iter().copied())
            .collect();
        run_file.renumber_events(EventSource::Get, &mapping)?;
        report.rebase_offset = recorded_min;
        log::info!("GET data repaired.");
        rebased
    } else {
        recorded
    };
    let corrected_max = recorded_max - recorded_min;
    if let Some(bounds) = meta_bounds {
        if bounds != (0, corrected_max) {
            run_file.rewrite_meta_event_bounds(0, corrected_max)?;
        }
    }

    log::info!("Checking FRIB data...");
    if !run_file.has_frib_events()? {
        log::info!("Run {} did not contain FRIBDAQ data. Skipping.", run_number);
        return Ok(report);
    }
    let frib_records = run_file.scan_events(EventSource::Frib)?;
    let frib_numbers: Vec<u64> = frib_records.iter().map(|record| record.number).collect();

    let correction = align(&get_numbers, &frib_numbers)?;
    match &correction {
        FribCorrection::None => {
            log::info!("Run {} FRIB numbering matches GET. Nothing to fix.", run_number)
        }
        _ => {
            log::info!("FRIB offset detected ({correction}). Fixing FRIB data...");
            tx.send(ProcessStatus::new(progress, run_number, Stage::Align))?;
            let corrected = apply_correction(&frib_numbers, &correction);
            let mapping: FxHashMap<u64, u64> = frib_numbers
                .iter()
                .copied()
                .zip(corrected.iter().copied())
                .collect();
            run_file.renumber_events(EventSource::Frib, &mapping)?;
            log::info!("Run {} fixed.", run_number);
        }
    }
    report.correction = Some(correction);

    tx.send(ProcessStatus::new(progress, run_number, Stage::Verify))?;
    log::info!("Checking that timestamps match up between the two DAQs...");
    let get_stamps: Vec<u64> = get_records.iter().map(|record| record.timestamp).collect();
    let frib_stamps: Vec<u64> = frib_records.iter().map(|record| record.timestamp).collect();
    let mismatches = verify_timestamps(
        &get_numbers,
        &get_stamps,
        &frib_stamps,
        config.timestamp_tolerance,
    );
    report.timestamp_mismatches = mismatches.len();
    if mismatches.is_empty() {
        log::info!("Finished, timestamps match as expected");
    } else {
        log::warn!(
            "Run {} has {} timestamp mismatches. These events may have been paired incorrectly at merge time.",
            run_number,
            mismatches.len()
        );
        for mismatch in mismatches.iter().take(MAX_LOGGED_MISMATCHES) {
            log::warn!("{mismatch}");
        }
        if mismatches.len() > MAX_LOGGED_MISMATCHES {
            log::warn!("...and {} more.", mismatches.len() - MAX_LOGGED_MISMATCHES);
        }
    }

    Ok(report)
}

/// The function to be called by a separate thread (typically the UI).
///
/// Walks the run range and repairs each file in place. A run that cannot be
/// repaired is logged and left as it stands; the rest of the range is still
/// processed. Only a broken status channel aborts the batch.
pub fn process(
    config: Config,
    tx: Sender<ProcessStatus>,
) -> Result<BatchSummary, ProcessorError> {
    let mut total_size: u64 = 0;
    for run in config.first_run_number..(config.last_run_number + 1) {
        if let Ok(meta) = std::fs::metadata(config.get_run_file_name(run)) {
            total_size += meta.len();
        }
    }
    log::info!(
        "Total size of data to be repaired: {}",
        human_bytes::human_bytes(total_size as f64)
    );

    let mut summary = BatchSummary::new();
    let mut processed_size: u64 = 0;
    for run in config.first_run_number..(config.last_run_number + 1) {
        if !config.does_run_exist(run) {
            log::info!("Run {} does not exist, skipping...", run);
            summary.record_skipped();
            continue;
        }
        let run_size = std::fs::metadata(config.get_run_file_name(run))
            .map(|meta| meta.len())
            .unwrap_or(0);
        let progress = if total_size > 0 {
            processed_size as f32 / total_size as f32
        } else {
            0.0
        };
        log::info!("Processing run {}...", run);
        match process_run(&config, run, &tx, progress) {
            Ok(report) => {
                log::info!("Finished processing run {}.", run);
                log::info!("{report}");
                summary.record(&report);
            }
            Err(ProcessorError::SendError(error)) => {
                return Err(ProcessorError::SendError(error))
            }
            Err(error) => {
                log::error!("Run {} could not be repaired: {}", run, error);
                log::error!("Continuing to the next run...");
                summary.record_failed();
            }
        }
        processed_size += run_size;
    }
    log::info!("Repair summary: {summary}");
    Ok(summary)
}
