use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use libattpc_event_fixer::config::Config;
use libattpc_event_fixer::process::process;

fn main() {
    // Create a cli
    let matches = Command::new("attpc_event_fixer_cli")
        .about("Repair the event numbering of merged AT-TPC run files in place")
        .arg_required_else_help(true)
        .arg(
            Arg::new("directory")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Directory containing the merged run_####.h5 files"),
        )
        .arg(
            Arg::new("first_run")
                .required(true)
                .value_parser(clap::value_parser!(i32))
                .help("First run number (inclusive)"),
        )
        .arg(
            Arg::new("last_run")
                .required(true)
                .value_parser(clap::value_parser!(i32))
                .help("Last run number (inclusive)"),
        )
        .arg(
            Arg::new("tolerance")
                .short('t')
                .long("tolerance")
                .value_parser(clap::value_parser!(f64))
                .default_value("1.0")
                .help("Allowed timestamp disagreement between the two DAQs, in clock ticks"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");

    // Parse the cli
    let directory = matches
        .get_one::<PathBuf>("directory")
        .expect("We require args");
    let first_run = *matches.get_one::<i32>("first_run").expect("We require args");
    let last_run = *matches.get_one::<i32>("last_run").expect("We require args");
    let tolerance = *matches
        .get_one::<f64>("tolerance")
        .expect("Tolerance has a default");

    log::info!("Running event number repair tool...");
    log::info!("Data Directory: {}", directory.to_string_lossy());
    log::info!("First Run: {} Last Run: {}", first_run, last_run);
    log::info!("Timestamp tolerance: {} ticks", tolerance);

    let mut config = match Config::new(directory, first_run, last_run) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    config.timestamp_tolerance = tolerance;
    if !config.is_run_range_valid() {
        log::error!("First run must not be after last run!");
        return;
    }

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(100));
    pb.set_style(
        ProgressStyle::with_template("[{bar:40}] {pos:>3}% {msg}")
            .expect("Progress template is valid")
            .progress_chars("=> "),
    );
    let (tx, rx) = mpsc::channel();
    // Spawn the task!
    let handle = std::thread::spawn(move || process(config, tx));

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(status) => {
                pb.set_position((status.progress * 100.0) as u64);
                pb.set_message(format!("run {}: {}", status.run_number, status.stage));
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if handle.is_finished() {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    match handle.join() {
        Ok(result) => match result {
            Ok(summary) => log::info!("Successfully repaired data! Summary: {summary}"),
            Err(e) => log::error!("Repair failed with error: {e}"),
        },
        Err(_) => log::error!("Failed to join repair task!"),
    }

    pb.finish();

    log::info!("Done.");
}
