//! # attpc_event_fixer
//!
//! attpc_event_fixer repairs the event numbering of merged AT-TPC run files.
//! The GET and FRIBDAQ acquisitions each stamp their events with a hardware
//! counter, and when either counter misbehaves (most commonly the MuTaNT
//! module carrying its count over from a previous run, or resetting partway
//! through one) the merged HDF5 file ends up with GET numbering that does not
//! start from zero, FRIBDAQ numbering that does not line up with GET, or
//! both. This tool rewrites the numbering in place so that both sides run
//! from 0 to N-1 and refer to the same physical events.
//!
//! Three repairs are applied to each run, in order:
//!
//! - The GET numbering is rebased so the first recorded event is event 0.
//! - The FRIBDAQ numbering is shifted onto the (rebased) GET numbering. A
//!   single constant shift is found when the FRIBDAQ counter ran undisturbed;
//!   a mid-run MuTaNT reset is recognized and handled with one shift per
//!   side of the reset. If no shift reconciles the two sides the run is
//!   reported and left for a human, since guessing here would silently pair
//!   the wrong events.
//! - The elapsed-time clocks of the two DAQs are compared event by event.
//!   Disagreements are reported but never "fixed"; they mean the merge
//!   itself paired events wrong, which renumbering cannot undo.
//!
//! ## A warning
//!
//! Files are modified in place and the operation is not reversible. Use with
//! caution, and keep a copy of anything you cannot rerun the merger on.
//!
//! ## Installation
//!
//! ### Rust
//!
//! If you have not used Rust before, you will most likely need to install the
//! Rust tool chain. See the
//! [Rust docs](https://www.rust-lang.org/tools/install) for installation
//! instructions.
//!
//! ### HDF5
//!
//! Before building and running attpc_event_fixer, HDF5 must be installed.
//! Typically this will be installed using a package manager (homebrew, apt,
//! etc), and the Rust libraries will auto detect the location of the HDF
//! install. However, this is not always possible. Sometimes a newer version
//! will need to be installed to a custom location. If this is the case, write
//! the following snippet into the file `.cargo/config.toml` in the
//! attpc_event_fixer repository:
//!
//! ```toml
//! [env]
//! HDF5_DIR="/path/to/my/hdf5/install/"
//!
//! [build]
//! rustflags="-C link-args=-Wl,-rpath,/path/to/my/hdf5/install/lib"
//! ```
//!
//! Replace `/path/to/my/hdf5/install/` with the path to your HDF5
//! installation.
//!
//! ### Building & Install
//!
//! To build and install use `cargo install --path ./attpc_event_fixer_cli`
//! from the top level attpc_event_fixer repository. The binary will be
//! installed to your cargo install location (typically something like
//! `~/.cargo/bin/`) and can be uninstalled by running
//! `cargo uninstall attpc_event_fixer_cli`.
//!
//! ## Usage
//!
//! ```text
//! attpc_event_fixer_cli <data_directory> <first_run> <last_run>
//! ```
//!
//! where `data_directory` contains the merged `run_####.h5` files and the run
//! range is inclusive on both ends. Runs whose files are missing are skipped,
//! and a run that cannot be repaired is logged and left untouched while the
//! rest of the range is still processed.
//!
//! ## Data format
//!
//! The tool operates on the original AT-TPC merged HDF5 format, where the
//! event number is carried in the dataset names:
//!
//! ```text
//! run_0001.h5
//! |---- meta
//! |    |---- meta(dset) - min_event, min_get_ts, max_event, max_get_ts
//! |---- get
//! |    |---- evt#_data(dset)
//! |    |---- evt#_header(dset)
//! |---- frib
//! |    |---- evt
//! |    |    |---- evt#_header(dset)
//! |    |    |---- evt#_1903(dset)
//! ```
//!
//! Renumbering an event means relinking its datasets under new names; the
//! data itself is never rewritten. The `meta` bounds are refreshed to match
//! the corrected numbering.
pub mod aligner;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod process;
pub mod report;
pub mod run_file;
pub mod status;
pub mod verifier;
