//! # rxchain-cli — Prescription Screening Tool
//!
//! Library half of the `rxchain` binary. The screening driver lives here so
//! integration tests can exercise it without spawning a process.
//!
//! ## Subcommands
//!
//! - `demo` — screen the three built-in prescriptions
//! - `screen` — screen caller-supplied `--sample Q,D` values
//!
//! Both train the misuse classifier, append legitimate prescriptions to a
//! fresh chain, print the chain, and exit 0 iff the chain validates.

pub mod demo;
pub mod screen;
pub mod screening;

pub use screening::{
    prescription_record, run_screening, screen, Decision, Sample, ScreeningReport, DEMO_SAMPLES,
};
