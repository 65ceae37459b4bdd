//! # Screen Subcommand
//!
//! Screens caller-supplied prescriptions given as repeated `--sample Q,D`.

use anyhow::Result;
use clap::Args;

use rxchain_classifier::TrainingConfig;

use crate::screening::{run_screening, Sample};

/// Arguments for the screen subcommand.
#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// Prescription as QUANTITY,DOSAGE. Repeat for more samples.
    #[arg(long = "sample", value_name = "Q,D", required = true)]
    pub samples: Vec<Sample>,

    /// Seed for the train/test split.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Screen the given samples and print the report. Returns the process exit code.
pub fn run_screen(args: &ScreenArgs) -> Result<u8> {
    tracing::debug!(samples = args.samples.len(), "screening caller samples");
    let config = TrainingConfig {
        seed: args.seed,
        ..TrainingConfig::default()
    };
    let report = run_screening(config, &args.samples)?;
    print!("{report}");
    Ok(report.exit_code())
}
