//! # Demo Subcommand
//!
//! Screens the three built-in prescriptions `[6,15]`, `[8,22]`, `[4,10]`.

use anyhow::Result;
use clap::Args;

use rxchain_classifier::TrainingConfig;

use crate::screening::{run_screening, DEMO_SAMPLES};

/// Arguments for the demo subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Seed for the train/test split.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of the training data held out for evaluation.
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,
}

impl DemoArgs {
    /// Default hyperparameters with the seed and test fraction overridden.
    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            seed: self.seed,
            test_fraction: self.test_fraction,
            ..TrainingConfig::default()
        }
    }
}

/// Run the demo and print the report. Returns the process exit code.
pub fn run_demo(args: &DemoArgs) -> Result<u8> {
    let report = run_screening(args.training_config(), &DEMO_SAMPLES)?;
    print!("{report}");
    Ok(report.exit_code())
}
