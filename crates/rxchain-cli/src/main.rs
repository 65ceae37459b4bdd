//! # rxchain CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rxchain_cli::demo::{run_demo, DemoArgs};
use rxchain_cli::screen::{run_screen, ScreenArgs};

/// Prescription screening with a tamper-evident hash chain.
///
/// Legitimate prescriptions are appended to an in-memory chain; ones the
/// classifier flags for potential misuse are reported and skipped.
#[derive(Parser, Debug)]
#[command(name = "rxchain", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format. Logs go to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Screen the three built-in example prescriptions.
    Demo(DemoArgs),

    /// Screen prescriptions given on the command line.
    Screen(ScreenArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8, format: LogFormat) {
    // RUST_LOG, when set, takes precedence over -v.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "rxchain starting");

    let result = match cli.command {
        Commands::Demo(args) => run_demo(&args),
        Commands::Screen(args) => run_screen(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxchain_cli::Sample;

    #[test]
    fn cli_parse_demo_defaults() {
        let cli = Cli::try_parse_from(["rxchain", "demo"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_format, LogFormat::Text);
        if let Commands::Demo(args) = cli.command {
            assert_eq!(args.seed, 42);
            assert_eq!(args.test_fraction, 0.2);
        } else {
            panic!("expected demo");
        }
    }

    #[test]
    fn cli_parse_demo_options() {
        let cli = Cli::try_parse_from([
            "rxchain",
            "demo",
            "--seed",
            "7",
            "--test-fraction",
            "0.25",
        ])
        .unwrap();
        if let Commands::Demo(args) = cli.command {
            assert_eq!(args.seed, 7);
            assert_eq!(args.test_fraction, 0.25);
            assert_eq!(args.training_config().seed, 7);
        } else {
            panic!("expected demo");
        }
    }

    #[test]
    fn cli_parse_screen_samples() {
        let cli = Cli::try_parse_from([
            "rxchain", "screen", "--sample", "6,15", "--sample", "4,10",
        ])
        .unwrap();
        if let Commands::Screen(args) = cli.command {
            assert_eq!(args.samples, vec![Sample::new(6, 15), Sample::new(4, 10)]);
            assert_eq!(args.seed, 42);
        } else {
            panic!("expected screen");
        }
    }

    #[test]
    fn cli_parse_screen_requires_sample() {
        assert!(Cli::try_parse_from(["rxchain", "screen"]).is_err());
    }

    #[test]
    fn cli_parse_screen_rejects_malformed_sample() {
        assert!(Cli::try_parse_from(["rxchain", "screen", "--sample", "6"]).is_err());
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli = Cli::try_parse_from(["rxchain", "-vv", "demo"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(["rxchain", "demo", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(3), "trace");
        assert_eq!(level_for(9), "trace");
    }

    #[test]
    fn cli_parse_log_format() {
        let cli = Cli::try_parse_from(["rxchain", "--log-format", "json", "demo"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(Cli::try_parse_from(["rxchain", "--log-format", "xml", "demo"]).is_err());
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["rxchain"]).is_err());
    }
}
