//! denshactl - Densha de GO! mascon inspection CLI
//!
//! Drives an emulated train controller the way a host would and prints the
//! resulting interrupt reports, descriptors and save states.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod config;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{Commands, Context};
use crate::config::DenshaConfig;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "denshactl")]
#[command(about = "Densha de GO! mascon CLI - Encode reports, dump descriptors, manage save states")]
#[command(version)]
#[command(long_about = "
denshactl drives an emulated TAITO Densha de GO! train controller (Type 2,
Shinkansen) and prints exactly what the USB host would see.

Settings are read from --config (YAML, or JSON when the file ends in .json);
command-line flags override the file.
Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file
    #[arg(long, global = true, env = "DENSHACTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "denshactl={lvl},densha_usb_mascon={lvl},densha_hid_mascon_protocol={lvl}",
                    lvl = log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match execute_command(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            std::process::exit(exit_code);
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    if let Commands::Completion { shell } = &cli.command {
        completion::generate_completion(*shell);
        return Ok(());
    }

    let ctx = Context {
        json: cli.json,
        config: DenshaConfig::load_or_default(cli.config.as_deref())?,
    };

    match &cli.command {
        Commands::Report { input } => commands::report::execute(&ctx, input),
        Commands::Descriptors { variant } => commands::descriptors::execute(&ctx, *variant),
        Commands::Bindings { variant } => commands::bindings::execute(&ctx, *variant),
        Commands::Save { input, out } => commands::state::save(&ctx, input, out),
        Commands::Load { variant, file } => commands::state::load(&ctx, *variant, file),
        Commands::Completion { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use densha_usb_mascon::MasconVariant;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_report_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["denshactl", "report"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        match &cli.command {
            Commands::Report { input } => {
                assert!(input.variant.is_none());
                assert_eq!(input.power, 0.0);
                assert_eq!(input.brake, 0.0);
                assert!(input.buttons.is_empty());
            }
            _ => return Err("expected Report command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_global_json_flag_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["denshactl", "bindings", "--json"])?;
        assert!(cli.json);
        Ok(())
    }

    #[test]
    fn parse_verbose_levels() -> TestResult {
        let cli = Cli::try_parse_from(["denshactl", "-vv", "descriptors"])?;
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn parse_report_inputs() -> TestResult {
        let cli = Cli::try_parse_from([
            "denshactl",
            "report",
            "--variant",
            "shinkansen",
            "--power",
            "0.75",
            "--up",
            "--left",
            "-b",
            "A",
            "--button",
            "start",
        ])?;
        match &cli.command {
            Commands::Report { input } => {
                assert_eq!(input.variant, Some(MasconVariant::Shinkansen));
                assert_eq!(input.power, 0.75);
                assert!(input.up && input.left);
                assert!(!input.down && !input.right);
                assert_eq!(input.buttons, vec!["A".to_string(), "start".to_string()]);
            }
            _ => return Err("expected Report command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_save_and_load() -> TestResult {
        let cli = Cli::try_parse_from([
            "denshactl", "save", "--brake", "1.0", "--out", "state.bin",
        ])?;
        match &cli.command {
            Commands::Save { input, out } => {
                assert_eq!(input.brake, 1.0);
                assert_eq!(out, &PathBuf::from("state.bin"));
            }
            _ => return Err("expected Save command".into()),
        }

        let cli = Cli::try_parse_from(["denshactl", "load", "--variant", "type2", "state.bin"])?;
        match &cli.command {
            Commands::Load { variant, file } => {
                assert_eq!(*variant, Some(MasconVariant::Type2));
                assert_eq!(file, &PathBuf::from("state.bin"));
            }
            _ => return Err("expected Load command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_config_flag() -> TestResult {
        let cli = Cli::try_parse_from(["denshactl", "--config", "densha.yaml", "report"])?;
        assert_eq!(cli.config, Some(PathBuf::from("densha.yaml")));
        Ok(())
    }

    #[test]
    fn reject_unknown_variant() {
        assert!(Cli::try_parse_from(["denshactl", "report", "--variant", "tram"]).is_err());
    }

    #[test]
    fn reject_non_numeric_power() {
        assert!(Cli::try_parse_from(["denshactl", "report", "--power", "full"]).is_err());
    }

    #[test]
    fn reject_save_without_output() {
        assert!(Cli::try_parse_from(["denshactl", "save"]).is_err());
    }

    #[test]
    fn reject_no_subcommand() {
        assert!(Cli::try_parse_from(["denshactl"]).is_err());
    }
}
