//! Command-line interface, built on clap.
//!
//! Defines the [`Cli`] struct with subcommands [`Command`] (run,
//! simulate, steps) and global flags (--samples, --protocol, --config,
//! --verbose).

use clap::{Parser, Subcommand, ValueEnum};

/// pipetron — protocol sequencer for laboratory liquid-handling robots.
#[derive(Debug, Parser)]
#[command(name = "pipetron", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Number of samples in this run (1–12).
    #[arg(long, global = true)]
    pub samples: Option<u32>,

    /// Protocol variant to run.
    #[arg(long, global = true)]
    pub protocol: Option<ProtocolArg>,

    /// Path to the configuration file (default: pipetron.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Protocol variant accepted by the CLI, mapped to
/// [`Variant`](crate::protocol::Variant) internally.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProtocolArg {
    /// Bench protocol; samples stay on the tube rack.
    Standard,
    /// Temperature-module variant; 37 °C first incubation.
    Temperature,
}

impl ProtocolArg {
    pub fn name(&self) -> &'static str {
        match self {
            ProtocolArg::Standard => "standard",
            ProtocolArg::Temperature => "temperature",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute the protocol on the robot.
    Run {
        /// Robot endpoint, overriding the configuration file.
        #[arg(long)]
        robot_addr: Option<String>,
    },

    /// Execute the protocol against the in-process simulator.
    Simulate,

    /// Print the resolved step list without executing anything.
    Steps,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_run_subcommand() {
        let cli = Cli::parse_from(["pipetron", "run", "--robot-addr", "http://robot.lab:31950"]);
        match cli.command {
            Command::Run { robot_addr } => {
                assert_eq!(robot_addr.unwrap(), "http://robot.lab:31950");
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "pipetron",
            "--samples",
            "4",
            "--protocol",
            "temperature",
            "--verbose",
            "simulate",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.samples, Some(4));
        assert!(matches!(cli.protocol, Some(ProtocolArg::Temperature)));
    }

    #[test]
    fn cli_parses_steps_subcommand() {
        let cli = Cli::parse_from(["pipetron", "steps"]);
        assert!(matches!(cli.command, Command::Steps));
    }

    #[test]
    fn protocol_arg_names_match_config_values() {
        assert_eq!(ProtocolArg::Standard.name(), "standard");
        assert_eq!(ProtocolArg::Temperature.name(), "temperature");
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
