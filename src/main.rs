mod cli;
mod config;
mod error;
mod layout;
mod planner;
mod protocol;
mod robot;
mod run;
mod runner;
mod ui;
mod volume;

use std::path::Path;

use anyhow::{Result, anyhow};
use clap::Parser;

use cli::{Cli, Command};
use config::RunConfig;
use layout::SampleCount;
use protocol::{Protocol, Variant};
use robot::{HttpRobotClient, RobotControl, SimulatedRobot};
use run::RunReport;
use runner::ProtocolRunner;
use ui::RunProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = RunConfig::load(cli.config.as_deref().map(Path::new))?;
    if let Some(samples) = cli.samples {
        config.sample_count = samples;
    }
    if let Some(protocol) = cli.protocol {
        config.protocol = protocol.name().to_string();
    }

    // Fail fast: an invalid sample count never reaches the robot.
    let samples = SampleCount::new(config.sample_count)?;
    let variant = Variant::by_name(&config.protocol)
        .ok_or_else(|| anyhow!("unknown protocol '{}'", config.protocol))?;
    let protocol = variant.build();

    match cli.command {
        Command::Steps => {
            let plan = planner::plan(&protocol, samples)?;
            println!(
                "{} — {} samples, {} commands",
                plan.protocol,
                plan.sample_count,
                plan.total_commands()
            );
            for (i, step) in plan.steps.iter().enumerate() {
                println!(
                    "  {:>2}. {} ({} commands)",
                    i + 1,
                    step.name,
                    step.commands.len()
                );
            }
        }

        Command::Simulate => {
            let runner = ProtocolRunner::new(SimulatedRobot::new());
            drive(&runner, &protocol, samples).await?;
            if cli.verbose {
                for command in runner.robot().commands() {
                    println!("{}", serde_json::to_string(&command)?);
                }
            }
            println!(
                "  simulated incubation time: {} minutes",
                runner.robot().simulated_minutes()
            );
        }

        Command::Run { robot_addr } => {
            let addr = robot_addr.unwrap_or(config.robot_addr);
            let runner = ProtocolRunner::new(HttpRobotClient::new(Some(addr)));
            drive(&runner, &protocol, samples).await?;
        }
    }

    Ok(())
}

/// Runs the protocol with a live spinner, reporting the outcome either way.
async fn drive<R: RobotControl>(
    runner: &ProtocolRunner<R>,
    protocol: &Protocol,
    samples: SampleCount,
) -> Result<RunReport> {
    let progress = RunProgress::start(protocol.name, samples.get());
    match runner.execute(protocol, samples, &progress).await {
        Ok(report) => {
            progress.complete(&report.outcome);
            progress.print_report(&report);
            Ok(report)
        }
        Err(e) => {
            progress.fail(&e.to_string());
            Err(e)
        }
    }
}
