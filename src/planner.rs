//! Expands a protocol into the exact command sequence a run will issue.
//!
//! Planning is pure: every well is addressed, every volume resolved and
//! split, and every delay computed before the first command reaches the
//! robot. A dispensed reagent cannot be un-dispensed, so configuration,
//! addressing and volume errors must all surface here — the runner only
//! ever executes an already-validated plan.

use crate::error::ProtocolError;
use crate::layout::{SampleCount, sample_well};
use crate::protocol::{
    Location, Mix, Op, Protocol, SampleTransferSpec, TransferSpec,
};
use crate::robot::{Pipette, RobotCommand};
use crate::volume;

/// The commands of one protocol step.
#[derive(Debug, Clone)]
pub struct PlannedStep {
    pub name: String,
    pub commands: Vec<RobotCommand>,
}

/// A fully expanded run: deck setup followed by per-step commands.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub protocol: String,
    pub sample_count: u32,
    pub setup: Vec<RobotCommand>,
    pub steps: Vec<PlannedStep>,
}

impl RunPlan {
    pub fn step_names(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.name.clone()).collect()
    }

    pub fn total_commands(&self) -> usize {
        self.setup.len() + self.steps.iter().map(|s| s.commands.len()).sum::<usize>()
    }
}

/// Expands `protocol` for `samples`, validating everything up front.
pub fn plan(protocol: &Protocol, samples: SampleCount) -> Result<RunPlan, ProtocolError> {
    let mut steps = Vec::with_capacity(protocol.steps.len());
    for step in &protocol.steps {
        let mut commands = Vec::new();
        for op in &step.ops {
            match op {
                Op::Transfer(spec) => expand_transfer(spec, samples, &mut commands)?,
                Op::TransferToSamples(spec) => {
                    expand_sample_transfer(spec, samples, protocol, &mut commands)?
                }
                Op::Incubate(delay) => {
                    let minutes = delay.resolve(samples)?;
                    commands.push(RobotCommand::Delay { minutes });
                }
                Op::SetTemperature(celsius) => {
                    commands.push(RobotCommand::SetTemperature { celsius: *celsius });
                }
            }
        }
        steps.push(PlannedStep {
            name: step.name.to_string(),
            commands,
        });
    }

    Ok(RunPlan {
        protocol: protocol.name.to_string(),
        sample_count: samples.get(),
        setup: setup_commands(protocol),
        steps,
    })
}

fn setup_commands(protocol: &Protocol) -> Vec<RobotCommand> {
    let mut commands = Vec::new();

    if let Some(module) = &protocol.module {
        commands.push(RobotCommand::LoadModule {
            name: module.kind.to_string(),
            slot: module.slot,
        });
    }
    for deck_slot in &protocol.deck {
        commands.push(RobotCommand::LoadLabware {
            name: deck_slot.kind.to_string(),
            slot: deck_slot.slot,
            label: deck_slot.id.label().to_string(),
        });
    }
    for pipette in [Pipette::P20, Pipette::P1000] {
        let tip_rack = match pipette {
            Pipette::P20 => "tips_20ul",
            Pipette::P1000 => "tips_1000ul",
        };
        commands.push(RobotCommand::LoadInstrument {
            name: pipette.api_name().to_string(),
            mount: pipette.mount(),
            tip_racks: vec![tip_rack.to_string()],
        });
    }

    commands
}

/// One fresh tip per aliquot; the mix, if any, follows the final dispense.
fn expand_transfer(
    spec: &TransferSpec,
    samples: SampleCount,
    commands: &mut Vec<RobotCommand>,
) -> Result<(), ProtocolError> {
    let total = spec.volume.resolve(samples);
    let shares = volume::split(total, spec.pipette.capacity_ul())?;
    let last = shares.len() - 1;

    for (i, share) in shares.iter().enumerate() {
        commands.push(RobotCommand::PickUpTip {
            pipette: spec.pipette,
        });
        commands.push(aspirate(spec.pipette, *share, spec.source));
        commands.push(dispense(spec.pipette, *share, spec.dest));
        if i == last {
            push_mix(spec.pipette, &spec.mix_after, commands);
        }
        commands.push(RobotCommand::DropTip {
            pipette: spec.pipette,
        });
    }
    Ok(())
}

/// One fresh tip per sample, dispensing into that sample's own well.
fn expand_sample_transfer(
    spec: &SampleTransferSpec,
    samples: SampleCount,
    protocol: &Protocol,
    commands: &mut Vec<RobotCommand>,
) -> Result<(), ProtocolError> {
    let shares = volume::split(spec.volume_ul, spec.pipette.capacity_ul())?;
    let last = shares.len() - 1;

    for index in samples.indices() {
        let well = sample_well(index)?;
        let dest = Location::new(protocol.samples, well);
        for (i, share) in shares.iter().enumerate() {
            commands.push(RobotCommand::PickUpTip {
                pipette: spec.pipette,
            });
            commands.push(aspirate(spec.pipette, *share, spec.source));
            commands.push(dispense(spec.pipette, *share, dest));
            if i == last {
                push_mix(spec.pipette, &spec.mix_after, commands);
            }
            commands.push(RobotCommand::DropTip {
                pipette: spec.pipette,
            });
        }
    }
    Ok(())
}

fn aspirate(pipette: Pipette, volume_ul: f64, location: Location) -> RobotCommand {
    RobotCommand::Aspirate {
        pipette,
        volume_ul,
        labware: location.labware.label().to_string(),
        well: location.well.to_string(),
    }
}

fn dispense(pipette: Pipette, volume_ul: f64, location: Location) -> RobotCommand {
    RobotCommand::Dispense {
        pipette,
        volume_ul,
        labware: location.labware.label().to_string(),
        well: location.well.to_string(),
    }
}

fn push_mix(pipette: Pipette, mix: &Option<Mix>, commands: &mut Vec<RobotCommand>) {
    if let Some(mix) = mix {
        commands.push(RobotCommand::Mix {
            pipette,
            repetitions: mix.repetitions,
            volume_ul: mix.volume_ul,
        });
    }
}
