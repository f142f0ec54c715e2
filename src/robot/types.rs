//! Wire types for the robot-control API.
//!
//! Every physical action the sequencer can request is a [`RobotCommand`],
//! serialized as tagged JSON in the shape the robot endpoint expects.
//! [`RobotControl`] is the seam between the sequencer and whatever actually
//! executes the commands — the HTTP driver in production, the in-process
//! simulator in tests.

use serde::{Deserialize, Serialize};

use super::error::RobotError;

/// Instrument mount side on the gantry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mount {
    Left,
    Right,
}

/// The two single-channel pipettes the protocol uses.
///
/// The small pipette handles reagent microvolumes, the large one buffers;
/// they are used in disjoint phases of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipette {
    P20,
    P1000,
}

impl Pipette {
    /// Instrument name as the robot runtime knows it.
    pub fn api_name(&self) -> &'static str {
        match self {
            Pipette::P20 => "p20_single_gen2",
            Pipette::P1000 => "p1000_single",
        }
    }

    /// Which mount the instrument occupies.
    pub fn mount(&self) -> Mount {
        match self {
            Pipette::P20 => Mount::Right,
            Pipette::P1000 => Mount::Left,
        }
    }

    /// Largest volume one transfer can move, in µl.
    pub fn capacity_ul(&self) -> f64 {
        match self {
            Pipette::P20 => 20.0,
            Pipette::P1000 => 1000.0,
        }
    }
}

/// One physical action issued to the robot, serialized as tagged JSON.
///
/// Labware is referenced by the label assigned when it was loaded; wells
/// by their rack coordinate (`"C4"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RobotCommand {
    LoadLabware {
        name: String,
        slot: u8,
        label: String,
    },
    LoadModule {
        name: String,
        slot: u8,
    },
    LoadInstrument {
        name: String,
        mount: Mount,
        tip_racks: Vec<String>,
    },
    SetTemperature {
        celsius: f64,
    },
    PickUpTip {
        pipette: Pipette,
    },
    Aspirate {
        pipette: Pipette,
        volume_ul: f64,
        labware: String,
        well: String,
    },
    Dispense {
        pipette: Pipette,
        volume_ul: f64,
        labware: String,
        well: String,
    },
    Mix {
        pipette: Pipette,
        repetitions: u32,
        volume_ul: f64,
    },
    DropTip {
        pipette: Pipette,
    },
    Delay {
        minutes: f64,
    },
}

/// Acknowledgement returned by the robot for an executed command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandReceipt {
    /// Identifier assigned by the executor.
    pub id: String,
    /// Terminal status of the command, e.g. "succeeded".
    pub status: String,
}

/// Executes robot commands, one at a time, in the order given.
///
/// The sequencer treats implementations as opaque effectful calls: it does
/// not verify physical outcomes, only that each command was accepted.
pub trait RobotControl {
    async fn execute(&self, command: &RobotCommand) -> Result<CommandReceipt, RobotError>;
}
