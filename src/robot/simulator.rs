//! In-process robot simulator.
//!
//! Executes the same command stream the HTTP driver would send, without
//! hardware: every command is logged for inspection, tip discipline and
//! labware references are checked, and delays are accounted in simulated
//! minutes instead of wall-clock time. Supports failure injection so the
//! abort path can be exercised in tests.

use std::collections::HashSet;
use std::sync::Mutex;

use super::error::RobotError;
use super::types::{CommandReceipt, Pipette, RobotCommand, RobotControl};

#[derive(Default)]
struct SimulatorState {
    log: Vec<RobotCommand>,
    labware: HashSet<String>,
    tips_on: HashSet<Pipette>,
    temperature: Option<f64>,
    simulated_minutes: f64,
    fail_on: Option<usize>,
}

/// Simulated robot implementing [`RobotControl`].
pub struct SimulatedRobot {
    state: Mutex<SimulatorState>,
}

impl Default for SimulatedRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedRobot {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimulatorState::default()),
        }
    }

    /// Makes the zero-based `n`th command fail with a rejection.
    pub fn fail_on_command(&self, n: usize) {
        self.state.lock().unwrap().fail_on = Some(n);
    }

    /// Every command accepted so far, in execution order.
    pub fn commands(&self) -> Vec<RobotCommand> {
        self.state.lock().unwrap().log.clone()
    }

    /// Total minutes spent in delay commands.
    pub fn simulated_minutes(&self) -> f64 {
        self.state.lock().unwrap().simulated_minutes
    }

    /// Last temperature set-point, if any.
    pub fn temperature(&self) -> Option<f64> {
        self.state.lock().unwrap().temperature
    }

    fn check(state: &SimulatorState, command: &RobotCommand) -> Result<(), RobotError> {
        let require_tip = |pipette: &Pipette, action: &str| {
            if state.tips_on.contains(pipette) {
                Ok(())
            } else {
                Err(RobotError::Rejected(format!(
                    "{action} on {} with no tip attached",
                    pipette.api_name()
                )))
            }
        };
        let require_labware = |label: &str| {
            if state.labware.contains(label) {
                Ok(())
            } else {
                Err(RobotError::Rejected(format!(
                    "labware '{label}' has not been loaded"
                )))
            }
        };

        match command {
            RobotCommand::PickUpTip { pipette } => {
                if state.tips_on.contains(pipette) {
                    return Err(RobotError::Rejected(format!(
                        "{} already holds a tip",
                        pipette.api_name()
                    )));
                }
            }
            RobotCommand::Aspirate {
                pipette, labware, ..
            } => {
                require_tip(pipette, "aspirate")?;
                require_labware(labware)?;
            }
            RobotCommand::Dispense {
                pipette, labware, ..
            } => {
                require_tip(pipette, "dispense")?;
                require_labware(labware)?;
            }
            RobotCommand::Mix { pipette, .. } => require_tip(pipette, "mix")?,
            RobotCommand::DropTip { pipette } => require_tip(pipette, "drop tip")?,
            _ => {}
        }
        Ok(())
    }

    fn apply(state: &mut SimulatorState, command: &RobotCommand) {
        match command {
            RobotCommand::LoadLabware { label, .. } => {
                state.labware.insert(label.clone());
            }
            RobotCommand::PickUpTip { pipette } => {
                state.tips_on.insert(*pipette);
            }
            RobotCommand::DropTip { pipette } => {
                state.tips_on.remove(pipette);
            }
            RobotCommand::SetTemperature { celsius } => {
                state.temperature = Some(*celsius);
            }
            RobotCommand::Delay { minutes } => {
                state.simulated_minutes += minutes;
            }
            _ => {}
        }
    }
}

impl RobotControl for SimulatedRobot {
    async fn execute(&self, command: &RobotCommand) -> Result<CommandReceipt, RobotError> {
        let mut state = self.state.lock().unwrap();

        if state.fail_on == Some(state.log.len()) {
            return Err(RobotError::Rejected("injected failure".into()));
        }

        Self::check(&state, command)?;
        Self::apply(&mut state, command);
        state.log.push(command.clone());

        Ok(CommandReceipt {
            id: format!("sim-{}", state.log.len()),
            status: "succeeded".into(),
        })
    }
}
