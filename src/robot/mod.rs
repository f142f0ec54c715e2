pub mod client;
pub mod error;
pub mod simulator;
pub mod types;

pub use client::HttpRobotClient;
pub use error::RobotError;
pub use simulator::SimulatedRobot;
pub use types::{CommandReceipt, Mount, Pipette, RobotCommand, RobotControl};
