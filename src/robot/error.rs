//! Error types for the robot-control drivers.
//!
//! Defines [`RobotError`] with variants for a busy robot, API-level
//! failures, rejected commands and network faults. Uses `thiserror` to
//! derive `Display` and `Error` from the `#[error(...)]` attributes.

use thiserror::Error;

/// Errors that can occur while driving the robot.
#[derive(Debug, Error)]
pub enum RobotError {
    /// The robot is executing another command queue (HTTP 409).
    /// `retry_after_ms` hints how long to wait before retrying.
    #[error("robot busy, retry after {retry_after_ms}ms")]
    Busy { retry_after_ms: u64 },

    /// The robot's API rejected the request (e.g. 400 malformed command,
    /// 500 internal error). Carries the HTTP status and the response body.
    #[error("robot API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The robot refused a command that is invalid in its current state,
    /// e.g. aspirating with no tip attached.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// The robot's response could not be decoded.
    #[error("failed to parse robot response: {0}")]
    ParseError(String),

    /// Underlying network failure (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}
