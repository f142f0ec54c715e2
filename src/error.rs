use thiserror::Error;

/// Errors detected while validating or planning a run.
///
/// All three are unrecoverable: they surface during planning, before any
/// physical command is issued, and abort the run.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("sample index {index} is outside the {capacity}-well sample layout")]
    OutOfRange { index: usize, capacity: usize },

    #[error("invalid transfer volume: {0}")]
    Volume(String),
}
