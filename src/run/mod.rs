mod report;
mod state;

pub use report::RunReport;
pub use state::{Run, RunOutcome, RunState, StepRecord, StepState};
