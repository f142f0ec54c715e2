use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three states of the overall run.
///
/// A run flows through: NOT_STARTED → IN_PROGRESS → FINISHED. An aborted
/// run never reaches FINISHED; the abort is recorded in its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    NotStarted,
    InProgress,
    Finished,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::NotStarted => write!(f, "NOT_STARTED"),
            RunState::InProgress => write!(f, "IN_PROGRESS"),
            RunState::Finished => write!(f, "FINISHED"),
        }
    }
}

/// Per-step lifecycle: PENDING → RUNNING → COMPLETED, strictly in step
/// order. No step is ever skipped, retried or revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    Pending,
    Running,
    Completed,
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepState::Pending => write!(f, "PENDING"),
            StepState::Running => write!(f, "RUNNING"),
            StepState::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// How the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Completed,
    Aborted { step: String, reason: String },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed => write!(f, "completed"),
            RunOutcome::Aborted { step, reason } => {
                write!(f, "aborted at '{step}': {reason}")
            }
        }
    }
}

/// Progress record for one protocol step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    pub state: StepState,
    pub commands_issued: u32,
}

/// One execution of a protocol, tracking the state machine as the runner
/// drives it. There is no resume: a run either finishes every step or is
/// aborted wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub protocol: String,
    pub sample_count: u32,
    pub state: RunState,
    pub steps: Vec<StepRecord>,
    pub outcome: Option<RunOutcome>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Run {
    pub fn new(protocol: &str, sample_count: u32, step_names: &[String]) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            protocol: protocol.to_string(),
            sample_count,
            state: RunState::NotStarted,
            steps: step_names
                .iter()
                .map(|name| StepRecord {
                    name: name.clone(),
                    state: StepState::Pending,
                    commands_issued: 0,
                })
                .collect(),
            outcome: None,
            started_at: now,
            updated_at: now,
        }
    }

    pub fn begin(&mut self) {
        debug_assert_eq!(self.state, RunState::NotStarted);
        self.state = RunState::InProgress;
        self.touch();
    }

    pub fn start_step(&mut self, index: usize) {
        debug_assert_eq!(self.state, RunState::InProgress);
        debug_assert_eq!(self.steps[index].state, StepState::Pending);
        self.steps[index].state = StepState::Running;
        self.touch();
    }

    pub fn complete_step(&mut self, index: usize, commands_issued: u32) {
        debug_assert_eq!(self.steps[index].state, StepState::Running);
        self.steps[index].state = StepState::Completed;
        self.steps[index].commands_issued = commands_issued;
        self.touch();
    }

    /// Records an abort. The run stays in IN_PROGRESS — an aborted run
    /// never reaches FINISHED.
    pub fn abort(&mut self, step: &str, reason: &str) {
        self.outcome = Some(RunOutcome::Aborted {
            step: step.to_string(),
            reason: reason.to_string(),
        });
        self.touch();
    }

    pub fn finish(&mut self) {
        debug_assert_eq!(self.state, RunState::InProgress);
        debug_assert!(
            self.steps.iter().all(|s| s.state == StepState::Completed),
            "finish() with incomplete steps"
        );
        self.state = RunState::Finished;
        self.outcome = Some(RunOutcome::Completed);
        self.touch();
    }

    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.state == StepState::Completed)
            .count()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
