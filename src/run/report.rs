use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::{Run, RunOutcome, StepRecord, StepState};

/// Structured record produced when a run ends, completed or aborted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub protocol: String,
    pub sample_count: u32,
    pub outcome: RunOutcome,
    pub steps: Vec<StepRecord>,
    pub commands_issued: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl RunReport {
    /// Generate a report from a finished or aborted run.
    pub fn from_run(run: &Run) -> Self {
        let now = Utc::now();
        let duration = now - run.started_at;

        Self {
            run_id: run.id.clone(),
            protocol: run.protocol.clone(),
            sample_count: run.sample_count,
            outcome: run
                .outcome
                .clone()
                .unwrap_or_else(|| RunOutcome::Aborted {
                    step: "setup".into(),
                    reason: "run ended without an outcome".into(),
                }),
            steps: run.steps.clone(),
            commands_issued: run.steps.iter().map(|s| s.commands_issued).sum(),
            started_at: run.started_at,
            completed_at: now,
            duration_ms: duration.num_milliseconds(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }

    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.state == StepState::Completed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_from_completed_run() {
        let names = vec!["one".to_string(), "two".to_string()];
        let mut run = Run::new("rna-purification", 4, &names);
        run.begin();
        run.start_step(0);
        run.complete_step(0, 20);
        run.start_step(1);
        run.complete_step(1, 12);
        run.finish();

        let report = RunReport::from_run(&run);
        assert_eq!(report.run_id, run.id);
        assert_eq!(report.protocol, "rna-purification");
        assert_eq!(report.sample_count, 4);
        assert!(report.is_completed());
        assert_eq!(report.commands_issued, 32);
        assert_eq!(report.completed_steps(), 2);
    }

    #[test]
    fn report_from_aborted_run() {
        let names = vec!["one".to_string()];
        let mut run = Run::new("rna-purification", 2, &names);
        run.begin();
        run.start_step(0);
        run.abort("one", "robot busy");

        let report = RunReport::from_run(&run);
        assert!(!report.is_completed());
        assert!(matches!(report.outcome, RunOutcome::Aborted { .. }));
        assert_eq!(report.completed_steps(), 0);
    }

    #[test]
    fn report_serialization_roundtrip() {
        let names = vec!["one".to_string()];
        let mut run = Run::new("rna-purification-temp", 4, &names);
        run.begin();
        run.start_step(0);
        run.complete_step(0, 7);
        run.finish();

        let report = RunReport::from_run(&run);
        let json = serde_json::to_string(&report).unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.run_id, report.run_id);
        assert_eq!(parsed.commands_issued, 7);
        assert!(parsed.is_completed());
    }
}
