use anyhow::{Result, bail};

use crate::layout::SampleCount;
use crate::planner;
use crate::protocol::Protocol;
use crate::robot::RobotControl;
use crate::run::{Run, RunReport};
use crate::ui::RunProgress;

/// Drives a protocol through the full run lifecycle.
///
/// The runner plans first — resolving every address, volume and delay —
/// and only then starts issuing commands, so nothing physical happens for
/// a run that was never going to be valid. Execution is strictly
/// sequential and aborts wholesale on the first failure: a half-completed
/// wet-lab run cannot be resumed, so there is no retry and no recovery.
pub struct ProtocolRunner<R: RobotControl> {
    robot: R,
}

impl<R: RobotControl> ProtocolRunner<R> {
    pub fn new(robot: R) -> Self {
        Self { robot }
    }

    pub fn robot(&self) -> &R {
        &self.robot
    }

    /// Runs every step of `protocol` in declared order, returning the
    /// run report on completion.
    pub async fn execute(
        &self,
        protocol: &Protocol,
        samples: SampleCount,
        progress: &RunProgress,
    ) -> Result<RunReport> {
        // Plan before the first physical action; all validation lives here.
        let plan = planner::plan(protocol, samples)?;

        let mut run = Run::new(&plan.protocol, plan.sample_count, &plan.step_names());
        run.begin();

        for command in &plan.setup {
            if let Err(e) = self.robot.execute(command).await {
                run.abort("setup", &e.to_string());
                bail!("deck setup aborted: {e}");
            }
        }

        let total = plan.steps.len();
        for (index, step) in plan.steps.iter().enumerate() {
            run.start_step(index);
            progress.step(index, total, &step.name);

            for command in &step.commands {
                if let Err(e) = self.robot.execute(command).await {
                    run.abort(&step.name, &e.to_string());
                    bail!("step '{}' aborted: {e}", step.name);
                }
            }

            run.complete_step(index, step.commands.len() as u32);
        }

        run.finish();
        Ok(RunReport::from_run(&run))
    }
}
