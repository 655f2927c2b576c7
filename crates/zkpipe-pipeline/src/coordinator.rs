//! Stage sequencing across process groups.
//!
//! Per stage, two phases:
//! 1. fan-out — launch every group's worker before joining any;
//! 2. fan-in — drain all handles at the barrier, even handles whose result
//!    is already doomed by a sibling failure (wait-all, then fail; there is
//!    no cancellation and no timeout).
//!
//! Only after the barrier is the stage judged. Any failed group fails the
//! run and nothing further is launched for any group, so Verify only ever
//! sees artifacts that Prove fully produced for every group.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, warn};

use zkpipe_types::{PipelineStage, ValidatedConfig, WorkerBinaries};
use zkpipe_worker::{stage_succeeded, CommandBuilder, GroupExit, StageRunner, WorkerStatus};

use crate::run::{GroupOutcome, PipelineRun};

// ── Coordinator ──────────────────────────────────────────────────────────────

pub struct PipelineCoordinator<R: StageRunner> {
    runner: Arc<R>,
    config: ValidatedConfig,
    binaries: WorkerBinaries,
}

impl<R: StageRunner + 'static> PipelineCoordinator<R> {
    pub fn new(runner: Arc<R>, config: ValidatedConfig, binaries: WorkerBinaries) -> Self {
        Self {
            runner,
            config,
            binaries,
        }
    }

    /// Drive every configured stage to the barrier and return the terminal
    /// run record. Infallible at the signature level: all failure modes are
    /// folded into the run state.
    pub async fn execute(&self) -> PipelineRun {
        let mut run = PipelineRun::new(self.config.n_groups());
        let recursion = self.config.proof().recursion;

        info!(
            run_id = %run.run_id,
            n_groups = self.config.n_groups(),
            field = %self.config.proof().field,
            recursion,
            "pipeline run starting"
        );

        for &stage in PipelineStage::sequence(recursion) {
            if let Err(err) = run.begin_stage(stage) {
                run.fail(err.to_string());
                return run;
            }

            let outcomes = self.run_stage(stage).await;

            let failures: Vec<String> = outcomes
                .iter()
                .filter(|o| !o.succeeded)
                .map(|o| format!("group {} {}: {}", o.group_index, o.stage, o.status))
                .collect();
            run.record_outcomes(outcomes);

            if !failures.is_empty() {
                let reason = failures.join("; ");
                warn!(run_id = %run.run_id, %stage, %reason, "stage failed, aborting run");
                run.fail(reason);
                return run;
            }

            info!(run_id = %run.run_id, %stage, "stage complete for all groups");
        }

        match run.complete() {
            Ok(()) => info!(run_id = %run.run_id, "pipeline run succeeded"),
            Err(err) => run.fail(err.to_string()),
        }
        run
    }

    /// One stage for all groups: fan-out, then drain the barrier.
    async fn run_stage(&self, stage: PipelineStage) -> Vec<GroupOutcome> {
        let topology = self.config.topology();
        let builder = CommandBuilder::new(self.config.proof(), &self.binaries);

        let mut tasks: JoinSet<GroupOutcome> = JoinSet::new();
        for (group_index, cpu_ids) in topology.cpu_ids.iter().enumerate() {
            let command = builder.stage_command(stage, cpu_ids);
            let artifact = (stage == PipelineStage::Prove).then(|| builder.artifact(cpu_ids));
            let runner = Arc::clone(&self.runner);

            tasks.spawn(async move {
                match runner.run(group_index, command).await {
                    Ok(GroupExit {
                        status,
                        stderr_tail,
                        ..
                    }) => {
                        let succeeded = stage_succeeded(stage, &status, artifact.as_deref());
                        GroupOutcome {
                            group_index,
                            stage,
                            status,
                            artifact,
                            succeeded,
                            stderr_tail,
                        }
                    }
                    // Spawn refusal is fatal for the group; it is folded in
                    // here and judged with everything else at the barrier.
                    Err(launch) => GroupOutcome {
                        group_index,
                        stage,
                        status: WorkerStatus::SpawnFailed(launch.to_string()),
                        artifact,
                        succeeded: false,
                        stderr_tail: String::new(),
                    },
                }
            });
        }

        let mut outcomes = Vec::with_capacity(topology.n_groups);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => warn!(%stage, "stage task aborted: {err}"),
            }
        }

        // A panicked task leaves a hole; surface it as a lost group rather
        // than under-reporting the stage.
        if outcomes.len() != topology.n_groups {
            let present: HashSet<usize> = outcomes.iter().map(|o| o.group_index).collect();
            for group_index in 0..topology.n_groups {
                if !present.contains(&group_index) {
                    outcomes.push(GroupOutcome {
                        group_index,
                        stage,
                        status: WorkerStatus::Lost("stage task aborted".into()),
                        artifact: None,
                        succeeded: false,
                        stderr_tail: String::new(),
                    });
                }
            }
        }

        outcomes.sort_by_key(|o| o.group_index);
        outcomes
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
