//! Result aggregation: terminal run record → process exit code plus a
//! human-readable per-group, per-stage summary. Pure reducer; never touches
//! pipeline state.

use std::fmt;

use zkpipe_types::PipelineStage;

use crate::run::{PipelineRun, RunState};

/// Exit code for failures before any process was spawned (config parse or
/// validation, unknown CPU count). Reaches the OS as 255.
pub const PREFLIGHT_EXIT_CODE: i32 = -1;

// ── Summary ──────────────────────────────────────────────────────────────────

/// One group's result at one stage, rendered for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub group_index: usize,
    pub stage: PipelineStage,
    pub status: String,
    pub ok: bool,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub state: RunState,
    pub exit_code: i32,
    pub failure_reason: Option<String>,
    pub lines: Vec<SummaryLine>,
}

/// Reduce a terminal run to its exit code and summary.
///
/// Exit code: 0 iff the run succeeded; otherwise the first failing group's
/// exit code (1 when the worker died without one).
pub fn summarize(run: &PipelineRun) -> RunSummary {
    let lines: Vec<SummaryLine> = run
        .outcomes
        .iter()
        .map(|o| SummaryLine {
            group_index: o.group_index,
            stage: o.stage,
            status: o.status.to_string(),
            ok: o.succeeded,
        })
        .collect();

    let exit_code = if run.succeeded() {
        0
    } else {
        run.outcomes
            .iter()
            .find(|o| !o.succeeded)
            .map(|o| match o.status.exit_code() {
                // An exit-0 prove with a missing artifact still failed.
                0 => 1,
                code => code,
            })
            .unwrap_or(1)
    };

    RunSummary {
        run_id: run.run_id.clone(),
        state: run.state,
        exit_code,
        failure_reason: run.failure_reason.clone(),
        lines,
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "run {}  {}", self.run_id, self.state)?;
        for line in &self.lines {
            writeln!(
                f,
                "  group {:<2} {:<7} {}  {}",
                line.group_index,
                line.stage.to_string(),
                if line.ok { "ok " } else { "FAIL" },
                line.status,
            )?;
        }
        if let Some(reason) = &self.failure_reason {
            writeln!(f, "  reason: {reason}")?;
        }
        write!(f, "exit code: {}", self.exit_code)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::GroupOutcome;
    use zkpipe_worker::WorkerStatus;

    fn outcome(
        group: usize,
        stage: PipelineStage,
        status: WorkerStatus,
        succeeded: bool,
    ) -> GroupOutcome {
        GroupOutcome {
            group_index: group,
            stage,
            status,
            artifact: None,
            succeeded,
            stderr_tail: String::new(),
        }
    }

    fn successful_run() -> PipelineRun {
        let mut run = PipelineRun::new(2);
        run.begin_stage(PipelineStage::Prove).unwrap();
        run.record_outcomes(vec![
            outcome(0, PipelineStage::Prove, WorkerStatus::Exited(0), true),
            outcome(1, PipelineStage::Prove, WorkerStatus::Exited(0), true),
        ]);
        run.begin_stage(PipelineStage::Verify).unwrap();
        run.record_outcomes(vec![
            outcome(0, PipelineStage::Verify, WorkerStatus::Exited(0), true),
            outcome(1, PipelineStage::Verify, WorkerStatus::Exited(0), true),
        ]);
        run.complete().unwrap();
        run
    }

    #[test]
    fn success_is_exit_zero() {
        let summary = summarize(&successful_run());
        assert_eq!(summary.exit_code, 0);
        assert_eq!(summary.lines.len(), 4);
        assert!(summary.lines.iter().all(|l| l.ok));
    }

    #[test]
    fn first_failing_exit_code_propagates() {
        let mut run = PipelineRun::new(2);
        run.begin_stage(PipelineStage::Prove).unwrap();
        run.record_outcomes(vec![
            outcome(0, PipelineStage::Prove, WorkerStatus::Exited(42), false),
            outcome(1, PipelineStage::Prove, WorkerStatus::Exited(0), true),
        ]);
        run.fail("group 0 prove: exit 42");

        let summary = summarize(&run);
        assert_eq!(summary.exit_code, 42);
        assert_eq!(summary.failure_reason.as_deref(), Some("group 0 prove: exit 42"));
    }

    #[test]
    fn signal_death_maps_to_one() {
        let mut run = PipelineRun::new(1);
        run.begin_stage(PipelineStage::Prove).unwrap();
        run.record_outcomes(vec![outcome(
            0,
            PipelineStage::Prove,
            WorkerStatus::Signaled,
            false,
        )]);
        run.fail("group 0 prove: killed by signal");
        assert_eq!(summarize(&run).exit_code, 1);
    }

    #[test]
    fn missing_artifact_with_exit_zero_maps_to_one() {
        let mut run = PipelineRun::new(1);
        run.begin_stage(PipelineStage::Prove).unwrap();
        run.record_outcomes(vec![outcome(
            0,
            PipelineStage::Prove,
            WorkerStatus::Exited(0),
            false,
        )]);
        run.fail("group 0 prove: exit 0");
        assert_eq!(summarize(&run).exit_code, 1);
    }

    #[test]
    fn display_lists_every_group_and_stage() {
        let rendered = summarize(&successful_run()).to_string();
        assert!(rendered.contains("group 0"));
        assert!(rendered.contains("group 1"));
        assert!(rendered.contains("prove"));
        assert!(rendered.contains("verify"));
        assert!(rendered.contains("exit code: 0"));
    }
}
