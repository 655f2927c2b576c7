use std::fmt;
use std::path::PathBuf;

use zkpipe_types::PipelineStage;
use zkpipe_worker::WorkerStatus;

use crate::error::{PipelineError, Result};

// ── Run State Machine ────────────────────────────────────────────────────────

/// Pending → Proving → Verifying [→ Recursing] → Succeeded | Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing launched yet.
    Pending,
    /// Prove stage in flight across all groups.
    Proving,
    /// Verify stage in flight across all groups.
    Verifying,
    /// Recursive aggregation in flight across all groups.
    Recursing,
    /// Every configured stage succeeded for every group.
    Succeeded,
    /// Some group failed a stage; nothing further was launched.
    Failed,
}

impl RunState {
    /// The active state while `stage` is in flight.
    fn active_for(stage: PipelineStage) -> Self {
        match stage {
            PipelineStage::Prove => Self::Proving,
            PipelineStage::Verify => Self::Verifying,
            PipelineStage::Recurse => Self::Recursing,
        }
    }

    /// The state a stage may legally be entered from.
    fn predecessor_of(stage: PipelineStage) -> Self {
        match stage {
            PipelineStage::Prove => Self::Pending,
            PipelineStage::Verify => Self::Proving,
            PipelineStage::Recurse => Self::Verifying,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Proving => "Proving",
            Self::Verifying => "Verifying",
            Self::Recursing => "Recursing",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

// ── Group outcome ────────────────────────────────────────────────────────────

/// One group's result for one stage, as observed at the barrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    pub group_index: usize,
    pub stage: PipelineStage,
    pub status: WorkerStatus,
    /// Artifact the stage produced (Prove only).
    pub artifact: Option<PathBuf>,
    /// Success verdict, evaluated once when the outcome was recorded
    /// (includes the artifact-existence check for Prove).
    pub succeeded: bool,
    /// Captured stderr tail for diagnostics.
    pub stderr_tail: String,
}

// ── Pipeline run ─────────────────────────────────────────────────────────────

/// The full record of one pipeline execution across all groups.
#[derive(Debug)]
pub struct PipelineRun {
    pub run_id: String,
    pub state: RunState,
    pub n_groups: usize,
    pub outcomes: Vec<GroupOutcome>,
    pub failure_reason: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PipelineRun {
    pub fn new(n_groups: usize) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            state: RunState::Pending,
            n_groups,
            outcomes: Vec::new(),
            failure_reason: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// Enter a stage. Only legal from the immediately preceding state.
    pub fn begin_stage(&mut self, stage: PipelineStage) -> Result<()> {
        let expected = RunState::predecessor_of(stage);
        if self.state != expected {
            return Err(PipelineError::InvalidTransition {
                from: self.state.to_string(),
                to: RunState::active_for(stage).to_string(),
            });
        }
        self.state = RunState::active_for(stage);
        Ok(())
    }

    /// Record every group's outcome for the stage just completed.
    pub fn record_outcomes(&mut self, outcomes: Vec<GroupOutcome>) {
        self.outcomes.extend(outcomes);
    }

    /// Transition to `Succeeded`. Only legal from an active stage state.
    pub fn complete(&mut self) -> Result<()> {
        match self.state {
            RunState::Proving | RunState::Verifying | RunState::Recursing => {
                self.state = RunState::Succeeded;
                Ok(())
            }
            _ => Err(PipelineError::InvalidTransition {
                from: self.state.to_string(),
                to: RunState::Succeeded.to_string(),
            }),
        }
    }

    /// Transition to `Failed` with a reason.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.state = RunState::Failed;
        self.failure_reason = Some(reason.into());
    }

    pub fn succeeded(&self) -> bool {
        self.state == RunState::Succeeded
    }

    pub fn outcomes_for_stage(
        &self,
        stage: PipelineStage,
    ) -> impl Iterator<Item = &GroupOutcome> {
        self.outcomes.iter().filter(move |o| o.stage == stage)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
