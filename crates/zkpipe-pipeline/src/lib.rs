//! `zkpipe-pipeline` — Stage sequencing with barrier synchronization.
//!
//! This crate is a **coordination layer**, not a compute layer. All proving
//! and verification happens in external child processes driven through
//! `zkpipe-worker`; here lives only the discipline that orders them:
//!
//! ```text
//!            fan-out                barrier               fan-out
//! Prove:   [g0] [g1] [g2]  ──▶  join ALL groups  ──▶  Verify: [g0] [g1] [g2] ─▶ …
//! ```
//!
//! Stage S+1 is never launched for any group until stage S has returned for
//! all groups, and a failed group fails the whole run at the barrier. A
//! fast group never runs ahead on top of a sibling's failure.

pub mod aggregator;
pub mod coordinator;
pub mod error;
pub mod run;

// ── Public re-exports ────────────────────────────────────────────────────────

pub use aggregator::{summarize, RunSummary, SummaryLine, PREFLIGHT_EXIT_CODE};
pub use coordinator::PipelineCoordinator;
pub use error::{PipelineError, Result};
pub use run::{GroupOutcome, PipelineRun, RunState};
