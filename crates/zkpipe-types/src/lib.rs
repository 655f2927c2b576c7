//! `zkpipe-types` — Shared configuration and validation for the proof
//! pipeline controller.
//!
//! Everything downstream (worker command building, the stage coordinator,
//! the CLI) consumes the typed, immutable [`ValidatedConfig`] produced here.
//! Validation is a pure gate: it runs once, before any process is spawned,
//! and nothing re-validates partially later.

pub mod config;
pub mod error;
pub mod field;
pub mod stage;
pub mod validator;

// ── Public re-exports ────────────────────────────────────────────────────────

pub use config::{ProofConfig, RunConfigFile, RunMode, TopologyConfig, WorkerBinaries};
pub use error::{ConfigError, Result};
pub use field::FieldKind;
pub use stage::PipelineStage;
pub use validator::{validate, validate_with_cpu_count, ValidateOptions, ValidatedConfig};
