//! `zkpipe-client` — Side-channel clients for the proving stack.
//!
//! - [`http`]: smoke-test client for the prover's HTTP serve mode. The wire
//!   contract is bit-exact and owned by the server; this client only frames
//!   bytes and interprets the fixed replies.
//! - [`benchlog`]: parser for criterion's JSON-lines benchmark output,
//!   reducing it to median seconds per benchmark.

pub mod benchlog;
pub mod error;
pub mod http;

// ── Public re-exports ────────────────────────────────────────────────────────

pub use benchlog::{parse_criterion_log, BenchSummary};
pub use error::{ClientError, Result};
pub use http::{encode_verify_payload, SmokeClient};
