//! Criterion benchmark-log reduction.
//!
//! Input: a criterion `--message-format json` line stream. Only
//! `benchmark-complete` records are kept; everything else, including lines
//! that are not JSON at all, is skipped. Median estimates are normalized to
//! seconds regardless of the unit criterion chose.

use std::collections::BTreeMap;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawLine {
    reason: String,
    id: Option<String>,
    median: Option<RawEstimate>,
}

#[derive(Debug, Deserialize)]
struct RawEstimate {
    estimate: f64,
    unit: String,
}

/// Reduced result for one benchmark id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchSummary {
    pub median_seconds: f64,
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Reduce a criterion JSON-lines stream to `benchmark id → median seconds`.
pub fn parse_criterion_log<R: BufRead>(reader: R) -> Result<BTreeMap<String, BenchSummary>> {
    let mut results = BTreeMap::new();

    for line in reader.lines() {
        let line = line?;
        let Ok(raw) = serde_json::from_str::<RawLine>(&line) else {
            continue;
        };
        if raw.reason != "benchmark-complete" {
            continue;
        }
        let (Some(id), Some(median)) = (raw.id, raw.median) else {
            continue;
        };
        results.insert(
            id,
            BenchSummary {
                median_seconds: to_seconds(median.estimate, &median.unit),
            },
        );
    }

    Ok(results)
}

/// Unknown units are taken as already-seconds, matching criterion's default.
fn to_seconds(value: f64, unit: &str) -> f64 {
    match unit {
        "ns" => value * 1e-9,
        "us" => value * 1e-6,
        "ms" => value * 1e-3,
        _ => value,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
