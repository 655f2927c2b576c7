use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ── Field Kind ───────────────────────────────────────────────────────────────

/// Finite field the circuit is arithmetized over.
///
/// Serde/wire names match the external prover's field identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    #[serde(rename = "gf2ext128")]
    Gf2Ext128,
    #[serde(rename = "m31ext3")]
    M31Ext3,
    #[serde(rename = "fr")]
    Fr,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gf2Ext128 => "gf2ext128",
            Self::M31Ext3 => "m31ext3",
            Self::Fr => "fr",
        }
    }

    /// The recursion backend currently only supports bn254 GKR → Groth16,
    /// so aggregation is limited to the `fr` field.
    pub fn supports_recursion(&self) -> bool {
        matches!(self, Self::Fr)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gf2ext128" => Ok(Self::Gf2Ext128),
            "m31ext3" => Ok(Self::M31Ext3),
            "fr" => Ok(Self::Fr),
            other => Err(ConfigError::UnknownField(other.to_string())),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
