//! Smoke-test client for the prover's HTTP serve mode.
//!
//! Wire contract (server-owned, preserved bit-exact):
//! - `POST /prove`, body = raw witness bytes, `application/octet-stream`.
//!   200 ⇒ body is the proof bytes; 400 ⇒ the witness length is invalid.
//! - `POST /verify`, body = u64-LE witness length ‖ u64-LE proof length ‖
//!   witness ‖ proof. Reply text is the literal `"success"` or `"failure"`.
//! - `GET /ready` ⇒ 200 once the server is serving.

use tracing::info;

use crate::error::{ClientError, Result};

const OCTET_STREAM: &str = "application/octet-stream";

// ── Payload framing ──────────────────────────────────────────────────────────

/// Frame the `/verify` request body: both lengths as 8-byte little-endian
/// prefixes, then the raw bytes.
pub fn encode_verify_payload(witness: &[u8], proof: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(16 + witness.len() + proof.len());
    body.extend_from_slice(&(witness.len() as u64).to_le_bytes());
    body.extend_from_slice(&(proof.len() as u64).to_le_bytes());
    body.extend_from_slice(witness);
    body.extend_from_slice(proof);
    body
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct SmokeClient {
    base_url: String,
    http: reqwest::Client,
}

impl SmokeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Check the server is up.
    pub async fn ready(&self) -> Result<()> {
        let resp = self.http.get(format!("{}/ready", self.base_url)).send().await?;
        match resp.status().as_u16() {
            200 => Ok(()),
            other => Err(ClientError::UnexpectedStatus(other)),
        }
    }

    /// Prove a witness; returns the raw proof bytes.
    pub async fn prove(&self, witness: &[u8]) -> Result<Vec<u8>> {
        let resp = self
            .http
            .post(format!("{}/prove", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, OCTET_STREAM)
            .body(witness.to_vec())
            .send()
            .await?;

        match resp.status().as_u16() {
            200 => {
                let proof = resp.bytes().await?.to_vec();
                info!(proof_len = proof.len(), "proof generated");
                Ok(proof)
            }
            400 => Err(ClientError::InvalidWitnessLength),
            other => Err(ClientError::UnexpectedStatus(other)),
        }
    }

    /// Verify a proof against its witness. `Ok(true)` on the literal
    /// `"success"` reply, `Ok(false)` on `"failure"`.
    pub async fn verify(&self, witness: &[u8], proof: &[u8]) -> Result<bool> {
        let resp = self
            .http
            .post(format!("{}/verify", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, OCTET_STREAM)
            .body(encode_verify_payload(witness, proof))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            return Err(ClientError::UnexpectedStatus(status));
        }

        match resp.text().await?.as_str() {
            "success" => Ok(true),
            "failure" => Ok(false),
            other => Err(ClientError::UnexpectedVerifyReply(other.to_string())),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_payload_layout() {
        let witness = [0xAAu8; 5];
        let proof = [0xBBu8; 3];
        let body = encode_verify_payload(&witness, &proof);

        assert_eq!(body.len(), 16 + 5 + 3);
        assert_eq!(&body[0..8], &5u64.to_le_bytes());
        assert_eq!(&body[8..16], &3u64.to_le_bytes());
        assert_eq!(&body[16..21], &witness);
        assert_eq!(&body[21..24], &proof);
    }

    #[test]
    fn verify_payload_empty_inputs() {
        let body = encode_verify_payload(&[], &[]);
        assert_eq!(body, vec![0u8; 16]);
    }

    #[test]
    fn base_url_trailing_slash_stripped() {
        let client = SmokeClient::new("http://127.0.0.1:3030/");
        assert_eq!(client.base_url, "http://127.0.0.1:3030");
    }
}
