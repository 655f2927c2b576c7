//! zkpipe binary — proof-pipeline controller.
//!
//! ```bash
//! # Drive the full distributed pipeline from a run-config file
//! RUST_LOG=info zkpipe run --config run.json
//!
//! # HTTP round-trip against a prover in serve mode
//! zkpipe smoke --url http://127.0.0.1:3030 --witness data/witness.txt
//!
//! # Reduce a criterion JSON log to median seconds per benchmark
//! zkpipe parse-bench bench.log bench-summary.json
//! ```

use std::fs;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zkpipe_client::{parse_criterion_log, ClientError, SmokeClient};
use zkpipe_pipeline::{summarize, PipelineCoordinator, PREFLIGHT_EXIT_CODE};
use zkpipe_types::{validate, RunConfigFile, RunMode, ValidateOptions};
use zkpipe_worker::ProcessGroupLauncher;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name    = "zkpipe",
    version = env!("CARGO_PKG_VERSION"),
    about   = "Distributed proof-pipeline controller"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the run config, then drive Prove → Verify [→ Recurse]
    /// across all process groups.
    Run {
        /// Path to the JSON run-config file.
        #[arg(long)]
        config: PathBuf,

        /// Also reject CPU ids shared between groups.
        #[arg(long)]
        strict_cpus: bool,

        /// Restrict the run to the first configured group.
        #[arg(long)]
        debug_single_group: bool,
    },

    /// HTTP round-trip smoke test against a prover in serve mode.
    Smoke {
        /// Base URL of the serving prover.
        #[arg(long)]
        url: String,

        /// Witness file to prove.
        #[arg(long)]
        witness: PathBuf,

        /// Where to write the returned proof bytes.
        #[arg(long)]
        proof_out: Option<PathBuf>,
    },

    /// Reduce a criterion JSON benchmark log to a summary file.
    ParseBench {
        input: PathBuf,
        output: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Default log level: INFO. Override with RUST_LOG=zkpipe_pipeline=debug etc.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            config,
            strict_cpus,
            debug_single_group,
        } => {
            let code = run_pipeline(&config, strict_cpus, debug_single_group).await?;
            std::process::exit(code);
        }
        Command::Smoke {
            url,
            witness,
            proof_out,
        } => run_smoke(&url, &witness, proof_out.as_deref()).await,
        Command::ParseBench { input, output } => parse_bench(&input, &output),
    }
}

// ── Pipeline run ──────────────────────────────────────────────────────────────

async fn run_pipeline(config: &PathBuf, strict_cpus: bool, debug_single_group: bool) -> Result<i32> {
    let raw = match fs::read_to_string(config) {
        Ok(raw) => raw,
        Err(err) => {
            error!(path = %config.display(), %err, "cannot read run config");
            return Ok(PREFLIGHT_EXIT_CODE);
        }
    };
    let file: RunConfigFile = match serde_json::from_str(&raw) {
        Ok(file) => file,
        Err(err) => {
            error!(path = %config.display(), %err, "run config is not valid");
            return Ok(PREFLIGHT_EXIT_CODE);
        }
    };

    let (topology, proof, binaries) = file.split();
    let mode = if debug_single_group {
        RunMode::SingleGroupDebug
    } else {
        RunMode::Standard
    };
    let topology = topology.apply_mode(mode);

    let opts = ValidateOptions {
        strict_cpu_exclusivity: strict_cpus,
    };
    // The gate: nothing is spawned past a rejected config.
    let validated = match validate(topology, proof, &opts) {
        Ok(validated) => validated,
        Err(err) => {
            error!(%err, "configuration rejected");
            return Ok(PREFLIGHT_EXIT_CODE);
        }
    };

    let coordinator = PipelineCoordinator::new(
        Arc::new(ProcessGroupLauncher::new()),
        validated,
        binaries,
    );
    let run = coordinator.execute().await;

    let summary = summarize(&run);
    println!("{summary}");
    Ok(summary.exit_code)
}

// ── Smoke test ────────────────────────────────────────────────────────────────

/// Prove → verify → tampered-proof verify → truncated-witness prove,
/// asserting the server's fixed replies at each step.
async fn run_smoke(url: &str, witness_path: &PathBuf, proof_out: Option<&std::path::Path>) -> Result<()> {
    let witness = fs::read(witness_path)
        .with_context(|| format!("reading witness {}", witness_path.display()))?;
    if witness.is_empty() {
        bail!("witness file {} is empty", witness_path.display());
    }
    let client = SmokeClient::new(url);

    let proof = client.prove(&witness).await.context("prove request")?;
    info!(proof_len = proof.len(), "proof generated");
    if let Some(path) = proof_out {
        fs::write(path, &proof).with_context(|| format!("writing {}", path.display()))?;
    }

    if !client.verify(&witness, &proof).await.context("verify request")? {
        bail!("verification of a fresh proof reported failure");
    }
    info!("proof verified");

    // Flip one bit; the server must answer with the literal "failure".
    let mut tampered = proof.clone();
    tampered[proof.len() / 2] ^= 1;
    if client.verify(&witness, &tampered).await.context("tampered verify request")? {
        bail!("tampered proof was not rejected");
    }
    info!("tampered proof rejected");

    // Truncate the witness by one byte; the server must answer 400.
    match client.prove(&witness[..witness.len() - 1]).await {
        Err(ClientError::InvalidWitnessLength) => {
            info!("invalid witness length rejected");
        }
        Ok(_) => bail!("truncated witness was accepted"),
        Err(err) => return Err(err).context("truncated-witness prove request"),
    }

    info!("smoke test passed");
    Ok(())
}

// ── Benchmark log ─────────────────────────────────────────────────────────────

fn parse_bench(input: &PathBuf, output: &PathBuf) -> Result<()> {
    let file = fs::File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let results = parse_criterion_log(BufReader::new(file))?;

    let json = serde_json::to_string_pretty(&results)?;
    fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;

    info!(
        benchmarks = results.len(),
        output = %output.display(),
        "benchmark summary written"
    );
    Ok(())
}
