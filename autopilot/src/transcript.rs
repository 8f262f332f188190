//! Per-tick export of one generation for viewers and regression diffs.

use crate::policies::{build_population, PolicyOptions};
use crate::util::{seed_to_hex, write_json};
use anyhow::{anyhow, Result};
use dino_core::sim::run_with_checkpoints;
use dino_core::{Checkpoint, Generation, GenerationReport, SimConfig, TickSnapshot};
use serde::Serialize;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptMode {
    /// Full presentation snapshots: every agent and obstacle.
    Snapshots,
    /// Compact checkpoints only.
    Checkpoints,
}

#[derive(Clone, Debug, Serialize)]
pub struct Transcript {
    pub mode: TranscriptMode,
    pub seed: u32,
    pub seed_hex: String,
    pub every: u32,
    pub population: Vec<String>,
    pub config: SimConfig,
    pub report: GenerationReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snapshots: Vec<TickSnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checkpoints: Vec<Checkpoint>,
}

impl Transcript {
    pub fn frames(&self) -> usize {
        self.snapshots.len() + self.checkpoints.len()
    }
}

/// Records tick 0, every `every`-th tick and the final tick.
pub fn record_transcript(
    population: &[String],
    seed: u32,
    config: &SimConfig,
    options: &PolicyOptions,
    every: u32,
    mode: TranscriptMode,
) -> Result<Transcript> {
    if every == 0 {
        return Err(anyhow!("--every must be >= 1"));
    }
    let policies = build_population(population, seed, options)?;

    let (report, snapshots, checkpoints) = match mode {
        TranscriptMode::Snapshots => {
            let mut generation = Generation::new(*config, seed, 1, policies)?;
            let mut snapshots = vec![generation.snapshot()];
            let report = generation.run_observed(|snapshot| {
                if snapshot.tick % every == 0 {
                    snapshots.push(snapshot.clone());
                }
            })?;
            if snapshots.last().map(|snapshot| snapshot.tick) != Some(report.ticks) {
                snapshots.push(generation.snapshot());
            }
            (report, snapshots, Vec::new())
        }
        TranscriptMode::Checkpoints => {
            let (report, checkpoints) = run_with_checkpoints(*config, seed, policies, every)?;
            (report, Vec::new(), checkpoints)
        }
    };

    tracing::info!(
        seed = %seed_to_hex(seed),
        mode = ?mode,
        ticks = report.ticks,
        frames = snapshots.len() + checkpoints.len(),
        "transcript recorded"
    );

    Ok(Transcript {
        mode,
        seed,
        seed_hex: seed_to_hex(seed),
        every,
        population: population.to_vec(),
        config: *config,
        report,
        snapshots,
        checkpoints,
    })
}

pub fn write_transcript(path: &Path, transcript: &Transcript) -> Result<()> {
    write_json(path, transcript)
}
