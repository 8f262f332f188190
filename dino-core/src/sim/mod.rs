use alloc::boxed::Box;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Pose};
use crate::config::SimConfig;
use crate::difficulty::Difficulty;
use crate::error::SimError;
use crate::obstacle::{ObstacleKind, ObstacleStream};
use crate::policy::{FitnessSink, Policy};
use crate::rng::SeededRng;

mod generation;

pub use generation::Generation;

/// Shared environment of one generation: tick counter, difficulty and the
/// obstacle timeline. Every agent reads the same instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationState {
    tick: u32,
    difficulty: Difficulty,
    obstacles: ObstacleStream,
    rng: SeededRng,
}

impl SimulationState {
    pub fn new(config: &SimConfig, seed: u32) -> Self {
        Self {
            tick: 0,
            difficulty: Difficulty::new(config.base_speed, config.ramp_interval),
            obstacles: ObstacleStream::new(),
            rng: SeededRng::new(seed),
        }
    }

    #[inline]
    pub fn tick(&self) -> u32 {
        self.tick
    }

    #[inline]
    pub fn speed(&self) -> i32 {
        self.difficulty.speed()
    }

    #[inline]
    pub fn obstacles(&self) -> &ObstacleStream {
        &self.obstacles
    }

    #[inline]
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Obstacles scroll at the pre-ramp speed; the ramp lands afterwards.
    pub fn advance(&mut self, config: &SimConfig) {
        self.tick += 1;
        self.obstacles
            .advance(self.difficulty.speed(), config.world_width, &mut self.rng);
        self.difficulty.advance();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    AllDead,
    TickCap,
    Aborted,
    ContractViolation,
}

impl TerminationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllDead => "all_dead",
            Self::TickCap => "tick_cap",
            Self::Aborted => "aborted",
            Self::ContractViolation => "contract_violation",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationStatus {
    Running,
    Terminated(TerminationReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    pub tick: u32,
    pub speed: i32,
    pub alive_count: usize,
    pub deaths: usize,
    pub status: GenerationStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub pose: Pose,
    pub x: i32,
    pub y: i32,
    pub alive: bool,
    pub distance: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub kind: ObstacleKind,
    pub variant: u8,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Read-only view for presentation layers. Taking one never mutates the
/// generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub generation: u32,
    pub tick: u32,
    pub speed: i32,
    pub alive_count: usize,
    pub agents: Vec<AgentSnapshot>,
    pub obstacles: Vec<ObstacleSnapshot>,
}

/// Compact per-tick fingerprint for regression checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub tick: u32,
    pub speed: i32,
    pub alive_count: usize,
    pub rng_state: u32,
    pub obstacles_spawned: u32,
    pub obstacle_kind: Option<ObstacleKind>,
    pub obstacle_x: Option<i32>,
    pub best_distance: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: u32,
    pub seed: u32,
    pub ticks: u32,
    pub final_speed: i32,
    pub termination: Option<TerminationReason>,
    pub alive_count: usize,
    pub obstacles_spawned: u32,
    /// Index-aligned with the input population.
    pub fitness: Vec<f64>,
    pub distances: Vec<u64>,
    pub ticks_lived: Vec<u32>,
}

impl GenerationReport {
    pub fn best_fitness(&self) -> f64 {
        self.fitness
            .iter()
            .copied()
            .fold(0.0, |best, value| if value > best { value } else { best })
    }

    /// First member holding the best fitness.
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (index, value) in self.fitness.iter().enumerate() {
            match best {
                Some(current) if self.fitness[current] >= *value => {}
                _ => best = Some(index),
            }
        }
        best
    }
}

/// Hands out generation ordinals; the only state that outlives a generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationCounter {
    current: u32,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn next_ordinal(&mut self) -> u32 {
        self.current += 1;
        self.current
    }
}

pub fn run_generation<'p>(
    config: SimConfig,
    seed: u32,
    ordinal: u32,
    policies: Vec<Box<dyn Policy + 'p>>,
) -> Result<GenerationReport, SimError> {
    let mut generation = Generation::new(config, seed, ordinal, policies)?;
    generation.run()
}

/// Runs one generation for `(policy, sink)` pairs and writes each member's
/// fitness back into its sink, index-aligned.
pub fn evaluate_population<P, S>(
    config: SimConfig,
    seed: u32,
    ordinal: u32,
    members: &mut [(P, S)],
) -> Result<GenerationReport, SimError>
where
    P: Policy,
    S: FitnessSink,
{
    let report = {
        let policies: Vec<Box<dyn Policy + '_>> = members
            .iter_mut()
            .map(|(policy, _)| Box::new(policy) as Box<dyn Policy + '_>)
            .collect();
        run_generation(config, seed, ordinal, policies)?
    };

    for ((_, sink), fitness) in members.iter_mut().zip(report.fitness.iter()) {
        sink.record_fitness(*fitness);
    }

    Ok(report)
}

/// Runs to termination, sampling a checkpoint at tick 0, every
/// `sample_every` ticks and at the final tick.
pub fn run_with_checkpoints<'p>(
    config: SimConfig,
    seed: u32,
    policies: Vec<Box<dyn Policy + 'p>>,
    sample_every: u32,
) -> Result<(GenerationReport, Vec<Checkpoint>), SimError> {
    let stride = if sample_every == 0 { 1 } else { sample_every };
    let mut generation = Generation::new(config, seed, 1, policies)?;
    let mut checkpoints = Vec::new();
    checkpoints.push(generation.checkpoint());

    while !generation.is_terminated() {
        let outcome = generation.step()?;
        let finished = matches!(outcome.status, GenerationStatus::Terminated(_));
        if outcome.tick % stride == 0 || finished {
            checkpoints.push(generation.checkpoint());
        }
    }

    Ok((generation.report(), checkpoints))
}
