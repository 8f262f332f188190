use crate::policies::{build_population, PolicyOptions};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Result};
use dino_core::{Generation, GenerationReport, SimConfig, TerminationReason};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct MemberMetrics {
    pub index: usize,
    pub policy_id: String,
    pub fitness: f64,
    pub distance: u64,
    pub ticks_lived: u32,
    pub died_at: Option<u32>,
    pub survived: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub generation: u32,
    pub seed: u32,
    pub seed_hex: String,
    pub tick_cap: u32,
    pub ticks: u32,
    pub final_speed: i32,
    pub termination: TerminationReason,
    pub alive_count: usize,
    pub obstacles_spawned: u32,
    pub best_index: Option<usize>,
    pub best_fitness: f64,
    pub members: Vec<MemberMetrics>,
}

/// Runs one generation of `population` on `seed` to termination.
pub fn run_population(
    population: &[String],
    seed: u32,
    ordinal: u32,
    config: &SimConfig,
    options: &PolicyOptions,
) -> Result<RunMetrics> {
    let policies = build_population(population, seed, options)?;
    let mut generation = Generation::new(*config, seed, ordinal, policies)?;

    tracing::info!(
        generation = ordinal,
        seed = %seed_to_hex(seed),
        population = population.len(),
        tick_cap = config.tick_cap,
        "generation started"
    );

    while !generation.is_terminated() {
        let outcome = generation.step()?;
        if outcome.deaths == 0 {
            continue;
        }
        for (index, agent) in generation.agents().iter().enumerate() {
            if agent.died_at() == Some(outcome.tick) {
                tracing::debug!(
                    generation = ordinal,
                    tick = outcome.tick,
                    member = index,
                    policy = %population[index],
                    distance = agent.distance(),
                    "agent died"
                );
            }
        }
    }

    let report = generation.report();
    let metrics = collect_metrics(population, config, &report, generation.agents())?;
    tracing::info!(
        generation = ordinal,
        seed = %metrics.seed_hex,
        termination = metrics.termination.as_str(),
        ticks = metrics.ticks,
        alive = metrics.alive_count,
        best_fitness = metrics.best_fitness,
        "generation finished"
    );
    Ok(metrics)
}

fn collect_metrics(
    population: &[String],
    config: &SimConfig,
    report: &GenerationReport,
    agents: &[dino_core::Agent],
) -> Result<RunMetrics> {
    let termination = report
        .termination
        .ok_or_else(|| anyhow!("generation {} did not terminate", report.generation))?;

    let members = population
        .iter()
        .zip(agents.iter())
        .enumerate()
        .map(|(index, (policy_id, agent))| MemberMetrics {
            index,
            policy_id: policy_id.clone(),
            fitness: report.fitness[index],
            distance: agent.distance(),
            ticks_lived: agent.ticks_lived(),
            died_at: agent.died_at(),
            survived: agent.is_alive(),
        })
        .collect();

    Ok(RunMetrics {
        generation: report.generation,
        seed: report.seed,
        seed_hex: seed_to_hex(report.seed),
        tick_cap: config.tick_cap,
        ticks: report.ticks,
        final_speed: report.final_speed,
        termination,
        alive_count: report.alive_count,
        obstacles_spawned: report.obstacles_spawned,
        best_index: report.best_index(),
        best_fitness: report.best_fitness(),
        members,
    })
}
