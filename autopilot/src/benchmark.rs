use crate::policies::PolicyOptions;
use crate::runner::{run_population, RunMetrics};
use anyhow::{anyhow, Context, Result};
use dino_core::{GenerationCounter, SimConfig, TerminationReason};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    /// Population evaluated together on every seed.
    pub population: Vec<String>,
    pub seeds: Vec<u32>,
    pub sim: SimConfig,
    pub policy_options: PolicyOptions,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

/// One population member on one seed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub generation: u32,
    pub seed: u32,
    pub seed_hex: String,
    pub member: usize,
    pub policy_id: String,
    pub fitness: f64,
    pub distance: u64,
    pub ticks_lived: u32,
    pub died_at: Option<u32>,
    pub survived: bool,
    pub generation_ticks: u32,
    pub termination: TerminationReason,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyAggregate {
    pub policy_id: String,
    pub runs: usize,
    pub avg_fitness: f64,
    pub max_fitness: f64,
    pub avg_distance: f64,
    pub max_distance: u64,
    pub avg_ticks_lived: f64,
    pub survival_rate: f64,
    /// Generations in which this policy held the best fitness.
    pub wins: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: u32,
    pub seed: u32,
    pub seed_hex: String,
    pub ticks: u32,
    pub final_speed: i32,
    pub termination: TerminationReason,
    pub alive_count: usize,
    pub obstacles_spawned: u32,
    pub best_policy: Option<String>,
    pub best_fitness: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub tick_cap: u32,
    pub jobs: Option<usize>,
    pub population: Vec<String>,
    pub seeds: Vec<u32>,
    pub generation_count: usize,
    pub run_count: usize,
    pub policy_rankings: Vec<PolicyAggregate>,
    pub generations: Vec<GenerationSummary>,
    pub runs: Vec<RunRecord>,
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.population.is_empty() {
        return Err(anyhow!("benchmark requires at least one policy"));
    }
    config.sim.validate()?;
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }

    let mut counter = GenerationCounter::new();
    let run_jobs: Vec<(u32, u32)> = config
        .seeds
        .iter()
        .map(|seed| (counter.next_ordinal(), *seed))
        .collect();

    tracing::info!(
        generations = run_jobs.len(),
        population = config.population.len(),
        tick_cap = config.sim.tick_cap,
        "benchmark started"
    );

    let run_one = |(ordinal, seed): &(u32, u32)| -> Result<RunMetrics> {
        let metrics = run_population(
            &config.population,
            *seed,
            *ordinal,
            &config.sim,
            &config.policy_options,
        )
        .with_context(|| format!("benchmark run failed for seed={seed:#x}"))?;
        tracing::debug!(
            generation = *ordinal,
            ticks = metrics.ticks,
            "benchmark job done"
        );
        Ok(metrics)
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let mut generations = Vec::with_capacity(run_results.len());
    for result in run_results {
        generations.push(result?);
    }

    let run_records: Vec<RunRecord> = generations
        .iter()
        .flat_map(|metrics| {
            metrics.members.iter().map(move |member| RunRecord {
                generation: metrics.generation,
                seed: metrics.seed,
                seed_hex: metrics.seed_hex.clone(),
                member: member.index,
                policy_id: member.policy_id.clone(),
                fitness: member.fitness,
                distance: member.distance,
                ticks_lived: member.ticks_lived,
                died_at: member.died_at,
                survived: member.survived,
                generation_ticks: metrics.ticks,
                termination: metrics.termination,
            })
        })
        .collect();

    let rankings = rank_policies(&generations, &run_records);

    let summaries: Vec<GenerationSummary> = generations
        .iter()
        .map(|metrics| GenerationSummary {
            generation: metrics.generation,
            seed: metrics.seed,
            seed_hex: metrics.seed_hex.clone(),
            ticks: metrics.ticks,
            final_speed: metrics.final_speed,
            termination: metrics.termination,
            alive_count: metrics.alive_count,
            obstacles_spawned: metrics.obstacles_spawned,
            best_policy: metrics
                .best_index
                .map(|index| metrics.members[index].policy_id.clone()),
            best_fitness: metrics.best_fitness,
        })
        .collect();

    write_runs_csv(&config.out_dir.join("runs.csv"), &run_records)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &rankings)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        tick_cap: config.sim.tick_cap,
        jobs: config.jobs,
        population: config.population,
        seeds: config.seeds,
        generation_count: summaries.len(),
        run_count: run_records.len(),
        policy_rankings: rankings,
        generations: summaries,
        runs: run_records,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    tracing::info!(
        runs = report.run_count,
        out_dir = %config.out_dir.display(),
        "benchmark finished"
    );

    Ok(report)
}

fn rank_policies(generations: &[RunMetrics], runs: &[RunRecord]) -> Vec<PolicyAggregate> {
    let mut grouped: HashMap<&str, Vec<&RunRecord>> = HashMap::new();
    for run in runs {
        grouped.entry(run.policy_id.as_str()).or_default().push(run);
    }

    let mut wins: HashMap<&str, usize> = HashMap::new();
    for metrics in generations {
        if let Some(index) = metrics.best_index {
            *wins.entry(metrics.members[index].policy_id.as_str()).or_default() += 1;
        }
    }

    let mut rankings: Vec<PolicyAggregate> = grouped
        .into_iter()
        .map(|(policy_id, policy_runs)| {
            let count = policy_runs.len() as f64;
            let sum_fitness: f64 = policy_runs.iter().map(|r| r.fitness).sum();
            let max_fitness = policy_runs
                .iter()
                .map(|r| r.fitness)
                .fold(0.0, f64::max);
            let sum_distance: u64 = policy_runs.iter().map(|r| r.distance).sum();
            let max_distance = policy_runs
                .iter()
                .map(|r| r.distance)
                .max()
                .unwrap_or_default();
            let sum_ticks: u64 = policy_runs.iter().map(|r| r.ticks_lived as u64).sum();
            let survived = policy_runs.iter().filter(|r| r.survived).count();

            PolicyAggregate {
                policy_id: policy_id.to_string(),
                runs: policy_runs.len(),
                avg_fitness: sum_fitness / count,
                max_fitness,
                avg_distance: sum_distance as f64 / count,
                max_distance,
                avg_ticks_lived: sum_ticks as f64 / count,
                survival_rate: survived as f64 / count,
                wins: wins.get(policy_id).copied().unwrap_or_default(),
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.avg_fitness
            .total_cmp(&a.avg_fitness)
            .then_with(|| b.survival_rate.total_cmp(&a.survival_rate))
            .then_with(|| a.policy_id.cmp(&b.policy_id))
    });
    rankings
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "generation,seed_hex,seed,member,policy_id,fitness,distance,ticks_lived,died_at,survived,generation_ticks,termination\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{:.4},{},{},{},{},{},{}\n",
            row.generation,
            row.seed_hex,
            row.seed,
            row.member,
            row.policy_id,
            row.fitness,
            row.distance,
            row.ticks_lived,
            row.died_at.map(|tick| tick.to_string()).unwrap_or_default(),
            row.survived,
            row.generation_ticks,
            row.termination.as_str()
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[PolicyAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,policy_id,runs,avg_fitness,max_fitness,avg_distance,max_distance,avg_ticks_lived,survival_rate,wins\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{:.4},{:.4},{:.2},{},{:.2},{:.4},{}\n",
            idx + 1,
            row.policy_id,
            row.runs,
            row.avg_fitness,
            row.max_fitness,
            row.avg_distance,
            row.max_distance,
            row.avg_ticks_lived,
            row.survival_rate,
            row.wins
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
