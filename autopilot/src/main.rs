use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dino_autopilot::benchmark::{run_benchmark, BenchmarkConfig};
use dino_autopilot::config::LabConfig;
use dino_autopilot::policies::{describe_policies, resolve_population, PolicyOptions};
use dino_autopilot::runner::run_population;
use dino_autopilot::transcript::{record_transcript, write_transcript, TranscriptMode};
use dino_autopilot::util::{parse_seed, resolve_seeds, seed_to_hex, write_json};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dino-autopilot")]
#[command(about = "Policy lab for the deterministic dino runner evaluation core")]
struct Cli {
    /// JSON file with simulation parameters; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// JSON weights used by every `linear` member
    #[arg(long, global = true)]
    linear_weights: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available policies
    ListPolicies,
    /// Evaluate one generation and print per-member fitness
    Run {
        #[arg(long)]
        policies: Option<String>,
        #[arg(long)]
        seed: String,
        #[arg(long)]
        tick_cap: Option<u32>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate the population on many seeds, one generation per seed
    Benchmark {
        #[arg(long)]
        policies: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long)]
        tick_cap: Option<u32>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Export per-tick snapshots or checkpoints of one generation as JSON
    Transcript {
        #[arg(long)]
        policies: Option<String>,
        #[arg(long)]
        seed: String,
        #[arg(long)]
        tick_cap: Option<u32>,
        #[arg(long, default_value_t = 1)]
        every: u32,
        #[arg(long, value_enum, default_value_t = CliTranscriptMode::Snapshots)]
        mode: CliTranscriptMode,
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliTranscriptMode {
    Snapshots,
    Checkpoints,
}

impl From<CliTranscriptMode> for TranscriptMode {
    fn from(value: CliTranscriptMode) -> Self {
        match value {
            CliTranscriptMode::Snapshots => TranscriptMode::Snapshots,
            CliTranscriptMode::Checkpoints => TranscriptMode::Checkpoints,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let Cli {
        config,
        linear_weights,
        command,
    } = Cli::parse();
    let lab = LabConfig::load(config.as_deref())?;
    let options = match linear_weights.as_deref() {
        Some(path) => PolicyOptions::with_linear_file(path)?,
        None => PolicyOptions::default(),
    };

    match command {
        Commands::ListPolicies => {
            for (id, description) in describe_policies() {
                println!("{id:10} {description}");
            }
        }
        Commands::Run {
            policies,
            seed,
            tick_cap,
            output,
        } => {
            let population = resolve_population(policies.as_deref())?;
            let seed = parse_seed(&seed)?;
            let lab = lab.with_tick_cap(tick_cap);
            let metrics = run_population(&population, seed, 1, &lab.sim, &options)?;

            println!("seed={}", seed_to_hex(seed));
            println!("ticks={}", metrics.ticks);
            println!("final_speed={}", metrics.final_speed);
            println!("termination={}", metrics.termination.as_str());
            println!("alive={}", metrics.alive_count);
            println!("obstacles={}", metrics.obstacles_spawned);
            for member in &metrics.members {
                println!(
                    "  [{:02}] {:10} fitness={:.2} distance={} died_at={}",
                    member.index,
                    member.policy_id,
                    member.fitness,
                    member.distance,
                    member
                        .died_at
                        .map(|tick| tick.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            if let Some(path) = output {
                write_json(&path, &metrics)?;
                println!("output={}", path.display());
            }
        }
        Commands::Benchmark {
            policies,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            tick_cap,
            out_dir,
            jobs,
        } => {
            let population = resolve_population(policies.as_deref())?;
            let seeds = resolve_seeds(
                seeds.as_deref(),
                seed_file.as_deref(),
                seed_start.as_deref(),
                seed_count,
            )?;
            let lab = lab.with_tick_cap(tick_cap).with_jobs(jobs);
            let out_dir = out_dir.unwrap_or_else(|| {
                PathBuf::from(format!("benchmarks/dino-{}", timestamp_suffix()))
            });

            let report = run_benchmark(BenchmarkConfig {
                population,
                seeds,
                sim: lab.sim,
                policy_options: options,
                out_dir: out_dir.clone(),
                jobs: lab.jobs,
            })?;

            println!("generations={}", report.generation_count);
            println!("runs={}", report.run_count);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("policy rankings:");
            for (idx, policy) in report.policy_rankings.iter().enumerate() {
                println!(
                    "  {}. {}  avg_fitness={:.2} max_fitness={:.2} avg_distance={:.1} survival={:.0}% wins={}",
                    idx + 1,
                    policy.policy_id,
                    policy.avg_fitness,
                    policy.max_fitness,
                    policy.avg_distance,
                    policy.survival_rate * 100.0,
                    policy.wins,
                );
            }
        }
        Commands::Transcript {
            policies,
            seed,
            tick_cap,
            every,
            mode,
            output,
        } => {
            let population = resolve_population(policies.as_deref())?;
            let seed = parse_seed(&seed)?;
            let lab = lab.with_tick_cap(tick_cap);
            let transcript =
                record_transcript(&population, seed, &lab.sim, &options, every, mode.into())?;
            write_transcript(&output, &transcript)?;

            println!("seed={}", seed_to_hex(seed));
            println!("ticks={}", transcript.report.ticks);
            println!("frames={}", transcript.frames());
            println!("output={}", output.display());
        }
    }

    Ok(())
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}
