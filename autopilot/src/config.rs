use anyhow::{Context, Result};
use dino_core::SimConfig;
use std::env;
use std::fs;
use std::path::Path;

pub const ENV_TICK_CAP: &str = "DINO_TICK_CAP";
pub const ENV_BASE_SPEED: &str = "DINO_BASE_SPEED";
pub const ENV_RAMP_INTERVAL: &str = "DINO_RAMP_INTERVAL";
pub const ENV_JOBS: &str = "DINO_JOBS";

/// Everything a lab command needs besides the population and seeds.
///
/// Layering: built-in defaults, then an optional JSON `SimConfig` file, then
/// environment overrides, then CLI flags (applied by the caller).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabConfig {
    pub sim: SimConfig,
    pub jobs: Option<usize>,
}

impl LabConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let sim = match config_path {
            Some(path) => load_sim_config(path)?,
            None => SimConfig::default(),
        };
        let mut config = Self { sim, jobs: None };
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.sim.tick_cap = read_env_u32(ENV_TICK_CAP, self.sim.tick_cap);
        self.sim.base_speed = read_env_i32(ENV_BASE_SPEED, self.sim.base_speed);
        self.sim.ramp_interval = read_env_u32(ENV_RAMP_INTERVAL, self.sim.ramp_interval);
        if let Some(jobs) = read_env_optional_usize(ENV_JOBS) {
            self.jobs = Some(jobs);
        }
    }

    pub fn with_tick_cap(mut self, tick_cap: Option<u32>) -> Self {
        if let Some(tick_cap) = tick_cap {
            self.sim.tick_cap = tick_cap;
        }
        self
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        if jobs.is_some() {
            self.jobs = jobs;
        }
        self
    }
}

pub fn load_sim_config(path: &Path) -> Result<SimConfig> {
    let data = fs::read(path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    let config: SimConfig = serde_json::from_slice(&data)
        .with_context(|| format!("invalid config json in {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("rejected config {}", path.display()))?;
    Ok(config)
}

fn warn_ignored(name: &str, value: &str, expected: &str) {
    tracing::warn!("{name}={value:?} is not {expected}. Keeping the current value.");
}

/// `DINO_TICK_CAP` and `DINO_RAMP_INTERVAL` must be positive.
fn parse_positive_u32(name: &str, value: &str) -> Option<u32> {
    match value.parse::<u32>() {
        Ok(parsed) if parsed > 0 => Some(parsed),
        _ => {
            warn_ignored(name, value, "a positive number");
            None
        }
    }
}

/// A standing-still world is a legal config, so zero speed is accepted.
fn parse_non_negative_i32(name: &str, value: &str) -> Option<i32> {
    match value.parse::<i32>() {
        Ok(parsed) if parsed >= 0 => Some(parsed),
        _ => {
            warn_ignored(name, value, "a non-negative number");
            None
        }
    }
}

fn parse_positive_usize(name: &str, value: &str) -> Option<usize> {
    match value.parse::<usize>() {
        Ok(parsed) if parsed > 0 => Some(parsed),
        _ => {
            warn_ignored(name, value, "a positive number");
            None
        }
    }
}

pub(crate) fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| parse_positive_u32(name, &value))
        .unwrap_or(default)
}

pub(crate) fn read_env_i32(name: &str, default: i32) -> i32 {
    env::var(name)
        .ok()
        .and_then(|value| parse_non_negative_i32(name, &value))
        .unwrap_or(default)
}

pub(crate) fn read_env_optional_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| parse_positive_usize(name, &value))
}
