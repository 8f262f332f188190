//! Built-in policies for the lab. The core only sees [`Policy`]; this module
//! owns ids, descriptions and construction.

use anyhow::{anyhow, Context, Result};
use dino_core::{Action, Policy};
use std::fs;
use std::path::Path;

mod linear;
mod random;
mod reflex;
mod scripted;

pub use linear::{LinearPolicy, LinearWeights};
pub use random::RandomPolicy;
pub use reflex::Reflex;
pub use scripted::Scripted;

struct RosterEntry {
    id: &'static str,
    description: &'static str,
}

const ROSTER: [RosterEntry; 6] = [
    RosterEntry {
        id: "runner",
        description: "always runs (action 0)",
    },
    RosterEntry {
        id: "jumper",
        description: "always jumps (action 1)",
    },
    RosterEntry {
        id: "ducker",
        description: "always ducks (action 2)",
    },
    RosterEntry {
        id: "random",
        description: "uniform random action from a per-member seeded stream",
    },
    RosterEntry {
        id: "reflex",
        description: "jumps cacti and ducks birds inside a speed-scaled window",
    },
    RosterEntry {
        id: "linear",
        description: "argmax over per-action linear scores of the observation",
    },
];

/// Shared inputs for building a population.
#[derive(Clone, Debug, Default)]
pub struct PolicyOptions {
    /// Weights for every `linear` member; built-in weights when unset.
    pub linear: Option<LinearWeights>,
}

impl PolicyOptions {
    pub fn with_linear_file(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("failed reading linear weights {}", path.display()))?;
        let weights: LinearWeights = serde_json::from_slice(&data)
            .with_context(|| format!("invalid linear weights in {}", path.display()))?;
        Ok(Self {
            linear: Some(weights),
        })
    }
}

pub fn policy_ids() -> Vec<&'static str> {
    ROSTER.iter().map(|entry| entry.id).collect()
}

pub fn describe_policies() -> Vec<(&'static str, &'static str)> {
    ROSTER
        .iter()
        .map(|entry| (entry.id, entry.description))
        .collect()
}

/// Builds one population member. `member` salts per-member randomness so two
/// `random` members in the same generation do not mirror each other.
pub fn create_policy(
    id: &str,
    seed: u32,
    member: u32,
    options: &PolicyOptions,
) -> Option<Box<dyn Policy>> {
    let policy: Box<dyn Policy> = match id {
        "runner" => Box::new(Scripted::new(Action::Run)),
        "jumper" => Box::new(Scripted::new(Action::Jump)),
        "ducker" => Box::new(Scripted::new(Action::Duck)),
        "random" => Box::new(RandomPolicy::new(seed, member)),
        "reflex" => Box::new(Reflex::default()),
        "linear" => Box::new(LinearPolicy::new(
            options.linear.clone().unwrap_or_default(),
        )),
        _ => return None,
    };
    Some(policy)
}

/// Parses a comma-separated population. Repeats are allowed; order is the
/// population order.
pub fn resolve_population(input: Option<&str>) -> Result<Vec<String>> {
    let Some(raw) = input else {
        return Ok(policy_ids().iter().map(|id| (*id).to_string()).collect());
    };

    let mut population = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if !policy_ids().contains(&token) {
            let available = policy_ids().join(", ");
            return Err(anyhow!("unknown policy '{token}'. available: {available}"));
        }
        population.push(token.to_string());
    }
    if population.is_empty() {
        return Err(anyhow!("--policies resolved to empty list"));
    }
    Ok(population)
}

pub fn build_population(
    ids: &[String],
    seed: u32,
    options: &PolicyOptions,
) -> Result<Vec<Box<dyn Policy>>> {
    ids.iter()
        .enumerate()
        .map(|(member, id)| {
            create_policy(id, seed, member as u32, options)
                .ok_or_else(|| anyhow!("unknown policy '{id}'"))
        })
        .collect()
}
