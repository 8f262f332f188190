use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Default first seed when neither a list nor a start is given.
pub const DEFAULT_SEED_START: u32 = 0xD1D0_0001;

/// Parses one obstacle-timeline seed: decimal or `0x` hex, with optional `_`
/// digit separators (`0xDEAD_BEEF`).
pub fn parse_seed(seed: &str) -> Result<u32> {
    let trimmed = seed.trim();
    let digits: String = trimmed.chars().filter(|ch| *ch != '_').collect();
    if digits.is_empty() {
        bail!("empty seed");
    }
    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    };
    parsed.with_context(|| format!("seed {trimmed:?} is not a u32 (decimal or 0x hex)"))
}

/// Seeds appear as fixed-width hex in logs, CSV rows and JSON artifacts.
pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    collect_seeds(input.split(','), "--seeds")
}

/// One seed per line; blank lines and `#` comments are skipped.
pub fn parse_seed_file(path: &Path) -> Result<Vec<u32>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading seed file {}", path.display()))?;
    collect_seeds(data.lines(), &format!("seed file {}", path.display()))
}

/// A repeated seed replays an identical generation and would count its
/// winner twice in the rankings, so repeats are rejected.
fn collect_seeds<'a>(entries: impl Iterator<Item = &'a str>, source: &str) -> Result<Vec<u32>> {
    let mut seeds = Vec::new();
    for (position, entry) in entries.enumerate() {
        let entry = entry.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        let seed =
            parse_seed(entry).with_context(|| format!("{source} entry {}", position + 1))?;
        if seeds.contains(&seed) {
            bail!("{source} lists seed {} more than once", seed_to_hex(seed));
        }
        seeds.push(seed);
    }
    if seeds.is_empty() {
        bail!("{source} had no seeds");
    }
    Ok(seeds)
}

/// Seed file, then CSV, then an LCG walk of `seed_count` seeds from `seed_start`.
pub fn resolve_seeds(
    seeds: Option<&str>,
    seed_file: Option<&Path>,
    seed_start: Option<&str>,
    seed_count: u32,
) -> Result<Vec<u32>> {
    if let Some(path) = seed_file {
        return parse_seed_file(path);
    }

    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }

    if seed_count == 0 {
        return Err(anyhow!("--seed-count must be >= 1"));
    }

    let start = if let Some(start) = seed_start {
        parse_seed(start)?
    } else {
        DEFAULT_SEED_START
    };

    let mut out = Vec::with_capacity(seed_count as usize);
    let mut cur = start;
    for _ in 0..seed_count {
        out.push(cur);
        cur = cur.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    }
    Ok(out)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating {}", parent.display()))?;
        }
    }
    let encoded = serde_json::to_vec_pretty(value).context("failed to serialize json")?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}
