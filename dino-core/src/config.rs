use serde::{Deserialize, Serialize};

use crate::constants::{
    AGENT_X, BASE_SPEED, DUCK_Y, FITNESS_DIVISOR, GRAVITY_MILLI, GROUND_Y, JUMP_VELOCITY_MILLI,
    JUMP_DISPLACEMENT_FACTOR, MILLI, RAMP_INTERVAL_TICKS, TICK_CAP_DEFAULT, WORLD_WIDTH,
};
use crate::error::SimError;

/// Heights are scaled by `MILLI` inside the jump integrator, so every vertical
/// coordinate a jump can reach must stay within this bound.
const VERTICAL_LIMIT: i64 = 1_000_000;
/// Horizontal coordinates only ever gain an obstacle width or lose one tick
/// of scroll.
const HORIZONTAL_LIMIT: i32 = 100_000_000;
const SPEED_LIMIT: i64 = 1_000_000;
const VELOCITY_LIMIT_MILLI: i32 = 1_000_000;

/// How the per-agent fitness number is derived from distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessMode {
    /// `distance / divisor` at generation end.
    #[default]
    Distance,
    /// Running sum of `distance / divisor` over every tick the agent survived.
    Cumulative,
}

/// Static, generation-independent simulation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_cap: u32,
    pub base_speed: i32,
    pub ramp_interval: u32,
    pub ground_y: i32,
    pub duck_y: i32,
    pub agent_x: i32,
    pub jump_velocity_milli: i32,
    pub gravity_milli: i32,
    pub world_width: i32,
    pub fitness_divisor: u32,
    pub fitness_mode: FitnessMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_cap: TICK_CAP_DEFAULT,
            base_speed: BASE_SPEED,
            ramp_interval: RAMP_INTERVAL_TICKS,
            ground_y: GROUND_Y,
            duck_y: DUCK_Y,
            agent_x: AGENT_X,
            jump_velocity_milli: JUMP_VELOCITY_MILLI,
            gravity_milli: GRAVITY_MILLI,
            world_width: WORLD_WIDTH,
            fitness_divisor: FITNESS_DIVISOR,
            fitness_mode: FitnessMode::Distance,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_cap == 0 {
            return Err(invalid("tick_cap", "must be > 0"));
        }
        if self.ramp_interval == 0 {
            return Err(invalid("ramp_interval", "must be > 0"));
        }
        if self.base_speed < 0 {
            return Err(invalid("base_speed", "must be >= 0"));
        }
        if self.world_width <= 0 {
            return Err(invalid("world_width", "must be > 0"));
        }
        if self.fitness_divisor == 0 {
            return Err(invalid("fitness_divisor", "must be > 0"));
        }
        if self.jump_velocity_milli <= 0 {
            return Err(invalid("jump_velocity_milli", "must be > 0"));
        }
        // Without gravity a jump never lands.
        if self.gravity_milli <= 0 {
            return Err(invalid("gravity_milli", "must be > 0"));
        }
        if self.duck_y < self.ground_y {
            return Err(invalid("duck_y", "must not be above ground_y"));
        }
        if self.world_width > HORIZONTAL_LIMIT {
            return Err(invalid("world_width", "must be <= 100000000"));
        }
        if !(-HORIZONTAL_LIMIT..=HORIZONTAL_LIMIT).contains(&self.agent_x) {
            return Err(invalid("agent_x", "must be within +/-100000000"));
        }
        if self.jump_velocity_milli > VELOCITY_LIMIT_MILLI {
            return Err(invalid("jump_velocity_milli", "must be <= 1000000"));
        }
        if self.gravity_milli > VELOCITY_LIMIT_MILLI {
            return Err(invalid("gravity_milli", "must be <= 1000000"));
        }
        if i64::from(self.ground_y).abs() > VERTICAL_LIMIT {
            return Err(invalid("ground_y", "must be within +/-1000000"));
        }
        if i64::from(self.duck_y).abs() > VERTICAL_LIMIT {
            return Err(invalid("duck_y", "must be within +/-1000000"));
        }
        if i64::from(self.ground_y) - self.peak_climb() < -VERTICAL_LIMIT {
            return Err(invalid("jump_velocity_milli", "jump apex leaves the world"));
        }
        if self.peak_speed() > SPEED_LIMIT {
            return Err(invalid("base_speed", "ramped speed exceeds 1000000"));
        }
        Ok(())
    }

    /// Upper bound on the pixels a jump climbs before it starts falling.
    fn peak_climb(&self) -> i64 {
        let velocity = i64::from(self.jump_velocity_milli);
        let rising_steps = velocity / i64::from(self.gravity_milli) + 1;
        let per_step = i64::from(JUMP_DISPLACEMENT_FACTOR) * velocity / i64::from(MILLI) + 1;
        rising_steps * per_step
    }

    /// Scroll speed on the final tick.
    fn peak_speed(&self) -> i64 {
        i64::from(self.base_speed) + i64::from(self.tick_cap / self.ramp_interval)
    }

    #[inline]
    pub fn fitness_for(&self, distance: u64) -> f64 {
        distance as f64 / self.fitness_divisor as f64
    }
}

#[inline]
fn invalid(field: &'static str, reason: &'static str) -> SimError {
    SimError::InvalidConfig { field, reason }
}
