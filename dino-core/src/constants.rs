//! World geometry and tuning defaults.
//!
//! Positions and sizes are screen pixels (Y grows downwards). Names ending in
//! `_MILLI` are decimal fixed point with three fractional digits.

// World
pub const WORLD_WIDTH: i32 = 1100;
pub const AGENT_X: i32 = 80;
pub const GROUND_Y: i32 = 310;
pub const DUCK_Y: i32 = 340;

// Agent hitboxes per pose
pub const STANDING_WIDTH: i32 = 87;
pub const STANDING_HEIGHT: i32 = 94;
pub const DUCKING_WIDTH: i32 = 118;
pub const DUCKING_HEIGHT: i32 = 60;

// Jump integrator
pub const MILLI: i32 = 1_000;
pub const JUMP_VELOCITY_MILLI: i32 = 8_500; // 8.5 px/tick
pub const GRAVITY_MILLI: i32 = 800; // 0.8 px/tick^2
pub const JUMP_DISPLACEMENT_FACTOR: i32 = 4;

// Difficulty
pub const BASE_SPEED: i32 = 20;
pub const RAMP_INTERVAL_TICKS: u32 = 100;
pub const TICK_CAP_DEFAULT: u32 = 1_800; // 60s at 30 ticks/s

// Fitness
pub const FITNESS_DIVISOR: u32 = 50;

// Observation layout
pub const OBSERVATION_LEN: usize = 7;

// Obstacles: cactus clusters come in three widths, birds in one.
pub const SMALL_CACTUS_Y: i32 = 325;
pub const SMALL_CACTUS_HEIGHT: i32 = 71;
pub const SMALL_CACTUS_WIDTHS: [i32; 3] = [40, 68, 105];

pub const LARGE_CACTUS_Y: i32 = 300;
pub const LARGE_CACTUS_HEIGHT: i32 = 100;
pub const LARGE_CACTUS_WIDTHS: [i32; 3] = [48, 99, 150];

pub const BIRD_Y: i32 = 250;
pub const BIRD_HEIGHT: i32 = 68;
pub const BIRD_WIDTH: i32 = 97;
