//! Dino runner core - deterministic evaluation engine for obstacle-avoidance
//! agents.
//!
//! Every generation is a pure function of `(SimConfig, seed, policies)`: the
//! obstacle timeline, difficulty ramp and agent physics are integer-only, so
//! fitness values reproduce tick-for-tick on any host.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod agent;
pub mod collision;
pub mod config;
pub mod constants;
pub mod difficulty;
pub mod error;
pub mod fixed_point;
pub mod observation;
pub mod obstacle;
pub mod policy;
pub mod rng;
pub mod sim;

pub use agent::{Action, Agent, Pose};
pub use config::{FitnessMode, SimConfig};
pub use error::SimError;
pub use observation::Observation;
pub use obstacle::{Obstacle, ObstacleKind};
pub use policy::{argmax_action, FitnessSink, Policy, ScoredPolicy};
pub use sim::{
    evaluate_population, run_generation, run_with_checkpoints, Checkpoint, Generation,
    GenerationCounter, GenerationReport, GenerationStatus, TerminationReason, TickSnapshot,
};
