use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Pose};
use crate::constants::OBSERVATION_LEN;
use crate::error::SimError;
use crate::obstacle::Obstacle;

/// Fixed-length input vector handed to a policy:
/// `[agent_y, is_ducking, obstacle_x, obstacle_y, obstacle_width, speed, second_obstacle_x]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation([f64; OBSERVATION_LEN]);

impl Observation {
    pub const LEN: usize = OBSERVATION_LEN;

    pub fn new(values: [f64; OBSERVATION_LEN]) -> Self {
        Self(values)
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, SimError> {
        let array: [f64; OBSERVATION_LEN] =
            values.try_into().map_err(|_| SimError::ObservationLength {
                expected: OBSERVATION_LEN,
                actual: values.len(),
            })?;
        Ok(Self(array))
    }

    /// With no active obstacle the obstacle fields read as "far away":
    /// x = world width, y = 0, width = 0. The second-obstacle slot is 0
    /// unless two obstacles are active at once.
    pub fn build(agent: &Agent, obstacles: &[Obstacle], speed: i32, world_width: i32) -> Self {
        let (obstacle_x, obstacle_y, obstacle_width) = match obstacles.first() {
            Some(obstacle) => (obstacle.rect.x, obstacle.rect.y, obstacle.rect.width),
            None => (world_width, 0, 0),
        };
        let second_x = obstacles.get(1).map_or(0, |obstacle| obstacle.rect.x);
        let ducking = if agent.pose() == Pose::Ducking { 1 } else { 0 };

        Self([
            agent.y() as f64,
            ducking as f64,
            obstacle_x as f64,
            obstacle_y as f64,
            obstacle_width as f64,
            speed as f64,
            second_x as f64,
        ])
    }

    #[inline]
    pub fn as_array(&self) -> &[f64; OBSERVATION_LEN] {
        &self.0
    }

    #[inline]
    pub fn agent_y(&self) -> f64 {
        self.0[0]
    }

    #[inline]
    pub fn is_ducking(&self) -> bool {
        self.0[1] != 0.0
    }

    #[inline]
    pub fn obstacle_x(&self) -> f64 {
        self.0[2]
    }

    #[inline]
    pub fn obstacle_y(&self) -> f64 {
        self.0[3]
    }

    #[inline]
    pub fn obstacle_width(&self) -> f64 {
        self.0[4]
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.0[5]
    }

    #[inline]
    pub fn second_obstacle_x(&self) -> f64 {
        self.0[6]
    }
}

impl AsRef<[f64]> for Observation {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
