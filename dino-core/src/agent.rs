use serde::{Deserialize, Serialize};

use crate::collision::Rect;
use crate::config::{FitnessMode, SimConfig};
use crate::constants::{DUCKING_HEIGHT, DUCKING_WIDTH, STANDING_HEIGHT, STANDING_WIDTH};
use crate::fixed_point::integrate_height;
use crate::observation::Observation;
use crate::obstacle::Obstacle;

/// Discrete control a policy picks each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Run,
    Jump,
    Duck,
}

impl Action {
    pub const ALL: [Self; 3] = [Self::Run, Self::Jump, Self::Duck];

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Run),
            1 => Some(Self::Jump),
            2 => Some(Self::Duck),
            _ => None,
        }
    }

    #[inline]
    pub fn id(self) -> u8 {
        match self {
            Self::Run => 0,
            Self::Jump => 1,
            Self::Duck => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pose {
    #[default]
    Running,
    Jumping,
    Ducking,
}

/// One simulated runner.
///
/// While `pose != Jumping` the vertical position is pinned to the pose's
/// height; while jumping it is integrated until it reaches the ground again.
/// A dead agent is frozen: no method below mutates it once `alive` is false.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    x: i32,
    y: i32,
    velocity_milli: i32,
    pose: Pose,
    alive: bool,
    distance: u64,
    distance_sum: u64,
    ticks_lived: u32,
    died_at: Option<u32>,
}

impl Agent {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            x: config.agent_x,
            y: config.ground_y,
            velocity_milli: config.jump_velocity_milli,
            pose: Pose::Running,
            alive: true,
            distance: 0,
            distance_sum: 0,
            ticks_lived: 0,
            died_at: None,
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn velocity_milli(&self) -> i32 {
        self.velocity_milli
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn distance(&self) -> u64 {
        self.distance
    }

    #[inline]
    pub fn ticks_lived(&self) -> u32 {
        self.ticks_lived
    }

    #[inline]
    pub fn died_at(&self) -> Option<u32> {
        self.died_at
    }

    pub fn fitness(&self, config: &SimConfig) -> f64 {
        match config.fitness_mode {
            FitnessMode::Distance => config.fitness_for(self.distance),
            FitnessMode::Cumulative => config.fitness_for(self.distance_sum),
        }
    }

    pub fn hitbox(&self) -> Rect {
        match self.pose {
            Pose::Running | Pose::Jumping => {
                Rect::new(self.x, self.y, STANDING_WIDTH, STANDING_HEIGHT)
            }
            Pose::Ducking => Rect::new(self.x, self.y, DUCKING_WIDTH, DUCKING_HEIGHT),
        }
    }

    /// Snapshot handed to the policy, built before this tick's action.
    pub fn observe(&self, obstacles: &[Obstacle], speed: i32, world_width: i32) -> Observation {
        Observation::build(self, obstacles, speed, world_width)
    }

    /// Pose transition followed by one physics step.
    pub fn apply_action(&mut self, action: Action, config: &SimConfig) {
        if !self.alive {
            return;
        }

        if self.pose != Pose::Jumping {
            self.pose = match action {
                Action::Run => Pose::Running,
                Action::Jump => Pose::Jumping,
                Action::Duck => Pose::Ducking,
            };
        }

        match self.pose {
            Pose::Jumping => {
                self.y = integrate_height(self.y, self.velocity_milli);
                self.velocity_milli -= config.gravity_milli;
                if self.y >= config.ground_y {
                    self.land(config);
                }
            }
            Pose::Running => self.y = config.ground_y,
            Pose::Ducking => self.y = config.duck_y,
        }
    }

    fn land(&mut self, config: &SimConfig) {
        self.y = config.ground_y;
        self.pose = Pose::Running;
        self.velocity_milli = config.jump_velocity_milli;
    }

    /// Credits one survived tick at the current scroll speed.
    pub fn accrue(&mut self, speed: i32) {
        if !self.alive {
            return;
        }
        self.distance += speed.max(0) as u64;
        self.distance_sum += self.distance;
        self.ticks_lived += 1;
    }

    pub fn kill(&mut self, tick: u32) {
        if self.alive {
            self.alive = false;
            self.died_at = Some(tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DUCK_Y, GROUND_Y, JUMP_VELOCITY_MILLI};

    fn jump_to_apex(agent: &mut Agent, config: &SimConfig) {
        agent.apply_action(Action::Jump, config);
        for _ in 0..9 {
            agent.apply_action(Action::Run, config);
        }
    }

    #[test]
    fn action_ids_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_id(action.id()), Some(action));
        }
        assert_eq!(Action::from_id(3), None);
        assert_eq!(Action::from_id(u8::MAX), None);
    }

    #[test]
    fn duck_pins_to_duck_height_and_shrinks_hitbox() {
        let config = SimConfig::default();
        let mut agent = Agent::new(&config);
        let standing = agent.hitbox();
        agent.apply_action(Action::Duck, &config);
        assert_eq!(agent.pose(), Pose::Ducking);
        assert_eq!(agent.y(), DUCK_Y);
        assert!(agent.hitbox().height < standing.height);

        agent.apply_action(Action::Run, &config);
        assert_eq!(agent.pose(), Pose::Running);
        assert_eq!(agent.y(), GROUND_Y);
    }

    #[test]
    fn jump_ignores_other_actions_until_landing() {
        let config = SimConfig::default();
        let mut agent = Agent::new(&config);
        jump_to_apex(&mut agent, &config);
        assert_eq!(agent.pose(), Pose::Jumping);

        let before = agent;
        agent.apply_action(Action::Duck, &config);
        assert_eq!(agent.pose(), Pose::Jumping);
        assert_eq!(agent.velocity_milli(), before.velocity_milli() - config.gravity_milli);
    }

    #[test]
    fn jump_while_jumping_only_integrates() {
        let config = SimConfig::default();
        let mut a = Agent::new(&config);
        let mut b = Agent::new(&config);
        jump_to_apex(&mut a, &config);
        jump_to_apex(&mut b, &config);

        a.apply_action(Action::Jump, &config);
        b.apply_action(Action::Run, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn landing_resets_velocity_and_pose() {
        let config = SimConfig::default();
        let mut agent = Agent::new(&config);
        agent.apply_action(Action::Jump, &config);
        let mut steps = 1;
        while agent.pose() == Pose::Jumping {
            agent.apply_action(Action::Jump, &config);
            steps += 1;
            assert!(steps < 100);
        }
        assert_eq!(agent.y(), GROUND_Y);
        assert_eq!(agent.pose(), Pose::Running);
        assert_eq!(agent.velocity_milli(), JUMP_VELOCITY_MILLI);
    }

    #[test]
    fn dead_agent_is_frozen() {
        let config = SimConfig::default();
        let mut agent = Agent::new(&config);
        agent.accrue(20);
        agent.kill(7);
        let frozen = agent;

        agent.apply_action(Action::Jump, &config);
        agent.accrue(20);
        agent.kill(9);
        assert_eq!(agent, frozen);
        assert_eq!(agent.died_at(), Some(7));
        assert_eq!(agent.distance(), 20);
    }

    #[test]
    fn cumulative_fitness_sums_running_distance() {
        let config = SimConfig {
            fitness_mode: FitnessMode::Cumulative,
            ..SimConfig::default()
        };
        let mut agent = Agent::new(&config);
        agent.accrue(20);
        agent.accrue(20);
        agent.accrue(25);
        // 20 + 40 + 65
        assert_eq!(agent.fitness(&config), 125.0 / 50.0);
        assert_eq!(agent.fitness(&SimConfig::default()), 65.0 / 50.0);
    }
}
