use dino_core::constants::{AGENT_X, STANDING_WIDTH};
use dino_core::{Action, Observation, Policy};

/// Hand-tuned controller: jump a cactus once it is `lead_ticks` of travel
/// away, duck a bird a little earlier.
#[derive(Clone, Copy, Debug)]
pub struct Reflex {
    pub lead_ticks: f64,
    pub duck_margin: f64,
    /// Obstacles whose top is above this line are treated as birds.
    pub bird_line: f64,
}

impl Default for Reflex {
    fn default() -> Self {
        Self {
            lead_ticks: 4.0,
            duck_margin: 60.0,
            bird_line: 300.0,
        }
    }
}

impl Reflex {
    fn decide(&self, observation: &Observation) -> Action {
        let width = observation.obstacle_width();
        let x = observation.obstacle_x();
        if width == 0.0 || x + width < AGENT_X as f64 {
            return Action::Run;
        }

        let gap = x - (AGENT_X + STANDING_WIDTH) as f64;
        let reach = observation.speed() * self.lead_ticks;
        if observation.obstacle_y() < self.bird_line {
            if gap <= reach + self.duck_margin {
                Action::Duck
            } else {
                Action::Run
            }
        } else if gap <= reach {
            Action::Jump
        } else {
            Action::Run
        }
    }
}

impl Policy for Reflex {
    fn evaluate(&mut self, observation: &Observation) -> u8 {
        self.decide(observation).id()
    }
}
