use dino_core::rng::SeededRng;
use dino_core::{Observation, Policy};

#[derive(Clone, Debug)]
pub struct RandomPolicy {
    rng: SeededRng,
}

impl RandomPolicy {
    /// Stream is a pure function of the generation seed and member index.
    pub fn new(seed: u32, member: u32) -> Self {
        Self {
            rng: SeededRng::new(SeededRng::derive(seed, member)),
        }
    }
}

impl Policy for RandomPolicy {
    fn evaluate(&mut self, _observation: &Observation) -> u8 {
        self.rng.next_int(3) as u8
    }
}
