use dino_core::{Action, Observation, Policy};

/// Ignores the observation and always plays one action.
#[derive(Clone, Copy, Debug)]
pub struct Scripted {
    action: Action,
}

impl Scripted {
    pub fn new(action: Action) -> Self {
        Self { action }
    }
}

impl Policy for Scripted {
    fn evaluate(&mut self, _observation: &Observation) -> u8 {
        self.action.id()
    }
}
