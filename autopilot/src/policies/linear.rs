use dino_core::{Observation, Policy, ScoredPolicy};
use serde::{Deserialize, Serialize};

const ACTIONS: usize = 3;

/// One row of observation weights plus a bias per action, in action-id order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearWeights {
    pub weights: [[f64; Observation::LEN]; ACTIONS],
    pub bias: [f64; ACTIONS],
}

impl Default for LinearWeights {
    /// Run while the obstacle is far; near it, the obstacle height tips the
    /// choice between jumping (low cactus) and ducking (high bird).
    fn default() -> Self {
        Self {
            weights: [
                [0.0, 0.0, 0.01, 0.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 0.01, 0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, -0.01, 0.0, 0.0, 0.0],
            ],
            bias: [0.0, 0.25, 5.75],
        }
    }
}

impl LinearWeights {
    pub fn zeros() -> Self {
        Self {
            weights: [[0.0; Observation::LEN]; ACTIONS],
            bias: [0.0; ACTIONS],
        }
    }

    pub fn scores(&self, observation: &Observation) -> Vec<f64> {
        self.weights
            .iter()
            .zip(self.bias.iter())
            .map(|(row, bias)| {
                row.iter()
                    .zip(observation.as_array().iter())
                    .map(|(weight, value)| weight * value)
                    .sum::<f64>()
                    + bias
            })
            .collect()
    }
}

/// Linear scorer driven through the core's argmax adapter.
pub struct LinearPolicy {
    inner: ScoredPolicy<Box<dyn FnMut(&Observation) -> Vec<f64>>>,
}

impl LinearPolicy {
    pub fn new(weights: LinearWeights) -> Self {
        let scorer: Box<dyn FnMut(&Observation) -> Vec<f64>> =
            Box::new(move |observation: &Observation| weights.scores(observation));
        Self {
            inner: ScoredPolicy::new(scorer),
        }
    }
}

impl Policy for LinearPolicy {
    fn evaluate(&mut self, observation: &Observation) -> u8 {
        self.inner.evaluate(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dino_core::argmax_action;

    #[test]
    fn zero_weights_tie_to_run() {
        let mut policy = LinearPolicy::new(LinearWeights::zeros());
        let observation = Observation::new([310.0, 0.0, 200.0, 325.0, 40.0, 20.0, 0.0]);
        assert_eq!(policy.evaluate(&observation), 0);
    }

    #[test]
    fn default_weights_pick_by_obstacle_height() {
        let weights = LinearWeights::default();
        let far = Observation::new([310.0, 0.0, 1_100.0, 0.0, 0.0, 20.0, 0.0]);
        let cactus = Observation::new([310.0, 0.0, 250.0, 325.0, 40.0, 20.0, 0.0]);
        let bird = Observation::new([310.0, 0.0, 250.0, 250.0, 97.0, 20.0, 0.0]);
        assert_eq!(argmax_action(&weights.scores(&far)), Some(0));
        assert_eq!(argmax_action(&weights.scores(&cactus)), Some(1));
        assert_eq!(argmax_action(&weights.scores(&bird)), Some(2));
    }

    #[test]
    fn weights_parse_from_json() {
        let json = r#"{"weights":[[0,0,0,0,0,0,0],[0,0,0,0,0,0,0],[0,0,0,0,0,0,1]],"bias":[0,0,0]}"#;
        let weights: LinearWeights = serde_json::from_str(json).expect("weights");
        assert_eq!(weights.weights[2][6], 1.0);
    }
}
