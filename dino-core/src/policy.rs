//! The capability boundary between the simulation and whatever decides.
//!
//! The core never looks inside a policy: scripted, random, heuristic and
//! learned controllers all reduce to `observation -> action id`.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::observation::Observation;

pub trait Policy {
    /// Returns an action id; anything outside `0..=2` aborts the generation.
    fn evaluate(&mut self, observation: &Observation) -> u8;
}

impl<P: Policy + ?Sized> Policy for &mut P {
    fn evaluate(&mut self, observation: &Observation) -> u8 {
        (**self).evaluate(observation)
    }
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn evaluate(&mut self, observation: &Observation) -> u8 {
        (**self).evaluate(observation)
    }
}

/// Receives one fitness value per population member at generation end.
pub trait FitnessSink {
    fn record_fitness(&mut self, fitness: f64);
}

impl FitnessSink for f64 {
    fn record_fitness(&mut self, fitness: f64) {
        *self = fitness;
    }
}

impl FitnessSink for Option<f64> {
    fn record_fitness(&mut self, fitness: f64) {
        *self = Some(fitness);
    }
}

impl FitnessSink for Vec<f64> {
    fn record_fitness(&mut self, fitness: f64) {
        self.push(fitness);
    }
}

impl<S: FitnessSink + ?Sized> FitnessSink for &mut S {
    fn record_fitness(&mut self, fitness: f64) {
        (**self).record_fitness(fitness);
    }
}

/// Index of the highest score; ties go to the lowest index.
///
/// `None` for an empty slice. NaN scores never win against a number.
pub fn argmax_action(scores: &[f64]) -> Option<u8> {
    let mut best: Option<(usize, f64)> = None;
    for (index, score) in scores.iter().copied().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| u8::try_from(index).unwrap_or(u8::MAX))
}

/// Adapts a per-action scorer (e.g. a network's output layer) into a
/// [`Policy`] by argmax selection.
///
/// An empty score vector yields `u8::MAX`, which the driver rejects.
pub struct ScoredPolicy<F> {
    scorer: F,
}

impl<F> ScoredPolicy<F>
where
    F: FnMut(&Observation) -> Vec<f64>,
{
    pub fn new(scorer: F) -> Self {
        Self { scorer }
    }
}

impl<F> Policy for ScoredPolicy<F>
where
    F: FnMut(&Observation) -> Vec<f64>,
{
    fn evaluate(&mut self, observation: &Observation) -> u8 {
        let scores = (self.scorer)(observation);
        argmax_action(&scores).unwrap_or(u8::MAX)
    }
}
