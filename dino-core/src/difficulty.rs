use serde::{Deserialize, Serialize};

/// Shared scroll speed, ramped by one every `ramp_interval` ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    speed: i32,
    ticks: u32,
    ramp_interval: u32,
}

impl Difficulty {
    pub fn new(base_speed: i32, ramp_interval: u32) -> Self {
        Self {
            speed: base_speed,
            ticks: 0,
            ramp_interval,
        }
    }

    #[inline]
    pub fn speed(&self) -> i32 {
        self.speed
    }

    #[inline]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
        if self.ticks % self.ramp_interval == 0 {
            self.speed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_ramps_every_interval() {
        let mut difficulty = Difficulty::new(20, 100);
        for _ in 0..99 {
            difficulty.advance();
        }
        assert_eq!(difficulty.speed(), 20);
        difficulty.advance();
        assert_eq!(difficulty.ticks(), 100);
        assert_eq!(difficulty.speed(), 21);
        for _ in 0..100 {
            difficulty.advance();
        }
        assert_eq!(difficulty.speed(), 22);
    }

    #[test]
    fn ramp_is_uncapped() {
        let mut difficulty = Difficulty::new(0, 1);
        for _ in 0..10_000 {
            difficulty.advance();
        }
        assert_eq!(difficulty.speed(), 10_000);
    }
}
