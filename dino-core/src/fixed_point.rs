//! Decimal fixed point for the jump integrator.
//!
//! Velocity and gravity are carried in milli-pixels per tick. Heights stay in
//! whole pixels: each step floors the real-valued result, so the integer
//! rectangle an observer sees is exactly `floor(y - 4 * v)`.

use crate::constants::{JUMP_DISPLACEMENT_FACTOR, MILLI};

/// One integration step of the vertical position.
#[inline]
pub fn integrate_height(y: i32, velocity_milli: i32) -> i32 {
    let next_milli = y * MILLI - JUMP_DISPLACEMENT_FACTOR * velocity_milli;
    next_milli.div_euclid(MILLI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrate_height_floors_toward_negative_infinity() {
        // 310 - 34.0
        assert_eq!(integrate_height(310, 8_500), 276);
        // 276 - 30.8 = 245.2
        assert_eq!(integrate_height(276, 7_700), 245);
        // 108 + 1.2 = 109.2
        assert_eq!(integrate_height(108, -300), 109);
        // 0 - 0.4 = -0.4
        assert_eq!(integrate_height(0, 100), -1);
    }
}
