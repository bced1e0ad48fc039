//! Per-tick race step
//!
//! Moves every unfinished duck forward by a randomized amount and reports
//! the winner, if any.

use rand::Rng;

use crate::consts::FINISH_POSITION;
use crate::tuning::RaceTuning;

/// Distance one duck covers this tick.
///
/// The average speed scaled by a uniform factor, plus the occasional burst.
/// Always positive for a sanitized tuning, so every race ends.
pub fn duck_speed<R: Rng>(avg_speed: f64, tuning: &RaceTuning, rng: &mut R) -> f64 {
    let random_factor = tuning.speed_random_min + rng.random::<f64>() * tuning.speed_random_range;
    let burst = if rng.random_bool(tuning.burst_probability) {
        avg_speed * tuning.burst_multiplier
    } else {
        0.0
    };
    avg_speed * random_factor + burst
}

/// Advance all unfinished ducks one tick and return the winner, if any.
pub fn advance_positions<R: Rng>(
    positions: &mut [f64],
    avg_speed: f64,
    tuning: &RaceTuning,
    rng: &mut R,
) -> Option<usize> {
    for pos in positions.iter_mut() {
        if *pos < FINISH_POSITION {
            *pos = (*pos + duck_speed(avg_speed, tuning, rng)).min(FINISH_POSITION);
        }
    }
    detect_winner(positions)
}

/// The lowest lane index at the finish line.
///
/// Ducks crossing in the same tick are separated by lane order alone.
pub fn detect_winner(positions: &[f64]) -> Option<usize> {
    positions.iter().position(|&p| p >= FINISH_POSITION)
}
