//! Data-driven race balance
//!
//! The defaults are tuned by feel: races should look close, have the odd
//! surge, and end near the chosen duration.

use serde::{Deserialize, Serialize};

use crate::consts::FINISH_POSITION;

/// Every tunable constant of the race simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceTuning {
    /// Position update period (ms)
    pub position_interval_ms: f64,
    /// Race clock refresh period (ms)
    pub clock_interval_ms: f64,
    /// Ambient quack roll period (ms)
    pub ambient_interval_ms: f64,
    /// Chance of a quack per ambient roll
    pub ambient_cue_probability: f64,
    /// Scales the mean speed down so the fastest of N ducks lands near the target
    pub damping: f64,
    /// Lower bound of the per-tick random speed factor
    pub speed_random_min: f64,
    /// Width of the random speed factor range
    pub speed_random_range: f64,
    /// Chance of a burst per duck per tick
    pub burst_probability: f64,
    /// Burst size in multiples of the average speed
    pub burst_multiplier: f64,
    /// Pause between the winning tick and the result (ms)
    pub finish_delay_ms: f64,
    /// Countdown start value
    pub countdown_from: u8,
    /// Countdown step period (ms)
    pub countdown_interval_ms: f64,
}

impl Default for RaceTuning {
    fn default() -> Self {
        Self {
            position_interval_ms: 50.0,
            clock_interval_ms: 100.0,
            ambient_interval_ms: 300.0,
            ambient_cue_probability: 0.3,
            damping: 0.7,
            speed_random_min: 0.8,
            speed_random_range: 0.6,
            burst_probability: 0.05,
            burst_multiplier: 1.5,
            finish_delay_ms: 100.0,
            countdown_from: 3,
            countdown_interval_ms: 1000.0,
        }
    }
}

impl RaceTuning {
    /// Mean progress per position tick for a race of `duration_ms`
    pub fn avg_speed_per_tick(&self, duration_ms: u64) -> f64 {
        let total_ticks = (duration_ms as f64 / self.position_interval_ms).max(1.0);
        (FINISH_POSITION / total_ticks) * self.damping
    }

    /// Clamp values that would stall or break the simulation
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (value, fallback) in [
            (&mut self.position_interval_ms, defaults.position_interval_ms),
            (&mut self.clock_interval_ms, defaults.clock_interval_ms),
            (&mut self.ambient_interval_ms, defaults.ambient_interval_ms),
            (&mut self.countdown_interval_ms, defaults.countdown_interval_ms),
            (&mut self.damping, defaults.damping),
            (&mut self.speed_random_min, defaults.speed_random_min),
        ] {
            if !value.is_finite() || *value <= 0.0 {
                *value = fallback;
            }
        }
        self.speed_random_range = self.speed_random_range.max(0.0);
        self.burst_multiplier = self.burst_multiplier.max(0.0);
        self.finish_delay_ms = self.finish_delay_ms.max(0.0);
        for p in [&mut self.ambient_cue_probability, &mut self.burst_probability] {
            *p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        }
        self
    }
}
