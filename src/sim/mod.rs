//! Race simulation module
//!
//! All race logic lives here. Nothing in this module touches the DOM or a
//! real audio device:
//! - Time comes from an injected clock
//! - Randomness comes from an owned, seedable RNG
//! - Timers are owned by the engine and fired from `RaceEngine::update`

pub mod engine;
pub mod state;
pub mod tick;
pub mod timers;

pub use engine::RaceEngine;
pub use state::{GamePhase, RaceSnapshot};
pub use tick::{advance_positions, detect_winner, duck_speed};
pub use timers::{TimerKind, Timers};
