//! Duck Race - pick a winner by racing rubber ducks
//!
//! Core modules:
//! - `sim`: Race engine (phases, timers, per-tick movement)
//! - `history`: Persisted log of finished races
//! - `audio`: Synthesized sound cues and the ambient tone
//! - `positioning`: Lane and depth layout for drawing ducks
//! - `platform`: Browser/native clock and storage
//! - `settings` / `tuning`: Player preferences and race balance
//! - `formatting` / `parsing` / `roster`: Text in and out of the race

pub mod audio;
pub mod error;
pub mod formatting;
pub mod history;
pub mod parsing;
pub mod platform;
pub mod positioning;
pub mod roster;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use audio::{AudioSink, NullAudio, SoundCue};
pub use error::{AudioError, StorageError};
pub use history::{RaceHistory, RaceHistoryEntry};
pub use roster::RaceConfig;
pub use settings::{RaceDuration, Settings};
pub use sim::{GamePhase, RaceEngine, RaceSnapshot};
pub use tuning::RaceTuning;

/// Race constants
pub mod consts {
    /// Progress at which a duck has finished
    pub const FINISH_POSITION: f64 = 100.0;
    /// Fewest ducks a race can start with
    pub const MIN_PARTICIPANTS: usize = 2;
}
