//! Race phases and the read-only view handed to the shell

use serde::{Deserialize, Serialize};

/// Current phase of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Picking participants
    #[default]
    Input,
    /// 3, 2, 1...
    Countdown,
    /// Ducks are moving
    Racing,
    /// Frozen mid-race (or mid-countdown)
    Paused,
    /// A winner was declared; waits for the player
    Result,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Input => "input",
            GamePhase::Countdown => "countdown",
            GamePhase::Racing => "racing",
            GamePhase::Paused => "paused",
            GamePhase::Result => "result",
        }
    }
}

/// Everything the shell needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub phase: GamePhase,
    pub countdown: u8,
    /// Progress per duck (0-100), in lane order
    pub positions: Vec<f64>,
    pub elapsed_ms: f64,
    pub winner_label: Option<String>,
    pub winner_index: Option<usize>,
    pub labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_json_names() {
        for phase in [
            GamePhase::Input,
            GamePhase::Countdown,
            GamePhase::Racing,
            GamePhase::Paused,
            GamePhase::Result,
        ] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase.as_str()));
        }
        assert_eq!(GamePhase::default(), GamePhase::Input);
    }
}
