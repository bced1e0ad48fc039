//! Race configuration staged by the player before the start.

use crate::consts::MIN_PARTICIPANTS;
use crate::parsing::parse_labels;
use crate::settings::RaceDuration;

/// Ordered, duplicate-free participant labels plus the chosen duration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceConfig {
    labels: Vec<String>,
    pub duration: RaceDuration,
}

impl RaceConfig {
    pub fn new(duration: RaceDuration) -> Self {
        Self {
            labels: Vec::new(),
            duration,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Parse `text` and append every label not already present.
    /// Returns how many were added.
    pub fn add_from_text(&mut self, text: &str) -> usize {
        let before = self.labels.len();
        for label in parse_labels(text) {
            if !self.labels.contains(&label) {
                self.labels.push(label);
            }
        }
        self.labels.len() - before
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.labels.len()).then(|| self.labels.remove(index))
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn can_start(&self) -> bool {
        self.labels.len() >= MIN_PARTICIPANTS
    }

    /// Labels still needed before a race can start
    pub fn missing_count(&self) -> usize {
        MIN_PARTICIPANTS.saturating_sub(self.labels.len())
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_deduplicates() {
        let mut config = RaceConfig::default();
        assert_eq!(config.add_from_text("Pho, Bun Bo, Pho"), 2);
        assert_eq!(config.add_from_text("Bun Bo\nCom Tam"), 1);
        assert_eq!(config.labels(), ["Pho", "Bun Bo", "Com Tam"]);
    }

    #[test]
    fn test_start_readiness() {
        let mut config = RaceConfig::new(RaceDuration::Short);
        assert!(!config.can_start());
        assert_eq!(config.missing_count(), 2);

        config.add_from_text("Pho");
        assert_eq!(config.missing_count(), 1);
        config.add_from_text("Bun Bo");
        assert!(config.can_start());
        assert_eq!(config.missing_count(), 0);
        assert_eq!(config.duration_ms(), 3_000);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut config = RaceConfig::default();
        config.add_from_text("a, b, c");
        assert_eq!(config.remove(1).as_deref(), Some("b"));
        assert_eq!(config.remove(7), None);
        assert_eq!(config.labels(), ["a", "c"]);
        config.clear();
        assert!(config.labels().is_empty());
    }

    #[test]
    fn test_labels_stay_distinct() {
        let mut config = RaceConfig::default();
        config.add_from_text("Pho\nPho\nBun Bo");
        config.remove(0);
        assert_eq!(config.add_from_text("Bun Bo, Pho"), 1);
        assert_eq!(config.labels(), ["Bun Bo", "Pho"]);
    }
}
