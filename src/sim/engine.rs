//! The duck race engine
//!
//! Owns the phase machine, the race timers, and the history log:
//!
//! ```text
//! input --start_race--> countdown --3 steps--> racing --finish--> result
//! countdown/racing --pause--> paused --resume--> racing
//! result --start_race--> countdown
//! any --reset--> input
//! ```
//!
//! The host calls [`RaceEngine::update`] as often as it likes (every frame in
//! the browser); due timers are then handled in order at the instant they
//! were due, so late updates replay exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GamePhase, RaceSnapshot};
use super::tick::advance_positions;
use super::timers::{TimerKind, Timers};
use crate::audio::{AudioSink, SoundCue};
use crate::consts::MIN_PARTICIPANTS;
use crate::formatting::format_timestamp;
use crate::history::{RaceHistory, RaceHistoryEntry};
use crate::platform::{Clock, KeyValueStore};
use crate::positioning::{RenderPosition, compute_render_position};
use crate::tuning::RaceTuning;

/// A winner found by the position ticker, waiting out the finish delay
#[derive(Debug, Clone, Copy)]
struct PendingFinish {
    winner_index: usize,
    elapsed_ms: f64,
}

pub struct RaceEngine {
    phase: GamePhase,
    countdown: u8,
    /// Progress per duck (0-100)
    positions: Vec<f64>,
    elapsed_ms: f64,
    winner_index: Option<usize>,
    labels: Vec<String>,
    avg_speed_per_tick: f64,
    /// Wall-clock instant the race clock reads zero
    race_origin_ms: f64,
    /// The countdown finished (or was skipped) for the current race
    race_started: bool,
    pending_finish: Option<PendingFinish>,
    sound_enabled: bool,
    timers: Timers,
    tuning: RaceTuning,
    rng: Pcg32,
    clock: Box<dyn Clock>,
    audio: Box<dyn AudioSink>,
    history: RaceHistory,
}

impl std::fmt::Debug for RaceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceEngine")
            .field("phase", &self.phase)
            .field("countdown", &self.countdown)
            .field("positions", &self.positions)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("winner_index", &self.winner_index)
            .field("labels", &self.labels)
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}

impl RaceEngine {
    /// Create an engine with an OS-seeded RNG and the stored race history.
    pub fn new(
        clock: Box<dyn Clock>,
        audio: Box<dyn AudioSink>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let tuning = RaceTuning::default();
        Self {
            phase: GamePhase::Input,
            countdown: tuning.countdown_from,
            positions: Vec::new(),
            elapsed_ms: 0.0,
            winner_index: None,
            labels: Vec::new(),
            avg_speed_per_tick: 0.0,
            race_origin_ms: 0.0,
            race_started: false,
            pending_finish: None,
            sound_enabled: true,
            timers: Timers::new(),
            tuning,
            rng: Pcg32::from_os_rng(),
            clock,
            audio,
            history: RaceHistory::load(store),
        }
    }

    /// Use a fixed seed so races replay identically
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    /// Replace the race balance (takes effect from the next race)
    pub fn with_tuning(mut self, tuning: RaceTuning) -> Self {
        self.tuning = tuning.sanitized();
        if self.phase == GamePhase::Input {
            self.countdown = self.tuning.countdown_from;
        }
        self
    }

    // === Observable state ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn countdown(&self) -> u8 {
        self.countdown
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn winner_index(&self) -> Option<usize> {
        self.winner_index
    }

    pub fn winner_label(&self) -> Option<&str> {
        self.winner_index
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn history(&self) -> &[RaceHistoryEntry] {
        self.history.entries()
    }

    pub fn tuning(&self) -> &RaceTuning {
        &self.tuning
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// A winner crossed the line and the result is about to be shown
    pub fn is_finish_pending(&self) -> bool {
        self.pending_finish.is_some()
    }

    pub fn is_timer_active(&self, kind: TimerKind) -> bool {
        self.timers.is_active(kind)
    }

    /// When the next timer falls due, for hosts that sleep between updates
    pub fn next_due_ms(&self) -> Option<f64> {
        self.timers.next_due_ms()
    }

    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            phase: self.phase,
            countdown: self.countdown,
            positions: self.positions.clone(),
            elapsed_ms: self.elapsed_ms,
            winner_label: self.winner_label().map(str::to_string),
            winner_index: self.winner_index,
            labels: self.labels.clone(),
        }
    }

    /// Where the shell should draw each duck right now
    pub fn render_positions(&self) -> Vec<RenderPosition> {
        let total = self.positions.len();
        self.positions
            .iter()
            .enumerate()
            .map(|(i, &progress)| compute_render_position(i, total, progress))
            .collect()
    }

    // === Actions ===

    /// Start a race from `Input` or `Result`.
    ///
    /// Needs at least two labels and a non-zero duration; anything else is
    /// ignored and returns `false`.
    pub fn start_race<S: AsRef<str>>(&mut self, labels: &[S], duration_ms: u64) -> bool {
        if labels.len() < MIN_PARTICIPANTS {
            log::debug!("Not starting: {} participant(s)", labels.len());
            return false;
        }
        if duration_ms == 0 {
            log::debug!("Not starting: zero duration");
            return false;
        }
        if !matches!(self.phase, GamePhase::Input | GamePhase::Result) {
            log::debug!("Not starting from phase {}", self.phase.as_str());
            return false;
        }

        self.halt();
        let now = self.clock.now_ms();

        self.labels = labels.iter().map(|s| s.as_ref().to_string()).collect();
        self.positions = vec![0.0; self.labels.len()];
        self.winner_index = None;
        self.pending_finish = None;
        self.elapsed_ms = 0.0;
        self.race_started = false;
        self.avg_speed_per_tick = self.tuning.avg_speed_per_tick(duration_ms);
        self.countdown = self.tuning.countdown_from;

        log::info!(
            "Race starting: {} ducks, target {} ms",
            self.labels.len(),
            duration_ms
        );

        if self.countdown == 0 {
            self.begin_racing(now);
        } else {
            self.phase = GamePhase::Countdown;
            self.timers
                .set_interval(TimerKind::Countdown, now, self.tuning.countdown_interval_ms);
        }
        true
    }

    /// Freeze the countdown or the race. Ignored in other phases and once a
    /// winner has crossed the line.
    pub fn pause(&mut self) -> bool {
        if !self.is_pausable() {
            return false;
        }
        // Positions must catch up with the clock before they freeze
        self.update();
        if !self.is_pausable() {
            return false;
        }

        if self.phase == GamePhase::Racing {
            self.elapsed_ms = (self.clock.now_ms() - self.race_origin_ms).max(0.0);
        }
        self.halt();
        self.phase = GamePhase::Paused;
        log::info!("Race paused at {:.0} ms", self.elapsed_ms);
        true
    }

    fn is_pausable(&self) -> bool {
        matches!(self.phase, GamePhase::Countdown | GamePhase::Racing)
            && self.pending_finish.is_none()
    }

    /// Continue a paused race; the race clock picks up where it stopped.
    /// A race paused during its countdown starts straight away.
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        let now = self.clock.now_ms();
        self.begin_racing(now);
        log::info!("Race resumed at {:.0} ms", self.elapsed_ms);
        true
    }

    /// Back to `Input` from anywhere, dropping the current race.
    pub fn reset(&mut self) -> bool {
        self.halt();
        self.pending_finish = None;
        self.positions.clear();
        self.labels.clear();
        self.winner_index = None;
        self.elapsed_ms = 0.0;
        self.race_started = false;
        self.countdown = self.tuning.countdown_from;
        self.phase = GamePhase::Input;
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Stop every timer and the ambient tone. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.halt();
        self.pending_finish = None;
    }

    /// Turn sound on or off; the ambient tone follows immediately.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if self.sound_enabled == enabled {
            return;
        }
        self.sound_enabled = enabled;
        if !enabled {
            self.stop_ambient();
        } else if self.phase == GamePhase::Racing && self.pending_finish.is_none() {
            self.start_ambient();
        }
    }

    /// Handle every timer due by now.
    ///
    /// Movement and the race clock replay every missed tick. Cues from ticks
    /// a full period late stay silent, so a long gap between updates never
    /// plays a pile of sounds at once.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        while let Some((kind, at)) = self.timers.pop_due(now) {
            match kind {
                TimerKind::Countdown => {
                    let late = now - at >= self.tuning.countdown_interval_ms;
                    self.on_countdown(at, late);
                }
                TimerKind::Position => self.on_position(at),
                TimerKind::Clock => self.on_clock(at),
                TimerKind::Ambient => {
                    let late = now - at >= self.tuning.ambient_interval_ms;
                    self.on_ambient(late);
                }
                TimerKind::Finish => self.on_finish(at),
            }
        }
    }

    // === Timer handlers ===

    fn on_countdown(&mut self, at: f64, late: bool) {
        if !late {
            self.cue(SoundCue::CountdownBeep);
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.timers.cancel(TimerKind::Countdown);
            self.begin_racing(at);
        }
    }

    fn on_position(&mut self, at: f64) {
        let winner = advance_positions(
            &mut self.positions,
            self.avg_speed_per_tick,
            &self.tuning,
            &mut self.rng,
        );
        let Some(winner_index) = winner else {
            return;
        };

        // Nothing else may tick against a decided race
        self.halt();
        let elapsed_ms = (at - self.race_origin_ms).max(0.0);
        self.pending_finish = Some(PendingFinish {
            winner_index,
            elapsed_ms,
        });
        self.timers
            .set_timeout(TimerKind::Finish, at, self.tuning.finish_delay_ms);
        log::debug!("Duck {winner_index} crossed the line at {elapsed_ms:.0} ms");
    }

    fn on_clock(&mut self, at: f64) {
        self.elapsed_ms = (at - self.race_origin_ms).max(0.0);
    }

    /// Rolls on every tick, late or not; only the cue is skipped
    fn on_ambient(&mut self, late: bool) {
        let quack = self.rng.random_bool(self.tuning.ambient_cue_probability);
        if quack && !late {
            self.cue(SoundCue::Quack);
        }
    }

    fn on_finish(&mut self, at: f64) {
        let Some(finish) = self.pending_finish.take() else {
            return;
        };
        let Some(winner_label) = self.labels.get(finish.winner_index).cloned() else {
            return;
        };

        self.cue(SoundCue::Victory);
        self.winner_index = Some(finish.winner_index);
        self.elapsed_ms = finish.elapsed_ms;

        let entry = RaceHistoryEntry {
            id: self.history.unique_id(at),
            timestamp_display: format_timestamp(at),
            participant_labels: self.labels.clone(),
            winner_label: winner_label.clone(),
            duration_ms: finish.elapsed_ms,
        };
        self.history.append(entry);
        self.phase = GamePhase::Result;

        log::info!("{winner_label} wins in {:.0} ms", finish.elapsed_ms);
    }

    // === Helpers ===

    /// Enter `Racing` at `at`, keeping any elapsed time from before a pause
    fn begin_racing(&mut self, at: f64) {
        if !self.race_started {
            self.race_started = true;
            self.countdown = 0;
            self.cue(SoundCue::StartTone);
        }
        self.start_ambient();

        self.race_origin_ms = at - self.elapsed_ms;
        self.phase = GamePhase::Racing;

        let tuning = &self.tuning;
        self.timers
            .set_interval(TimerKind::Position, at, tuning.position_interval_ms);
        self.timers
            .set_interval(TimerKind::Clock, at, tuning.clock_interval_ms);
        self.timers
            .set_interval(TimerKind::Ambient, at, tuning.ambient_interval_ms);
    }

    /// Cancel all timers and silence the ambient tone
    fn halt(&mut self) {
        self.timers.cancel_all();
        self.stop_ambient();
    }

    fn cue(&mut self, cue: SoundCue) {
        if !self.sound_enabled {
            return;
        }
        if let Err(e) = self.audio.play_cue(cue) {
            log::debug!("{cue:?} cue skipped: {e}");
        }
    }

    fn start_ambient(&mut self) {
        if !self.sound_enabled {
            return;
        }
        if let Err(e) = self.audio.start_ambient() {
            log::debug!("Ambient tone skipped: {e}");
        }
    }

    fn stop_ambient(&mut self) {
        if let Err(e) = self.audio.stop_ambient() {
            log::debug!("Ambient tone not stopped: {e}");
        }
    }
}

impl Drop for RaceEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
