//! Engine-owned timers
//!
//! A tiny interval/timeout table keyed by purpose. The engine polls it with
//! the current time and handles whatever fell due, in due order. Each kind
//! has at most one live timer, so cancelling is by kind and always safe.

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Countdown step (interval)
    Countdown,
    /// Duck position update (interval)
    Position,
    /// Race clock refresh (interval)
    Clock,
    /// Random quack roll (interval)
    Ambient,
    /// Result after the winning tick (timeout)
    Finish,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    kind: TimerKind,
    due_ms: f64,
    /// `None` for one-shot timers
    period_ms: Option<f64>,
}

#[derive(Debug, Default)]
pub struct Timers {
    /// Registration order breaks ties between timers due at the same instant
    active: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every `period_ms` starting one period after `now_ms`.
    /// Replaces any live timer of the same kind.
    pub fn set_interval(&mut self, kind: TimerKind, now_ms: f64, period_ms: f64) {
        debug_assert!(period_ms > 0.0, "interval period must be positive");
        self.cancel(kind);
        self.active.push(Timer {
            kind,
            due_ms: now_ms + period_ms,
            period_ms: Some(period_ms),
        });
    }

    /// Fire once, `delay_ms` after `now_ms`.
    pub fn set_timeout(&mut self, kind: TimerKind, now_ms: f64, delay_ms: f64) {
        self.cancel(kind);
        self.active.push(Timer {
            kind,
            due_ms: now_ms + delay_ms.max(0.0),
            period_ms: None,
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.active.retain(|t| t.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.active.clear();
    }

    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.active.iter().any(|t| t.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Earliest due time of any live timer
    pub fn next_due_ms(&self) -> Option<f64> {
        self.active.iter().map(|t| t.due_ms).reduce(f64::min)
    }

    /// Take the earliest timer due at or before `now_ms`.
    ///
    /// Returns its kind and the instant it was due. Intervals are re-armed
    /// for their next period before returning, so a handler may cancel them.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TimerKind, f64)> {
        let mut earliest: Option<usize> = None;
        for (i, timer) in self.active.iter().enumerate() {
            if timer.due_ms > now_ms {
                continue;
            }
            match earliest {
                Some(j) if self.active[j].due_ms <= timer.due_ms => {}
                _ => earliest = Some(i),
            }
        }

        let i = earliest?;
        let timer = self.active[i];
        match timer.period_ms {
            Some(period) => self.active[i].due_ms += period,
            None => {
                self.active.remove(i);
            }
        }
        Some((timer.kind, timer.due_ms))
    }
}
