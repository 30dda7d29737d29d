use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The three session counters behind every screen.
///
/// `best_streak` is kept at `max(best_streak, streak_days)` by every mutation,
/// so readers never have to recompute it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakTracker {
    pub streak_days: u32,
    pub best_streak: u32,
    pub total_days_logged: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Log,
    Reset,
}

fn default_count() -> u32 {
    1
}

/// One user action as recorded in history.
///
/// Repeated logs on the same day fold into a single event whose `count`
/// says how many presses it stands for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerEvent {
    pub kind: EventKind,
    /// Time of the most recent press folded into this event.
    pub timestamp: DateTime<Utc>,
    /// Local calendar day the action happened on.
    pub date: NaiveDate,
    #[serde(default = "default_count")]
    pub count: u32,
}

impl TrackerEvent {
    pub fn new(kind: EventKind, timestamp: DateTime<Utc>, date: NaiveDate) -> Self {
        Self {
            kind,
            timestamp,
            date,
            count: 1,
        }
    }
}

/// Append an action to `history`, folding it into the last event when that
/// changes nothing on replay: a log on the same day as a trailing log, or a
/// reset straight after a reset.
pub fn append_event(
    history: &mut Vec<TrackerEvent>,
    kind: EventKind,
    timestamp: DateTime<Utc>,
    date: NaiveDate,
) {
    if let Some(last) = history.last_mut() {
        match (last.kind, kind) {
            (EventKind::Log, EventKind::Log) if last.date == date => {
                last.count = last.count.saturating_add(1);
                last.timestamp = timestamp;
                return;
            }
            (EventKind::Reset, EventKind::Reset) => return,
            _ => {}
        }
    }
    history.push(TrackerEvent::new(kind, timestamp, date));
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_day(&mut self) {
        self.log_days(1);
    }

    pub fn log_days(&mut self, n: u32) {
        self.streak_days = self.streak_days.saturating_add(n);
        self.total_days_logged = self.total_days_logged.saturating_add(n);
        self.best_streak = self.best_streak.max(self.streak_days);
    }

    pub fn reset_streak(&mut self) {
        self.streak_days = 0;
    }

    pub fn apply(&mut self, kind: EventKind) {
        match kind {
            EventKind::Log => self.log_day(),
            EventKind::Reset => self.reset_streak(),
        }
    }

    /// Fraction of the goal covered by the current streak, in `[0, 1]`.
    pub fn goal_progress(&self, goal_days: u32) -> f64 {
        if goal_days == 0 {
            return 1.0;
        }
        (self.streak_days as f64 / goal_days as f64).clamp(0.0, 1.0)
    }

    /// Rebuild counters by replaying history oldest->newest.
    pub fn replay<'a>(events: impl IntoIterator<Item = &'a TrackerEvent>) -> Self {
        let mut tracker = Self::new();
        for event in events {
            match event.kind {
                EventKind::Log => tracker.log_days(event.count),
                EventKind::Reset => tracker.reset_streak(),
            }
        }
        tracker
    }

    /// Repair counters loaded from disk that break the best-streak invariant.
    pub fn normalize(&mut self) {
        self.best_streak = self.best_streak.max(self.streak_days);
        self.total_days_logged = self.total_days_logged.max(self.best_streak);
    }
}
