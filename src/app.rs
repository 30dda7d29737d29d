use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc};
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::calendar::MonthCursor;
use crate::engine::quotes::QuoteBook;
use crate::engine::tracker::{EventKind, StreakTracker, TrackerEvent, append_event};
use crate::store::json_store::JsonStore;
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Calendar,
    Stats,
}

/// Highlighted button in the reset confirmation dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetChoice {
    Yes,
    No,
}

impl ResetChoice {
    pub fn toggle(self) -> Self {
        match self {
            ResetChoice::Yes => ResetChoice::No,
            ResetChoice::No => ResetChoice::Yes,
        }
    }
}

pub struct App {
    pub screen: AppScreen,
    pub tracker: StreakTracker,
    pub history: Vec<TrackerEvent>,
    pub quotes: QuoteBook,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub store: Option<JsonStore>,
    pub calendar_cursor: MonthCursor,
    pub reset_dialog: Option<ResetChoice>,
    pub today: NaiveDate,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme) -> Self {
        let store = Self::open_store(&config, JsonStore::default_dir());
        Self::with_store(config, theme, store, Local::now().date_naive())
    }

    /// The store to save into, or `None` for a session-only run.
    ///
    /// With `persist` off nothing is created under `base_dir`.
    pub fn open_store(config: &Config, base_dir: PathBuf) -> Option<JsonStore> {
        if !config.persist {
            info!("persistence disabled, keeping counters in memory");
            return None;
        }
        match JsonStore::with_base_dir(base_dir) {
            Ok(store) => Some(store),
            Err(e) => {
                warn!(error = %e, "data directory unavailable, running without persistence");
                None
            }
        }
    }

    pub fn with_store(
        config: Config,
        theme: &'static Theme,
        store: Option<JsonStore>,
        today: NaiveDate,
    ) -> Self {
        let (tracker, history) = match store {
            Some(ref s) => s.load_state(),
            None => (StreakTracker::default(), Vec::new()),
        };
        info!(
            streak = tracker.streak_days,
            best = tracker.best_streak,
            total = tracker.total_days_logged,
            persistent = store.is_some(),
            "starting"
        );

        Self {
            screen: AppScreen::Home,
            tracker,
            history,
            quotes: QuoteBook::new(),
            menu: Menu::new(theme),
            theme,
            config,
            store,
            calendar_cursor: MonthCursor::containing(today),
            reset_dialog: None,
            today,
            status_message: None,
            should_quit: false,
        }
    }

    pub fn log_today(&mut self) {
        self.tracker.log_day();
        self.record(EventKind::Log);
        self.quotes.advance();
        info!(
            streak = self.tracker.streak_days,
            best = self.tracker.best_streak,
            total = self.tracker.total_days_logged,
            "logged day"
        );
        self.save_data();
    }

    pub fn request_reset(&mut self) {
        if self.screen == AppScreen::Home {
            self.reset_dialog = Some(ResetChoice::No);
        }
    }

    pub fn confirm_reset(&mut self) {
        if self.reset_dialog.take().is_none() {
            return;
        }
        let previous = self.tracker.streak_days;
        self.tracker.reset_streak();
        self.record(EventKind::Reset);
        info!(previous, "streak reset");
        self.save_data();
    }

    pub fn cancel_reset(&mut self) {
        self.reset_dialog = None;
    }

    /// Enter/activate on the dialog's highlighted button.
    pub fn submit_reset_dialog(&mut self) {
        match self.reset_dialog {
            Some(ResetChoice::Yes) => self.confirm_reset(),
            Some(ResetChoice::No) => self.cancel_reset(),
            None => {}
        }
    }

    pub fn toggle_reset_choice(&mut self) {
        if let Some(choice) = self.reset_dialog {
            self.reset_dialog = Some(choice.toggle());
        }
    }

    pub fn activate_menu(&mut self) {
        self.perform(self.menu.selected_action());
    }

    pub fn perform(&mut self, action: MenuAction) {
        match action {
            MenuAction::LogToday => self.log_today(),
            MenuAction::Calendar => self.go_to_calendar(),
            MenuAction::Stats => self.go_to_stats(),
            MenuAction::ResetStreak => self.request_reset(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    pub fn go_to_home(&mut self) {
        self.screen = AppScreen::Home;
    }

    pub fn go_to_calendar(&mut self) {
        self.calendar_cursor = MonthCursor::containing(self.today);
        self.screen = AppScreen::Calendar;
    }

    pub fn go_to_stats(&mut self) {
        self.screen = AppScreen::Stats;
    }

    pub fn calendar_next_month(&mut self) {
        self.calendar_cursor.next();
    }

    pub fn calendar_prev_month(&mut self) {
        self.calendar_cursor.prev();
    }

    pub fn calendar_today(&mut self) {
        self.calendar_cursor = MonthCursor::containing(self.today);
    }

    /// Pick up a date change while the app stays open past midnight.
    pub fn refresh_today(&mut self, today: NaiveDate) {
        if today != self.today {
            info!(%today, "date changed");
            self.today = today;
        }
    }

    /// Local days with at least one logged entry.
    pub fn logged_dates(&self) -> HashSet<NaiveDate> {
        self.history
            .iter()
            .filter(|e| e.kind == EventKind::Log)
            .map(|e| e.date)
            .collect()
    }

    pub fn last_logged(&self) -> Option<NaiveDate> {
        self.history
            .iter()
            .rev()
            .find(|e| e.kind == EventKind::Log)
            .map(|e| e.date)
    }

    pub fn goal_progress(&self) -> f64 {
        self.tracker.goal_progress(self.config.goal_days)
    }

    fn record(&mut self, kind: EventKind) {
        append_event(&mut self.history, kind, Utc::now(), self.today);
    }

    fn save_data(&mut self) {
        if let Some(ref store) = self.store {
            match store.save_state(&self.tracker, &self.history) {
                Ok(()) => self.status_message = None,
                Err(e) => {
                    warn!(error = %e, "failed to save state");
                    self.status_message = Some(format!("Save failed: {e}"));
                }
            }
        }
    }
}
