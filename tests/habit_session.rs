use std::fs;

use chrono::{NaiveDate, Weekday};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use streakr::app::{App, AppScreen, ResetChoice};
use streakr::config::Config;
use streakr::engine::calendar::{MonthCursor, MonthGrid};
use streakr::engine::tracker::{EventKind, StreakTracker};
use streakr::store::json_store::JsonStore;
use streakr::ui::components::menu::MenuAction;
use streakr::ui::components::stats_panel::StatsPanel;
use streakr::ui::theme::Theme;
use tempfile::TempDir;

fn theme() -> &'static Theme {
    Box::leak(Box::new(Theme::default()))
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stats_text(app: &App) -> String {
    let area = Rect::new(0, 0, 60, 14);
    let mut buf = Buffer::empty(area);
    StatsPanel::new(
        &app.tracker,
        app.config.goal_days,
        app.last_logged(),
        app.theme,
    )
    .render(area, &mut buf);
    (0..area.height)
        .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn open_app(dir: &TempDir, today: NaiveDate) -> App {
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    App::with_store(Config::default(), theme(), Some(store), today)
}

#[test]
fn log_reset_log_keeps_best_and_total() {
    let mut app = App::with_store(Config::default(), theme(), None, day(2026, 10, 1));

    for _ in 0..5 {
        app.perform(MenuAction::LogToday);
    }
    assert_eq!(
        app.tracker,
        StreakTracker {
            streak_days: 5,
            best_streak: 5,
            total_days_logged: 5
        }
    );

    app.perform(MenuAction::ResetStreak);
    assert_eq!(app.reset_dialog, Some(ResetChoice::No));
    app.confirm_reset();
    app.perform(MenuAction::LogToday);
    app.perform(MenuAction::LogToday);

    assert_eq!(app.tracker.streak_days, 2);
    assert_eq!(app.tracker.best_streak, 5);
    assert_eq!(app.tracker.total_days_logged, 7);
    assert!(app.tracker.best_streak >= app.tracker.streak_days);
}

#[test]
fn stats_screen_reads_live_counters() {
    let mut app = App::with_store(Config::default(), theme(), None, day(2026, 10, 1));
    app.perform(MenuAction::Stats);
    assert_eq!(app.screen, AppScreen::Stats);
    app.go_to_home();
    app.perform(MenuAction::LogToday);
    app.perform(MenuAction::Stats);
    let text = stats_text(&app);
    assert!(text.contains("Current Streak:    1 days"));
    assert!(text.contains("Total Days Logged: 1 days"));

    app.go_to_home();
    app.perform(MenuAction::LogToday);
    app.perform(MenuAction::Stats);
    assert!(stats_text(&app).contains("Current Streak:    2 days"));
}

#[test]
fn history_spans_days_and_survives_restart() {
    let dir = TempDir::new().unwrap();

    let mut app = open_app(&dir, day(2026, 10, 16));
    app.log_today();
    app.refresh_today(day(2026, 10, 17));
    app.log_today();
    app.request_reset();
    app.confirm_reset();
    app.refresh_today(day(2026, 10, 18));
    app.log_today();
    drop(app);

    let app = open_app(&dir, day(2026, 10, 18));
    assert_eq!(app.tracker.streak_days, 1);
    assert_eq!(app.tracker.best_streak, 2);
    assert_eq!(app.tracker.total_days_logged, 3);

    let logged = app.logged_dates();
    assert_eq!(logged.len(), 3);
    assert!(logged.contains(&day(2026, 10, 16)));
    assert!(logged.contains(&day(2026, 10, 18)));

    let kinds: Vec<EventKind> = app.history.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![EventKind::Log, EventKind::Log, EventKind::Reset, EventKind::Log]
    );
}

#[test]
fn corrupt_profile_recovers_from_history() {
    let dir = TempDir::new().unwrap();
    let mut app = open_app(&dir, day(2026, 1, 5));
    for _ in 0..4 {
        app.log_today();
    }
    drop(app);

    fs::write(dir.path().join("profile.json"), "garbage").unwrap();

    let app = open_app(&dir, day(2026, 1, 5));
    assert_eq!(app.tracker.streak_days, 4);
    assert_eq!(app.tracker.total_days_logged, 4);
}

#[test]
fn interrupted_save_does_not_leave_counters_behind() {
    let dir = TempDir::new().unwrap();
    let mut app = open_app(&dir, day(2026, 3, 1));
    app.log_today();
    assert!(app.status_message.is_none());

    let blocker = dir.path().join("profile.tmp");
    fs::create_dir(&blocker).unwrap();
    app.refresh_today(day(2026, 3, 2));
    app.log_today();
    assert!(app.status_message.is_some());
    drop(app);
    fs::remove_dir(&blocker).unwrap();

    let mut app = open_app(&dir, day(2026, 3, 3));
    assert_eq!(app.tracker.total_days_logged, 2);
    app.log_today();
    drop(app);

    let app = open_app(&dir, day(2026, 3, 3));
    let logs: u32 = app
        .history
        .iter()
        .filter(|e| e.kind == EventKind::Log)
        .map(|e| e.count)
        .sum();
    assert_eq!(app.tracker.total_days_logged, 3);
    assert_eq!(app.tracker.total_days_logged, logs);
    assert_eq!(app.tracker.streak_days, 3);
}

#[test]
fn ephemeral_config_opens_no_store() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("streakr");

    let config = Config {
        persist: false,
        ..Config::default()
    };
    assert!(App::open_store(&config, data.clone()).is_none());
    assert!(!data.exists());

    let mut app = App::with_store(config, theme(), None, day(2026, 1, 5));
    app.log_today();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    let store = App::open_store(&Config::default(), data.clone());
    assert!(store.is_some());
    assert!(data.is_dir());
}

#[test]
fn calendar_grid_for_thirty_day_wednesday_month() {
    let grid = MonthGrid::from_layout(Weekday::Wed, 30).unwrap();
    let labels = grid.labels();
    assert_eq!(grid.leading_blanks, 3);
    assert_eq!(&labels[..3], &["", "", ""]);
    assert_eq!(labels[3], "1");
    assert_eq!(labels.last().map(String::as_str), Some("30"));
    assert_eq!(labels.len(), 33);

    // June 2022 has the same shape
    let june = MonthCursor { year: 2022, month: 6 }.grid().unwrap();
    assert_eq!(june, grid);
}
