use std::io;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};

use streakr::app::{App, AppScreen};
use streakr::config::Config;
use streakr::event::{AppEvent, EventHandler};
use streakr::logging;
use streakr::store::json_store::JsonStore;
use streakr::ui;
use streakr::ui::components::activity_heatmap::ActivityHeatmap;
use streakr::ui::components::calendar_view::CalendarView;
use streakr::ui::components::confirm_dialog::ConfirmDialog;
use streakr::ui::components::menu::MenuAction;
use streakr::ui::components::progress_bar::ProgressBar;
use streakr::ui::components::stats_panel::StatsPanel;
use streakr::ui::layout::pack_hint_lines;
use streakr::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "streakr", version, about = "Terminal habit tracker with streaks, calendar and stats")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Goal length in days for the progress bar")]
    goal: Option<u32>,

    #[arg(short, long, help = "Keep counters in memory only for this session")]
    ephemeral: bool,

    #[arg(long, help = "Log level (error, warn, info, debug, trace)")]
    log_level: Option<LevelFilter>,

    #[arg(long, help = "Write the effective settings to the config file and exit")]
    write_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::enable_logging(&JsonStore::default_dir(), cli.log_level) {
        eprintln!("Logging disabled: {e:?}");
    }

    if cli.write_config {
        let path = Config::config_path();
        Config::update_file(&path, |config| apply_overrides(&cli, config))?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "unreadable config, using defaults");
        Config::default()
    });
    apply_overrides(&cli, &mut config);
    config.validate();

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, "unknown theme, falling back to default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let mut app = App::new(config, theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = EventHandler::new(Duration::from_millis(250))
        .and_then(|events| run_app(&mut terminal, &mut app, &events));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = ?err, "exiting with error");
        eprintln!("Error: {err:?}");
    }
    info!("exited");

    Ok(())
}

fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(ref theme) = cli.theme {
        config.theme = theme.clone();
    }
    if let Some(goal) = cli.goal {
        config.goal_days = goal;
    }
    if cli.ephemeral {
        config.persist = false;
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.refresh_today(Local::now().date_naive()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only process Press events, ignore Repeat/Release
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Confirmation dialog takes priority
    if app.reset_dialog.is_some() {
        handle_reset_dialog_key(app, key);
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::Calendar => handle_calendar_key(app, key),
        AppScreen::Stats => handle_stats_key(app, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.perform(MenuAction::Quit),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.activate_menu(),
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.perform(action);
            }
        }
        _ => {}
    }
}

fn handle_reset_dialog_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') => app.confirm_reset(),
        KeyCode::Char('n') | KeyCode::Esc => app.cancel_reset(),
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
            app.toggle_reset_choice()
        }
        KeyCode::Enter => app.submit_reset_dialog(),
        _ => {}
    }
}

fn handle_calendar_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('b') => app.go_to_home(),
        KeyCode::Left | KeyCode::Char('h') => app.calendar_prev_month(),
        KeyCode::Right | KeyCode::Char('l') => app.calendar_next_month(),
        KeyCode::Char('t') => app.calendar_today(),
        KeyCode::Char('s') => app.go_to_stats(),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('b') => app.go_to_home(),
        KeyCode::Char('c') => app.go_to_calendar(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::Calendar => render_calendar(frame, app),
        AppScreen::Stats => render_stats(frame, app),
    }

    if let Some(choice) = app.reset_dialog {
        let dialog = ConfirmDialog::new(
            "Reset Streak",
            "Are you sure you want to reset your streak?",
            choice,
            app.theme,
        );
        frame.render_widget(dialog, area);
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, title: &str) {
    let colors = &app.theme.colors;
    let info = match app.status_message {
        Some(ref msg) => format!(" {msg}"),
        None if app.store.is_none() => " session only".to_string(),
        None => String::new(),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" streakr | {title} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(if app.status_message.is_some() {
                    colors.error()
                } else {
                    colors.text_muted()
                })
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| {
            Line::from(Span::styled(
                l,
                Style::default().fg(app.theme.colors.text_muted()),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn screen_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area)
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let layout = screen_layout(frame.area());
    let colors = &app.theme.colors;
    render_header(frame, app, layout[0], "Home");

    let body = ui::layout::centered_rect(60, 90, layout[1]);
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(10),
        ])
        .split(body);

    let streak = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Current Streak: {} days", app.tracker.streak_days),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(streak, sections[0]);

    let progress = ProgressBar::new("Goal", app.goal_progress(), app.theme).caption(format!(
        "{} / {} days",
        app.tracker.streak_days, app.config.goal_days
    ));
    frame.render_widget(progress, sections[1]);

    let quote = Paragraph::new(Line::from(Span::styled(
        format!("\"{}\"", app.quotes.current()),
        Style::default()
            .fg(colors.warning())
            .add_modifier(Modifier::ITALIC),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(quote, sections[2]);

    frame.render_widget(&app.menu, sections[3]);

    render_footer(
        frame,
        app,
        layout[2],
        &[
            "[l] Log Today",
            "[c] Calendar",
            "[s] Stats",
            "[r] Reset",
            "[j/k] Move",
            "[Enter] Select",
            "[q] Quit",
        ],
    );
}

fn render_calendar(frame: &mut ratatui::Frame, app: &App) {
    let layout = screen_layout(frame.area());
    render_header(frame, app, layout[0], "Calendar");

    let logged = app.logged_dates();
    let body = ui::layout::centered_rect(60, 80, layout[1]);
    let view = CalendarView::new(app.calendar_cursor, app.today, &logged, app.theme);
    frame.render_widget(view, body);

    render_footer(
        frame,
        app,
        layout[2],
        &[
            "[h/Left] Prev month",
            "[l/Right] Next month",
            "[t] Today",
            "[s] Stats",
            "[Esc] Back",
        ],
    );
}

fn render_stats(frame: &mut ratatui::Frame, app: &App) {
    let layout = screen_layout(frame.area());
    render_header(frame, app, layout[0], "Statistics");

    let body = ui::layout::centered_rect(70, 95, layout[1]);
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(14), Constraint::Min(0)])
        .split(body);

    let panel = StatsPanel::new(
        &app.tracker,
        app.config.goal_days,
        app.last_logged(),
        app.theme,
    );
    frame.render_widget(panel, sections[0]);
    frame.render_widget(
        ActivityHeatmap::new(&app.history, app.today, app.theme),
        sections[1],
    );

    render_footer(
        frame,
        app,
        layout[2],
        &["[c] Calendar", "[Esc] Back"],
    );
}
