use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::tracker::StreakTracker;
use crate::ui::theme::Theme;

pub struct StatsPanel<'a> {
    pub tracker: &'a StreakTracker,
    pub goal_days: u32,
    pub last_logged: Option<NaiveDate>,
    pub theme: &'a Theme,
}

impl<'a> StatsPanel<'a> {
    pub fn new(
        tracker: &'a StreakTracker,
        goal_days: u32,
        last_logged: Option<NaiveDate>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            tracker,
            goal_days,
            last_logged,
            theme,
        }
    }
}

fn days(n: u32) -> String {
    format!("{n} days")
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Statistics ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            "Statistics",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let value_style = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);

        let rows = [
            ("  Current Streak:    ", days(self.tracker.streak_days)),
            ("  Best Streak:       ", days(self.tracker.best_streak)),
            ("  Total Days Logged: ", days(self.tracker.total_days_logged)),
        ];
        for (i, (label, value)) in rows.into_iter().enumerate() {
            Paragraph::new(Line::from(vec![
                Span::styled(label, Style::default().fg(colors.fg())),
                Span::styled(value, value_style),
            ]))
            .render(layout[i + 1], buf);
        }

        let progress = self.tracker.goal_progress(self.goal_days);
        let goal_color = if progress >= 1.0 {
            colors.success()
        } else if progress >= 0.5 {
            colors.warning()
        } else {
            colors.fg()
        };
        let last = self
            .last_logged
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "never".to_string());
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled("  Goal:              ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{:.0}%", progress * 100.0),
                    Style::default().fg(goal_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} / {})", self.tracker.streak_days, days(self.goal_days)),
                    Style::default().fg(colors.text_muted()),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Last Logged:       ", Style::default().fg(colors.fg())),
                Span::styled(last, Style::default().fg(colors.text_muted())),
            ]),
        ])
        .render(layout[4], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_text(panel: StatsPanel<'_>) -> String {
        let area = Rect::new(0, 0, 60, 14);
        let mut buf = Buffer::empty(area);
        panel.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_shows_live_counters() {
        let theme = Theme::default();
        let tracker = StreakTracker {
            streak_days: 3,
            best_streak: 8,
            total_days_logged: 21,
        };
        let last = NaiveDate::from_ymd_opt(2026, 10, 18);
        let text = render_text(StatsPanel::new(&tracker, 30, last, &theme));

        assert!(text.contains("Current Streak:    3 days"));
        assert!(text.contains("Best Streak:       8 days"));
        assert!(text.contains("Total Days Logged: 21 days"));
        assert!(text.contains("10%"));
        assert!(text.contains("2026-10-18"));
    }

    #[test]
    fn test_never_logged() {
        let theme = Theme::default();
        let tracker = StreakTracker::default();
        let text = render_text(StatsPanel::new(&tracker, 30, None, &theme));
        assert!(text.contains("Current Streak:    0 days"));
        assert!(text.contains("never"));
    }
}
