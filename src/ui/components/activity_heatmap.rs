use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::engine::tracker::{EventKind, TrackerEvent};
use crate::ui::theme::{Theme, ThemeColors};

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Week-column heatmap of logs per day, ending at `today`.
pub struct ActivityHeatmap<'a> {
    history: &'a [TrackerEvent],
    today: NaiveDate,
    theme: &'a Theme,
}

impl<'a> ActivityHeatmap<'a> {
    pub fn new(history: &'a [TrackerEvent], today: NaiveDate, theme: &'a Theme) -> Self {
        Self {
            history,
            today,
            theme,
        }
    }
}

pub fn logs_per_day(history: &[TrackerEvent]) -> HashMap<NaiveDate, usize> {
    let mut day_counts: HashMap<NaiveDate, usize> = HashMap::new();
    for event in history.iter().filter(|e| e.kind == EventKind::Log) {
        *day_counts.entry(event.date).or_insert(0) += event.count as usize;
    }
    day_counts
}

impl Widget for ActivityHeatmap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Activity (Logs per Day) ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 8 || inner.width < 12 {
            return;
        }

        let day_counts = logs_per_day(self.history);

        let weeks_to_show = ((inner.width as usize).saturating_sub(3)) / 2;
        let weeks_to_show = weeks_to_show.min(26);
        let start_date = self.today - Duration::weeks(weeks_to_show as i64);
        // Align to Sunday to match the calendar screen
        let start_date =
            start_date - Duration::days(start_date.weekday().num_days_from_sunday() as i64);

        let day_labels = ["S", "M", " ", "W", " ", "F", " "];
        for (row, label) in day_labels.iter().enumerate() {
            let y = inner.y + 1 + row as u16;
            if y < inner.y + inner.height {
                buf.set_string(inner.x, y, label, Style::default().fg(colors.text_muted()));
            }
        }

        let mut current_date = start_date;
        let mut col = 0u16;
        let mut last_month = 0u32;

        while current_date <= self.today {
            let x = inner.x + 2 + col * 2;
            if x + 1 >= inner.x + inner.width {
                break;
            }

            let month = current_date.month();
            if month != last_month {
                if x + 3 <= inner.x + inner.width {
                    buf.set_string(
                        x,
                        inner.y,
                        MONTH_ABBR[month as usize - 1],
                        Style::default().fg(colors.text_muted()),
                    );
                }
                last_month = month;
            }

            for day_offset in 0..7u16 {
                let date = current_date + Duration::days(day_offset as i64);
                if date > self.today {
                    break;
                }
                let y = inner.y + 1 + day_offset;
                if y >= inner.y + inner.height {
                    break;
                }

                let count = day_counts.get(&date).copied().unwrap_or(0);
                let (ch, color) = intensity_cell(count, colors);
                buf.set_string(x, y, ch.to_string(), Style::default().fg(color));
            }

            current_date += Duration::weeks(1);
            col += 1;
        }
    }
}

fn scale_color(base: Color, factor: f64) -> Color {
    match base {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f64 * factor).min(255.0) as u8,
            (g as f64 * factor).min(255.0) as u8,
            (b as f64 * factor).min(255.0) as u8,
        ),
        other => other,
    }
}

fn intensity_cell(count: usize, colors: &ThemeColors) -> (char, Color) {
    let logged = colors.logged();
    match count {
        0 => ('·', colors.accent_dim()),
        1 => ('▪', scale_color(logged, 0.6)),
        2..=3 => ('█', scale_color(logged, 0.8)),
        _ => ('█', logged),
    }
}
