use std::collections::HashSet;

use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::engine::calendar::{MonthCursor, WEEKDAY_HEADERS};
use crate::ui::theme::Theme;

const CELL_WIDTH: u16 = 3;

/// Month grid with today highlighted and logged days marked.
pub struct CalendarView<'a> {
    cursor: MonthCursor,
    today: NaiveDate,
    logged: &'a HashSet<NaiveDate>,
    theme: &'a Theme,
}

impl<'a> CalendarView<'a> {
    pub fn new(
        cursor: MonthCursor,
        today: NaiveDate,
        logged: &'a HashSet<NaiveDate>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            cursor,
            today,
            logged,
            theme,
        }
    }
}

impl Widget for CalendarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.cursor.title()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let grid = match self.cursor.grid() {
            Ok(grid) => grid,
            Err(e) => {
                buf.set_string(
                    inner.x,
                    inner.y,
                    e.to_string(),
                    Style::default().fg(colors.error()),
                );
                return;
            }
        };

        let col_width = (inner.width / 7).max(CELL_WIDTH + 1);
        if inner.width < col_width * 7 || inner.height < 2 {
            return;
        }
        let grid_width = col_width * 7;
        let left = inner.x + (inner.width - grid_width) / 2;
        let pad = (col_width - CELL_WIDTH) / 2;

        for (col, name) in WEEKDAY_HEADERS.iter().enumerate() {
            let x = left + col as u16 * col_width + pad;
            buf.set_string(
                x,
                inner.y,
                name,
                Style::default()
                    .fg(colors.text_muted())
                    .add_modifier(Modifier::BOLD),
            );
        }

        let weeks = grid.weeks();
        let spare = inner.height - 1;
        let row_height = if spare >= weeks.len() as u16 * 2 { 2 } else { 1 };

        for (row, week) in weeks.iter().enumerate() {
            let y = inner.y + 1 + row as u16 * row_height;
            if y >= inner.y + inner.height {
                break;
            }
            for (col, cell) in week.iter().enumerate() {
                let Some(day) = *cell else { continue };
                let x = left + col as u16 * col_width + pad;
                let date = NaiveDate::from_ymd_opt(self.cursor.year, self.cursor.month, day);

                let mut style = Style::default().fg(colors.fg());
                if date.is_some_and(|d| self.logged.contains(&d)) {
                    style = style.fg(colors.logged()).add_modifier(Modifier::BOLD);
                }
                if date == Some(self.today) {
                    style = style.fg(colors.today_fg()).bg(colors.today_bg());
                }
                buf.set_string(x, y, format!("{day:>3}"), style);
            }
        }
    }
}
