use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::app::ResetChoice;
use crate::ui::theme::Theme;

const DIALOG_WIDTH: u16 = 48;
const DIALOG_HEIGHT: u16 = 7;

/// Modal "reset streak?" prompt drawn centered over `area`.
pub struct ConfirmDialog<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub choice: ResetChoice,
    pub theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(title: &'a str, message: &'a str, choice: ResetChoice, theme: &'a Theme) -> Self {
        Self {
            title,
            message,
            choice,
            theme,
        }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let width = DIALOG_WIDTH.min(area.width);
        let height = DIALOG_HEIGHT.min(area.height);
        let dialog_area = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        let button = |label: &'static str, active: bool| {
            let style = if active {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.error())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text_muted())
            };
            Span::styled(label, style)
        };

        Clear.render(dialog_area, buf);
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(self.message, Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(vec![
                button(" [y] Yes ", self.choice == ResetChoice::Yes),
                Span::raw("    "),
                button(" [n] No ", self.choice == ResetChoice::No),
            ]),
        ])
        .alignment(Alignment::Center)
        .style(Style::default().bg(colors.bg()))
        .block(
            Block::bordered()
                .title(format!(" {} ", self.title))
                .border_style(Style::default().fg(colors.error()))
                .style(Style::default().bg(colors.bg())),
        )
        .render(dialog_area, buf);
    }
}
