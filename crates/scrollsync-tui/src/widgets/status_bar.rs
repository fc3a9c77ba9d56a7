use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Focus};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let focus_str = match app.focus {
            Focus::Page => "PAGE",
            Focus::Carousel => "CAROUSEL",
        };

        let stats = app.driver.stats();
        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {} | scroll {:.0}% | v {:+.3} | frames {}/{} | writes {}{}",
                focus_str,
                app.driver.scroll_progress() * 100.0,
                app.driver.scroll_velocity(),
                stats.frames_applied,
                stats.frames_applied + stats.frames_skipped,
                stats.writes,
                if app.reduced_motion() { " | reduced motion" } else { "" },
            )
        };

        let help_hint = " q:quit tab:panel j/k:scroll n/p:section h:hover m:motion [/]:cards ";
        let padding_len = area
            .width
            .saturating_sub(status_text.chars().count() as u16 + help_hint.len() as u16)
            as usize;

        let status_color = if app.reduced_motion() { theme.warning } else { theme.fg0 };
        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(status_color).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
