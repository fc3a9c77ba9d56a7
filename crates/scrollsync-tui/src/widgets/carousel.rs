use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use scrollsync_core::driver::MomentumPhase;

use crate::app::{App, Focus};

pub struct CarouselWidget;

impl CarouselWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let carousel = &app.carousel;
        let is_focused = app.focus == Focus::Carousel;

        let border_style = if is_focused {
            Style::default().fg(theme.focus)
        } else {
            Style::default().fg(theme.grey0)
        };

        let mode = if carousel.config().infinite { "loop" } else { "track" };
        let block = Block::default()
            .title(format!(" Carousel ({mode}) "))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Card track
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Position gauge
                Constraint::Length(1), // Spacer
                Constraint::Min(0),    // Details
            ])
            .split(inner);

        // Card track
        let current = carousel.current_index();
        let heights = &app.config.preview.carousel_heights;
        let mut spans = Vec::with_capacity(carousel.total_sections());
        for index in 0..carousel.total_sections() {
            let ratio = heights.get(index).copied().unwrap_or(1.0);
            let label = if ratio > 1.0 {
                format!(" [{} ×{ratio}] ", index + 1)
            } else {
                format!(" [{}] ", index + 1)
            };
            let style = if index == current {
                Style::default().fg(theme.bg0).bg(theme.focus).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.grey2)
            };
            spans.push(Span::styled(label, style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

        // Continuous position along the whole track
        let span = carousel.total_sections().saturating_sub(1).max(1) as f64;
        let ratio = (carousel.progress() / span).clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme.snap).bg(theme.bg1))
            .ratio(ratio)
            .label(format!("{:.3}", carousel.progress()));
        frame.render_widget(gauge, rows[2]);

        let phase_color = match carousel.phase() {
            MomentumPhase::Snapping | MomentumPhase::SnapPending => theme.snap,
            MomentumPhase::Settled => theme.grey2,
            MomentumPhase::FreeRunning | MomentumPhase::Decaying => theme.accent,
        };
        let label = Style::default().fg(theme.grey2);
        let value = Style::default().fg(theme.fg1);
        let details = vec![
            Line::from(vec![
                Span::styled("phase     ", label),
                Span::styled(format!("{:?}", carousel.phase()), Style::default().fg(phase_color)),
            ]),
            Line::from(vec![
                Span::styled("target    ", label),
                Span::styled(format!("{:.3}", carousel.target_progress()), value),
            ]),
            Line::from(vec![
                Span::styled("velocity  ", label),
                Span::styled(format!("{:+.4}", carousel.velocity()), value),
            ]),
            Line::from(vec![
                Span::styled("looped    ", label),
                Span::styled(if carousel.has_looped() { "yes" } else { "no" }, value),
            ]),
        ];
        frame.render_widget(Paragraph::new(details), rows[4]);
    }
}
