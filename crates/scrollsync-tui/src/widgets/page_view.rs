use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus, Section};

/// Rows of vertical offset per pixel-like unit of `--reveal-y` / `--parallax-y`
const ROWS_PER_UNIT: f64 = 0.1;

pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let is_focused = app.focus == Focus::Page;

        let border_style = if is_focused {
            Style::default().fg(theme.focus)
        } else {
            Style::default().fg(theme.grey0)
        };

        let title = format!(" Page {:>3.0}% ", app.driver.scroll_progress() * 100.0);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        for (index, section) in app.sections.iter().enumerate() {
            let rect = app.page.section_rect(index);
            let shift = section_shift(section);
            let top = rect.y + shift;
            let bottom = top + rect.height;
            let visible_top = top.max(0.0);
            let visible_bottom = bottom.min(inner.height as f64);
            if visible_bottom <= visible_top {
                continue;
            }

            let y = inner.y + visible_top.round() as u16;
            let height = (visible_bottom.round() - visible_top.round()).max(0.0) as u16;
            if height == 0 {
                continue;
            }
            let section_area = Rect::new(inner.x, y, inner.width, height);
            Self::render_section(frame, section_area, app, index, section);
        }
    }

    fn render_section(frame: &mut Frame, area: Rect, app: &App, index: usize, section: &Section) {
        let theme = &app.theme;
        let opacity = section.element.number("--opacity").unwrap_or(1.0);
        let fg = theme.fade(theme.fg0, opacity);

        let border = if section.interaction.hovered {
            theme.hover
        } else if index == app.focused_section {
            theme.focus
        } else {
            theme.fade(theme.grey0, opacity)
        };

        let mut title_style = Style::default().fg(fg);
        if section.interaction.pressed {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }

        let block = Block::default()
            .title(Span::styled(format!(" #{} {} ", index + 1, section.behaviour.id()), title_style))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.bg1));

        let lines: Vec<Line> = section
            .element
            .styles()
            .into_iter()
            .map(|(name, value)| {
                Line::from(vec![
                    Span::styled(format!("{name:<18}"), Style::default().fg(theme.fade(theme.grey2, opacity))),
                    Span::styled(value, Style::default().fg(fg)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Rows a section is displaced by its transform-style outputs
fn section_shift(section: &Section) -> f64 {
    let reveal = section.element.number("--reveal-y").unwrap_or(0.0);
    let parallax = section.element.number("--parallax-y").unwrap_or(0.0);
    ((reveal + parallax) * ROWS_PER_UNIT).round()
}
