use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::app::{App, Focus};

/// Wheel notches are reported as single events; this is the delta of one notch
pub const WHEEL_NOTCH: f64 = 100.0;

/// Approximate pixel height of a terminal row, for drag distances
pub const ROW_PIXELS: f64 = 16.0;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    ToggleFocus,
    /// Scroll the focused panel by one step in the given direction
    Scroll(f64),
    PageDown,
    PageUp,
    JumpToTop,
    JumpToBottom,
    NextSection,
    PrevSection,
    ToggleHover,
    TogglePress,
    ToggleReducedMotion,
    CarouselNext,
    CarouselPrev,
    /// Wheel delta over the page panel
    PageWheel(f64),
    /// Wheel delta over the carousel panel
    CarouselWheel(f64),
    CarouselTouchStart(f64),
    CarouselTouchMove(f64),
    CarouselTouchEnd,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,

        (KeyCode::Tab, _) => Action::ToggleFocus,

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::Scroll(1.0),
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::Scroll(-1.0),
        (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => Action::PageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::JumpToBottom,

        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::NextSection,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::PrevSection,
        (KeyCode::Char('h'), KeyModifiers::NONE) => Action::ToggleHover,
        (KeyCode::Char(' '), _) => Action::TogglePress,
        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::ToggleReducedMotion,

        (KeyCode::Char(']'), _) => Action::CarouselNext,
        (KeyCode::Char('['), _) => Action::CarouselPrev,
        (KeyCode::Right, _) if app.focus == Focus::Carousel => Action::CarouselNext,
        (KeyCode::Left, _) if app.focus == Focus::Carousel => Action::CarouselPrev,

        _ => Action::None,
    }
}

/// Route a mouse event to the panel under the pointer
///
/// Dragging with the left button over the carousel is treated as touch input.
pub fn handle_mouse_event(mouse: MouseEvent, app: &App) -> Action {
    let over_carousel = contains(app.carousel_area, mouse.column, mouse.row);
    let delta = match mouse.kind {
        MouseEventKind::ScrollDown => WHEEL_NOTCH,
        MouseEventKind::ScrollUp => -WHEEL_NOTCH,
        MouseEventKind::Down(_) if over_carousel => {
            return Action::CarouselTouchStart(mouse.row as f64 * ROW_PIXELS);
        }
        MouseEventKind::Drag(_) if over_carousel => {
            return Action::CarouselTouchMove(mouse.row as f64 * ROW_PIXELS);
        }
        MouseEventKind::Up(_) => return Action::CarouselTouchEnd,
        _ => return Action::None,
    };
    if over_carousel {
        Action::CarouselWheel(delta)
    } else if contains(app.page_area, mouse.column, mouse.row) {
        Action::PageWheel(delta)
    } else {
        Action::None
    }
}

fn contains(area: Option<Rect>, column: u16, row: u16) -> bool {
    area.is_some_and(|area| area.contains(Position::new(column, row)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, MouseButton};
    use scrollsync_core::{BehaviourRegistry, EngineConfig};

    fn app() -> App {
        let mut registry = BehaviourRegistry::new();
        scrollsync_core::behaviour::register_builtins(&mut registry);
        let mut app = App::new(EngineConfig::default(), &registry);
        app.page_area = Some(Rect::new(0, 0, 40, 20));
        app.carousel_area = Some(Rect::new(40, 0, 40, 20));
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row: 5,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_basic_keys() {
        let app = app();
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), &app), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Char('j')), &app), Action::Scroll(1.0));
        assert_eq!(handle_key_event(key(KeyCode::Char(']')), &app), Action::CarouselNext);
        assert_eq!(handle_key_event(key(KeyCode::Char('x')), &app), Action::None);
    }

    #[test]
    fn test_arrows_follow_focus() {
        let mut app = app();
        assert_eq!(handle_key_event(key(KeyCode::Right), &app), Action::None);
        app.focus = Focus::Carousel;
        assert_eq!(handle_key_event(key(KeyCode::Right), &app), Action::CarouselNext);
    }

    #[test]
    fn test_wheel_routes_by_panel() {
        let app = app();
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollDown, 10), &app),
            Action::PageWheel(WHEEL_NOTCH)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollUp, 50), &app),
            Action::CarouselWheel(-WHEEL_NOTCH)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollUp, 90), &app),
            Action::None
        );
    }

    #[test]
    fn test_drag_over_carousel_is_touch() {
        let app = app();
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 50), &app),
            Action::CarouselTouchStart(5.0 * ROW_PIXELS)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 50), &app),
            Action::CarouselTouchMove(5.0 * ROW_PIXELS)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10), &app),
            Action::None
        );
    }
}
