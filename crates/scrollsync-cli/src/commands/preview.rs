use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::{Block, Borders},
    Terminal,
};
use tracing::info;

use scrollsync_core::{BehaviourRegistry, EngineConfig};
use scrollsync_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event, Action},
    widgets::{CarouselWidget, PageWidget, StatusBarWidget},
};

/// Tick rate while nothing is moving
const IDLE_TICK: Duration = Duration::from_millis(100);

pub async fn run(config: EngineConfig, registry: &BehaviourRegistry) -> Result<()> {
    let frame_tick = config.frame.tick_duration();
    let mut app = App::new(config, registry);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("scrollsync preview"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = EventHandler::new(IDLE_TICK, frame_tick);

    // Fast ticks right after input so the first frames of a gesture aren't late
    let mut needs_fast_update = true;

    let result = loop {
        let now = Instant::now();
        app.tick(now);

        // Draw UI
        if let Err(e) = terminal.draw(|frame| {
            let size = frame.area();

            // Main layout: content + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(3, 5), Constraint::Ratio(2, 5)])
                .split(main_layout[0]);

            app.page_area = Some(columns[0]);
            app.carousel_area = Some(columns[1]);

            // The page viewport is the panel's inner area
            let inner = Block::default().borders(Borders::ALL).inner(columns[0]);
            app.set_page_viewport(inner.width, inner.height, now);

            PageWidget::render(frame, columns[0], &app);
            CarouselWidget::render(frame, columns[1], &app);
            StatusBarWidget::render(frame, main_layout[1], &app);
        }) {
            break Err(e.into());
        }

        // Handle events (use faster tick rate during animations)
        let event = if needs_fast_update {
            event_handler.next_animation()
        } else {
            event_handler.next()
        };
        let event = match event {
            Ok(event) => event,
            Err(e) => break Err(e),
        };

        let mut had_input = false;
        if let Some(event) = event {
            let now = Instant::now();
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app);
                    had_input = action != Action::None;
                    handle_action(&mut app, action, now);
                }
                AppEvent::Mouse(mouse) => {
                    let action = handle_mouse_event(mouse, &app);
                    had_input = action != Action::None;
                    handle_action(&mut app, action, now);
                }
                AppEvent::Resize(_, _) => {
                    // Viewport is re-measured on the next draw
                }
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = had_input || app.needs_fast_update();

        if app.should_quit {
            break Ok(());
        }
    };

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    info!("Preview closed");
    result
}

fn handle_action(app: &mut App, action: Action, now: Instant) {
    if action != Action::None {
        app.clear_status();
    }
    match action {
        Action::Quit => app.should_quit = true,
        Action::ToggleFocus => app.toggle_focus(),
        Action::Scroll(direction) => app.scroll(direction, now),
        Action::PageDown => app.page_down(now),
        Action::PageUp => app.page_up(now),
        Action::JumpToTop => app.jump_to_top(now),
        Action::JumpToBottom => app.jump_to_bottom(now),
        Action::NextSection => app.move_section(1),
        Action::PrevSection => app.move_section(-1),
        Action::ToggleHover => app.toggle_hover(),
        Action::TogglePress => app.toggle_press(),
        Action::ToggleReducedMotion => app.toggle_reduced_motion(),
        Action::CarouselNext => app.carousel_step(1, now),
        Action::CarouselPrev => app.carousel_step(-1, now),
        Action::PageWheel(delta) => {
            // One notch scrolls three rows, like a terminal pager
            app.scroll_page(delta.signum() * 3.0, now);
        }
        Action::CarouselWheel(delta) => app.carousel_wheel(delta, now),
        Action::CarouselTouchStart(y) => app.carousel_touch_start(y, now),
        Action::CarouselTouchMove(y) => app.carousel_touch_move(y, now),
        Action::CarouselTouchEnd => app.carousel_touch_end(now),
        Action::None => {}
    }
}
