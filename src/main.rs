use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use district_map::app::App;
use district_map::data::DEFAULT_DATA_PATH;
use district_map::ui;
use ratatui::DefaultTerminal;

fn main() -> Result<()> {
    let data_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &data_path);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events: click to select, drag to pan, scroll to zoom
fn handle_mouse(app: &mut App, mouse: MouseEvent, term_width: u16) {
    match mouse.kind {
        MouseEventKind::Moved => app.set_hover(mouse.column, mouse.row),
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => {
            if ui::hits(ui::back_button_rect(term_width), mouse.column, mouse.row) {
                app.back_to_view();
            } else {
                app.begin_press(mouse.column, mouse.row);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.end_press(mouse.column, mouse.row),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, data_path: &Path) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::load(size.width as usize, size.height as usize, data_path);

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => app.quit(),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

                    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('0') => app.back_to_view(),
                    KeyCode::Char('x') => app.close_popup(),

                    KeyCode::Tab => app.cycle_selection(true),
                    KeyCode::BackTab => app.cycle_selection(false),
                    KeyCode::Char('f') => app.fly_to_selected(),
                    KeyCode::Char('e') => {
                        if let Err(e) = app.export_popup(Path::new(".")) {
                            app.status = Some(format!("Export failed: {e:#}"));
                        }
                    }

                    // Pan with hjkl or arrow keys
                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -8),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 8),

                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    // Reload the dataset
                    KeyCode::Char('r') => {
                        let size = terminal.size()?;
                        app = App::load(size.width as usize, size.height as usize, data_path);
                    }

                    _ => {}
                },
                Event::Mouse(mouse) => {
                    let width = terminal.size()?.width;
                    handle_mouse(&mut app, mouse, width);
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
