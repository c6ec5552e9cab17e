use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::map::MapLayers;
use crate::style::THUMBNAIL_FILL;
use crate::thumbnail::{render_preview, Popup};

pub const BACK_LABEL: &str = " Back to View ";

/// Popup size in cells: thumbnail square plus name and path rows
const POPUP_WIDTH: u16 = 34;
const POPUP_HEIGHT: u16 = 20;

/// Clickable "Back to View" button on the top border of the map frame
pub fn back_button_rect(term_width: u16) -> Rect {
    let width = BACK_LABEL.len() as u16;
    Rect {
        x: term_width.saturating_sub(width + 2),
        y: 0,
        width: width.min(term_width),
        height: 1,
    }
}

pub fn hits(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);

    if let Some(popup) = &app.popup {
        render_popup(frame, popup, chunks[0]);
    }
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " District Map ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let button_style = if app.selection.current().is_some() {
        Style::default().fg(Color::White).bg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray).bg(Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(BACK_LABEL, button_style)),
        back_button_rect(area.width),
    );

    if let Some(err) = &app.load_error {
        render_unavailable(frame, err, inner);
        return;
    }

    let mut viewport = app.viewport.clone();
    // Braille gives 2x4 resolution per character
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app.renderer.render(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        &app.selection,
        app.hover,
    );
    frame.render_widget(MapWidget { layers }, inner);
}

fn render_unavailable(frame: &mut Frame, err: &str, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "District data unavailable",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled(
            "Pass a GeoJSON FeatureCollection path as the first argument.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let rows = (text.len() as u16).min(area.height);
    let box_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(rows) / 2,
        width: area.width,
        height: rows,
    };
    frame.render_widget(
        Paragraph::new(text)
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true }),
        box_area,
    );
}

/// Braille district layers with name labels overlaid
struct MapWidget {
    layers: MapLayers,
}

fn paint(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    for (col, row, ch) in canvas.glyphs() {
        if col >= area.width as usize || row >= area.height as usize {
            continue;
        }
        buf[(area.x + col as u16, area.y + row as u16)].set_char(ch).set_fg(color);
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front; each layer's outline above its own fill
        for layer in &self.layers.layers {
            paint(&layer.fill, layer.style.fill, area, buf);
            paint(&layer.outline, layer.style.stroke, area, buf);
        }

        for (lx, ly, text, emphasized) in &self.layers.labels {
            if *ly >= area.height || *lx >= area.width {
                continue;
            }
            let style = if *emphasized {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let max_len = area.width.saturating_sub(*lx) as usize;
            for (i, ch) in text.chars().take(max_len).enumerate() {
                buf[(area.x + *lx + i as u16, area.y + *ly)].set_char(ch).set_style(style);
            }
        }
    }
}

/// Popup anchored at the top-left of the map with name, preview and path
fn render_popup(frame: &mut Frame, popup: &Popup, map_area: Rect) {
    let area = Rect {
        x: map_area.x + 2,
        y: map_area.y + 1,
        width: POPUP_WIDTH.min(map_area.width.saturating_sub(4)),
        height: POPUP_HEIGHT.min(map_area.height.saturating_sub(2)),
    };
    if area.width < 4 || area.height < 4 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(0xff, 0x78, 0x00)))
        .title(Span::styled(
            format!(" {} ", popup.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(" e:export svg ", Style::default().fg(Color::DarkGray)));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(inner);

    if popup.points.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("(no shape)", Style::default().fg(Color::DarkGray))),
            chunks[0],
        );
    } else {
        let canvas = render_preview(&popup.points, chunks[0].width as usize, chunks[0].height as usize);
        let target = chunks[0];
        let buf = frame.buffer_mut();
        paint(&canvas, THUMBNAIL_FILL, target, buf);
    }

    frame.render_widget(
        Paragraph::new(Span::styled(popup.path.clone(), Style::default().fg(Color::DarkGray)))
            .wrap(Wrap { trim: false }),
        chunks[1],
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.selection.current().unwrap_or("none");

    let mut spans = vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | Districts: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.renderer.districts().len().to_string(), Style::default().fg(Color::Magenta)),
        Span::styled(" | Selected: ", Style::default().fg(Color::DarkGray)),
        Span::styled(selected.to_string(), Style::default().fg(Color::Rgb(0xff, 0x6b, 0x00))),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Green)));
    }
    spans.push(Span::styled(
        " | click:select tab:next f:fly esc:back hjkl:pan +/-:zoom r:reload q:quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_button_position() {
        let rect = back_button_rect(80);
        assert_eq!(rect.y, 0);
        assert_eq!(rect.x + rect.width, 78);
        assert!(hits(rect, 70, 0));
        assert!(!hits(rect, 70, 1));
        assert!(!hits(rect, 10, 0));
    }
}
