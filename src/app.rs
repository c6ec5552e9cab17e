use std::path::Path;

use anyhow::Result;

use crate::data::{self, Dataset, DataError};
use crate::map::{DistrictRenderer, Viewport};
use crate::selection::Selection;
use crate::shape::Bounds;
use crate::thumbnail::{self, Popup};

/// Fallback camera when there is no data to fit: (lon, lat, zoom)
const FALLBACK_VIEW: (f64, f64, f64) = (78.7, 10.85, 40.0);

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub renderer: DistrictRenderer,
    pub selection: Selection,
    /// Selection revision the view was last synced to
    seen_revision: u64,
    /// Popup for the selected district, if open
    pub popup: Option<Popup>,
    /// District under the pointer
    pub hover: Option<usize>,
    /// Extent of the whole dataset, used for the default camera
    home: Option<Bounds>,
    /// Why the dataset is unavailable, if it is
    pub load_error: Option<String>,
    /// Last informational message for the status bar
    pub status: Option<String>,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Whether the current press has moved (drag) rather than clicked
    dragged: bool,
}

/// Convert terminal cell to Braille pixel, accounting for the 1-cell border
#[inline(always)]
fn cell_to_pixel(col: u16, row: u16) -> (i32, i32) {
    ((col.saturating_sub(1)) as i32 * 2, (row.saturating_sub(1)) as i32 * 4)
}

/// Braille pixel size of the map area for a terminal size
#[inline(always)]
fn map_pixels(width: usize, height: usize) -> (usize, usize) {
    // 2 border columns; 2 border rows + 1 status bar
    (width.saturating_sub(2) * 2, height.saturating_sub(3) * 4)
}

impl App {
    pub fn new(width: usize, height: usize, dataset: Result<Dataset, DataError>) -> Self {
        let (renderer, load_error, status) = match dataset {
            Ok(dataset) => {
                let status = match dataset.skipped {
                    0 => format!("Loaded {} districts", dataset.districts.len()),
                    n => format!("Loaded {} districts ({n} non-polygon features skipped)", dataset.districts.len()),
                };
                (DistrictRenderer::new(dataset.districts), None, Some(status))
            }
            Err(e) => (DistrictRenderer::new(Vec::new()), Some(e.to_string()), None),
        };

        let home = data::dataset_bounds(renderer.districts());
        let (pw, ph) = map_pixels(width, height);
        let selection = Selection::new();

        Self {
            viewport: home_view(home.as_ref(), pw, ph),
            renderer,
            seen_revision: selection.revision(),
            selection,
            popup: None,
            hover: None,
            home,
            load_error,
            status,
            should_quit: false,
            last_mouse: None,
            dragged: false,
        }
    }

    /// Load the dataset at `path` and build the app around it
    pub fn load(width: usize, height: usize, path: &Path) -> Self {
        Self::new(width, height, data::load_districts(path))
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pw, ph) = map_pixels(width, height);
        self.viewport.width = pw;
        self.viewport.height = ph;
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_pixel(col, row);
        self.viewport.zoom_in_at(px, py);
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_pixel(col, row);
        self.viewport.zoom_out_at(px, py);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Reset the camera to the default view of the whole region
    pub fn reset_view(&mut self) {
        self.viewport = home_view(self.home.as_ref(), self.viewport.width, self.viewport.height);
    }

    /// District under a terminal cell
    pub fn district_at_cell(&self, col: u16, row: u16) -> Option<usize> {
        let (px, py) = cell_to_pixel(col, row);
        let (lon, lat) = self.viewport.unproject(px, py);
        self.renderer.district_at(lon, lat)
    }

    /// Click on the map: select the district there and open its popup.
    /// A click on empty map closes the popup but keeps the selection.
    /// Dimmed districts are not clickable; "Back to View" (or Tab) is the
    /// way to another district.
    pub fn click(&mut self, col: u16, row: u16) {
        match self.district_at_cell(col, row) {
            Some(idx) if self.is_dimmed(idx) => {}
            Some(idx) => self.select_index(idx),
            None => self.popup = None,
        }
    }

    fn is_dimmed(&self, idx: usize) -> bool {
        self.renderer
            .districts()
            .get(idx)
            .is_some_and(|d| self.selection.is_dimmed(&d.name))
    }

    /// Select a district by index and open its popup
    pub fn select_index(&mut self, idx: usize) {
        let Some(district) = self.renderer.districts().get(idx) else {
            return;
        };
        let name = district.name.clone();
        self.selection.select(Some(&name));
        // Re-clicking the selected district reopens a closed popup
        self.popup = None;
        self.sync_selection();
    }

    /// "Back to View": clear the selection, close the popup, reset the camera
    pub fn back_to_view(&mut self) {
        self.selection.clear();
        self.sync_selection();
        self.reset_view();
    }

    /// React to a selection change: no selection resets the camera and closes
    /// the popup; a new selection rebuilds the popup.
    pub fn sync_selection(&mut self) {
        let changed = self.selection.revision() != self.seen_revision;
        self.seen_revision = self.selection.revision();

        match self.selection.current() {
            None => {
                self.popup = None;
                if changed {
                    self.reset_view();
                }
            }
            Some(name) => {
                if changed || self.popup.is_none() {
                    self.popup = self
                        .renderer
                        .find(name)
                        .map(|idx| Popup::for_district(&self.renderer.districts()[idx]));
                }
            }
        }
    }

    /// Step the selection through districts in dataset order
    pub fn cycle_selection(&mut self, forward: bool) {
        let count = self.renderer.districts().len();
        if count == 0 {
            return;
        }
        let next = match self.selection.current().and_then(|n| self.renderer.find(n)) {
            Some(idx) if forward => (idx + 1) % count,
            Some(idx) => (idx + count - 1) % count,
            None if forward => 0,
            None => count - 1,
        };
        self.select_index(next);
    }

    /// Move the camera to frame the selected district
    pub fn fly_to_selected(&mut self) {
        let bounds = self
            .selection
            .current()
            .and_then(|n| self.renderer.find(n))
            .and_then(|idx| self.renderer.districts()[idx].bounds);
        if let Some(b) = bounds {
            self.viewport = Viewport::fit_bounds(&b, self.viewport.width, self.viewport.height);
        }
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    /// Write the open popup's SVG into `dir`
    pub fn export_popup(&mut self, dir: &Path) -> Result<()> {
        let Some(popup) = &self.popup else {
            self.status = Some("Nothing to export: select a district first".to_string());
            return Ok(());
        };
        let file = thumbnail::export_svg(dir, popup)?;
        self.status = Some(format!("Saved {}", file.display()));
        Ok(())
    }

    pub fn set_hover(&mut self, col: u16, row: u16) {
        self.hover = self.district_at_cell(col, row);
    }

    pub fn begin_press(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Handle mouse drag
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - x as i32;
            let dy = last_y as i32 - y as i32;
            if dx != 0 || dy != 0 {
                self.dragged = true;
            }
            // Cells to Braille pixels
            self.pan(dx * 2, dy * 4);
        }
        self.last_mouse = Some((x, y));
    }

    /// Mouse released: a press without movement is a click
    pub fn end_press(&mut self, col: u16, row: u16) {
        let was_click = self.last_mouse.is_some() && !self.dragged;
        self.last_mouse = None;
        self.dragged = false;
        if was_click {
            self.click(col, row);
        }
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.2}°{}, {:.2}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}

/// Camera framing the whole dataset, or the fixed regional view without data
fn home_view(home: Option<&Bounds>, width: usize, height: usize) -> Viewport {
    match home {
        Some(b) => Viewport::fit_bounds(b, width, height),
        None => {
            let (lon, lat, zoom) = FALLBACK_VIEW;
            Viewport::new(lon, lat, zoom, width, height)
        }
    }
}
