use glam::DVec2;

use crate::braille::BrailleCanvas;
use crate::data::District;
use crate::map::geometry::{draw_ring, draw_weighted_line, fill_polygon};
use crate::map::projection::Viewport;
use crate::map::spatial::FeatureGrid;
use crate::selection::Selection;
use crate::style::{self, DistrictStyle};

/// Grid cell size in degrees; districts are a few tenths of a degree across
const GRID_CELL_DEGREES: f64 = 0.25;

/// Minimum on-screen width in pixels before a district gets a name label
const LABEL_MIN_PIXELS: f64 = 24.0;

/// Districts drawn with one style: a fill canvas under an outline canvas
pub struct StyledLayer {
    pub style: DistrictStyle,
    pub fill: BrailleCanvas,
    pub outline: BrailleCanvas,
}

impl StyledLayer {
    fn new(style: DistrictStyle, cols: usize, rows: usize) -> Self {
        Self {
            style,
            fill: BrailleCanvas::new(cols, rows),
            outline: BrailleCanvas::new(cols, rows),
        }
    }
}

/// Everything needed to paint one frame, back to front
pub struct MapLayers {
    pub layers: Vec<StyledLayer>,
    /// (col, row, text, emphasized)
    pub labels: Vec<(u16, u16, String, bool)>,
}

/// Draws districts onto Braille canvases and answers hit tests
pub struct DistrictRenderer {
    districts: Vec<District>,
    grid: FeatureGrid,
}

impl DistrictRenderer {
    pub fn new(districts: Vec<District>) -> Self {
        let grid = FeatureGrid::build(districts.iter().map(|d| d.bounds.as_ref()), GRID_CELL_DEGREES);
        Self { districts, grid }
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn has_data(&self) -> bool {
        !self.districts.is_empty()
    }

    /// Index of the first district with this name
    pub fn find(&self, name: &str) -> Option<usize> {
        self.districts.iter().position(|d| d.name == name)
    }

    /// Style a district gets for the current selection and hover
    pub fn style_for(&self, name: &str, selection: &Selection, hovered: bool) -> DistrictStyle {
        if selection.is_dimmed(name) {
            return style::BLUR;
        }
        let base = if selection.current().is_some() {
            style::HIGHLIGHT
        } else {
            style::DEFAULT
        };
        if hovered {
            style::hovered(base)
        } else {
            base
        }
    }

    /// Render all visible districts.
    ///
    /// Layer order: dimmed districts, then normal, then hovered, then the
    /// selected district on top.
    pub fn render(
        &self,
        cols: usize,
        rows: usize,
        viewport: &Viewport,
        selection: &Selection,
        hover: Option<usize>,
    ) -> MapLayers {
        let visible = self.grid.query_bounds(&viewport.visible_bounds());

        let mut ranked: Vec<(u8, usize, DistrictStyle)> = visible
            .into_iter()
            .map(|idx| {
                let name = &self.districts[idx].name;
                let style = self.style_for(name, selection, hover == Some(idx));
                let rank = if selection.is_dimmed(name) {
                    0
                } else if selection.current() == Some(name.as_str()) {
                    3
                } else if hover == Some(idx) {
                    2
                } else {
                    1
                };
                (rank, idx, style)
            })
            .collect();
        ranked.sort_by_key(|&(rank, idx, _)| (rank, idx));

        let mut layers: Vec<StyledLayer> = Vec::new();
        let mut labels = Vec::new();

        for (rank, idx, style) in ranked {
            if layers.last().map_or(true, |l| l.style != style) {
                layers.push(StyledLayer::new(style, cols, rows));
            }
            let Some(layer) = layers.last_mut() else { continue };
            let district = &self.districts[idx];
            self.draw_district(layer, district, viewport);

            if let Some(label) = self.label_position(district, viewport, cols, rows) {
                labels.push((label.0, label.1, district.name.clone(), rank >= 2));
            }
        }

        MapLayers { layers, labels }
    }

    fn draw_district(&self, layer: &mut StyledLayer, district: &District, viewport: &Viewport) {
        for rings in district.shape.polygons() {
            let projected: Vec<Vec<DVec2>> = rings
                .iter()
                .map(|ring| ring.iter().map(|p| viewport.project_f(p.x, p.y)).collect())
                .collect();

            fill_polygon(&mut layer.fill, &projected, layer.style.fill_opacity * layer.style.opacity);

            for ring in &projected {
                let pixels: Vec<(i32, i32)> = ring.iter().map(|p| (p.x as i32, p.y as i32)).collect();
                if pixels.len() == 1 {
                    draw_ring(&mut layer.outline, &pixels, layer.style.weight);
                    continue;
                }
                // Edge-level culling keeps Bresenham off far-away segments when zoomed in
                for (i, &a) in pixels.iter().enumerate() {
                    let b = pixels[(i + 1) % pixels.len()];
                    if viewport.line_might_be_visible(a, b) {
                        draw_weighted_line(&mut layer.outline, a, b, layer.style.weight);
                    }
                }
            }
        }
    }

    /// Character cell for a district's name, centered on its bbox.
    /// Districts too small on screen get no label.
    fn label_position(&self, district: &District, viewport: &Viewport, cols: usize, rows: usize) -> Option<(u16, u16)> {
        let bounds = district.bounds?;
        let lo = viewport.project_f(bounds.min.x, bounds.min.y);
        let hi = viewport.project_f(bounds.max.x, bounds.max.y);
        if (hi.x - lo.x).abs() < LABEL_MIN_PIXELS {
            return None;
        }

        let center = bounds.center();
        let p = viewport.project_f(center.x, center.y);
        let col = (p.x / 2.0).floor() - (district.name.chars().count() as f64 / 2.0).floor();
        let row = (p.y / 4.0).floor();
        if col < 0.0 || row < 0.0 || col >= cols as f64 || row >= rows as f64 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    /// Topmost district containing the point. Later districts draw over
    /// earlier ones, so the highest index wins.
    pub fn district_at(&self, lon: f64, lat: f64) -> Option<usize> {
        let p = DVec2::new(lon, lat);
        self.grid
            .query_point(p)
            .iter()
            .rev()
            .copied()
            .find(|&idx| {
                let d = &self.districts[idx];
                d.bounds.is_some_and(|b| b.contains(p)) && d.shape.contains(p)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    fn square(name: &str, x0: f64, y0: f64, side: f64) -> District {
        District::new(
            name,
            Shape::Polygon(vec![vec![
                DVec2::new(x0, y0),
                DVec2::new(x0 + side, y0),
                DVec2::new(x0 + side, y0 + side),
                DVec2::new(x0, y0 + side),
            ]]),
        )
    }

    fn renderer() -> DistrictRenderer {
        DistrictRenderer::new(vec![
            square("Salem", 78.0, 11.5, 0.5),
            square("Erode", 77.3, 11.2, 0.5),
            square("Madurai", 77.8, 9.8, 0.4),
        ])
    }

    #[test]
    fn test_district_at() {
        let r = renderer();
        assert_eq!(r.district_at(78.2, 11.7), Some(0));
        assert_eq!(r.district_at(77.5, 11.4), Some(1));
        assert_eq!(r.district_at(80.0, 13.0), None);
    }

    #[test]
    fn test_style_for_selection() {
        let r = renderer();
        let mut sel = Selection::new();
        assert_eq!(r.style_for("Salem", &sel, false), style::DEFAULT);
        assert_eq!(r.style_for("Salem", &sel, true).fill, style::HIGHLIGHT.fill);

        sel.select(Some("Salem"));
        assert_eq!(r.style_for("Salem", &sel, false), style::HIGHLIGHT);
        assert_eq!(r.style_for("Erode", &sel, false), style::BLUR);
        assert_eq!(r.style_for("Erode", &sel, true), style::BLUR);
    }

    #[test]
    fn test_render_orders_selected_last() {
        let r = renderer();
        let mut sel = Selection::new();
        sel.select(Some("Erode"));

        let bounds = crate::data::dataset_bounds(r.districts()).unwrap();
        let vp = Viewport::fit_bounds(&bounds, 160, 96);
        let frame = r.render(80, 24, &vp, &sel, None);

        assert_eq!(frame.layers.first().map(|l| l.style), Some(style::BLUR));
        assert_eq!(frame.layers.last().map(|l| l.style), Some(style::HIGHLIGHT));
        assert!(frame.layers.iter().all(|l| l.outline.glyphs().count() > 0));
    }

    #[test]
    fn test_render_without_selection_uses_default() {
        let r = renderer();
        let bounds = crate::data::dataset_bounds(r.districts()).unwrap();
        let vp = Viewport::fit_bounds(&bounds, 160, 96);
        let frame = r.render(80, 24, &vp, &Selection::new(), None);
        assert_eq!(frame.layers.len(), 1);
        assert_eq!(frame.layers[0].style, style::DEFAULT);
        assert!(frame.layers[0].fill.glyphs().count() > 0);
    }

    #[test]
    fn test_render_fully_zoomed_out() {
        let r = renderer();
        let vp = Viewport::new(78.0, 11.0, crate::map::MIN_ZOOM, 396, 228);
        let frame = r.render(198, 57, &vp, &Selection::new(), None);
        assert_eq!(frame.layers.len(), 1);
        assert!(frame.layers[0].outline.glyphs().count() > 0);
    }
}
