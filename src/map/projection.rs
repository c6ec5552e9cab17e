use std::f64::consts::PI;

use glam::DVec2;

use crate::shape::Bounds;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 5000.0;

/// Share of the canvas a fitted bounding box occupies
const FIT_MARGIN: f64 = 0.9;

/// Viewport representing the visible map area and zoom level.
/// Zoom 1 shows the whole Mercator world across the canvas width.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// Web Mercator, normalized so the world spans [0, 1] on both axes
#[inline(always)]
fn mercator(lon: f64, lat: f64) -> DVec2 {
    let lat_rad = lat.clamp(-85.0, 85.0).to_radians();
    DVec2::new(
        (lon + 180.0) / 360.0,
        (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0,
    )
}

#[inline(always)]
fn inverse_mercator(m: DVec2) -> (f64, f64) {
    let lon = m.x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * m.y)).sinh().atan().to_degrees();
    (lon, lat)
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    /// Center on a bounding box and zoom so it fills most of the canvas
    pub fn fit_bounds(bounds: &Bounds, width: usize, height: usize) -> Self {
        let lo = mercator(bounds.min.x, bounds.min.y);
        let hi = mercator(bounds.max.x, bounds.max.y);
        let span = (hi - lo).abs();
        let (center_lon, center_lat) = inverse_mercator((lo + hi) * 0.5);

        let w = width.max(1) as f64;
        let h = height.max(1) as f64;
        let zoom_x = if span.x > 0.0 { FIT_MARGIN / span.x } else { MAX_ZOOM };
        let zoom_y = if span.y > 0.0 { FIT_MARGIN * h / (span.y * w) } else { MAX_ZOOM };

        Self::new(center_lon, center_lat, zoom_x.min(zoom_y), width, height)
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = self.zoom * self.width.max(1) as f64;
        let center = mercator(self.center_lon, self.center_lat)
            + DVec2::new(dx as f64 / scale, dy as f64 / scale);
        let (lon, lat) = inverse_mercator(center);

        self.center_lon = if lon > 180.0 {
            lon - 360.0
        } else if lon < -180.0 {
            lon + 360.0
        } else {
            lon
        };
        self.center_lat = lat.clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Keep the geographic point under (px, py) fixed while zooming
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Project to fractional pixel coordinates
    pub fn project_f(&self, lon: f64, lat: f64) -> DVec2 {
        let scale = self.zoom * self.width as f64;
        let offset = mercator(lon, lat) - mercator(self.center_lon, self.center_lat);
        offset * scale + DVec2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let p = self.project_f(lon, lat);
        (p.x as i32, p.y as i32)
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.zoom * self.width.max(1) as f64;
        let offset = DVec2::new(
            px as f64 - self.width as f64 / 2.0,
            py as f64 - self.height as f64 / 2.0,
        ) / scale;
        inverse_mercator(mercator(self.center_lon, self.center_lat) + offset)
    }

    /// Geographic extent currently on screen
    pub fn visible_bounds(&self) -> Bounds {
        let (lon0, lat0) = self.unproject(0, self.height as i32);
        let (lon1, lat1) = self.unproject(self.width as i32, 0);
        Bounds {
            min: DVec2::new(lon0, lat0),
            max: DVec2::new(lon1, lat1),
        }
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
    }

    #[test]
    fn test_unproject_roundtrip_near_center() {
        let vp = Viewport::new(78.7, 10.85, 40.0, 200, 120);
        let (px, py) = vp.project(78.9, 11.1);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon - 78.9).abs() < 0.05);
        assert!((lat - 11.1).abs() < 0.05);
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);
        vp.pan(0, -10);
        assert!(vp.center_lat > 0.0);
    }

    #[test]
    fn test_fit_bounds_keeps_box_on_screen() {
        let bounds = Bounds {
            min: DVec2::new(76.2, 8.0),
            max: DVec2::new(80.4, 13.6),
        };
        let vp = Viewport::fit_bounds(&bounds, 160, 96);
        for (lon, lat) in [(76.2, 8.0), (80.4, 13.6), (76.2, 13.6), (80.4, 8.0)] {
            let (px, py) = vp.project(lon, lat);
            assert!((0..=160).contains(&px), "x {px} off screen");
            assert!((0..=96).contains(&py), "y {py} off screen");
        }
        assert!((vp.center_lon - 78.3).abs() < 1e-9);
    }

    #[test]
    fn test_fit_point_uses_max_zoom() {
        let p = DVec2::new(78.0, 10.0);
        let vp = Viewport::fit_bounds(&Bounds { min: p, max: p }, 100, 100);
        assert_eq!(vp.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = Viewport::new(0.0, 0.0, MAX_ZOOM, 100, 100);
        vp.zoom_in();
        assert_eq!(vp.zoom, MAX_ZOOM);
    }
}
