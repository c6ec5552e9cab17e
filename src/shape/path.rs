//! SVG path generation for district thumbnails.
//!
//! A shape's outline is scaled so its own bounding box fills a fixed
//! `SCALE`×`SCALE` drawing space, y pointing down. Each district is normalized
//! against its own extent only, so thumbnails of a tiny district and a large
//! one come out the same size.

use glam::DVec2;

use super::{Bounds, Shape};

/// Side length of the drawing space
pub const SCALE: f64 = 100.0;

/// Map points into `[0, SCALE]²`, inverting the vertical axis so that higher
/// latitude lands nearer the top.
///
/// An axis with zero span (single point, or a perfectly straight
/// vertical/horizontal run) maps every point to the center on that axis.
pub fn normalize(points: &[DVec2]) -> Vec<DVec2> {
    let Some(bounds) = Bounds::from_points(points.iter().copied()) else {
        return Vec::new();
    };
    let span = bounds.size();

    points
        .iter()
        .map(|p| {
            let t = DVec2::new(
                unit(p.x - bounds.min.x, span.x),
                unit(p.y - bounds.min.y, span.y),
            );
            DVec2::new(t.x * SCALE, SCALE - t.y * SCALE)
        })
        .collect()
}

/// Offset within a span as a fraction in [0, 1]; 0.5 for an empty span
#[inline(always)]
fn unit(offset: f64, span: f64) -> f64 {
    if span > 0.0 {
        offset / span
    } else {
        0.5
    }
}

/// Build the `d` attribute for already-normalized points:
/// `M` for the first point, `L` for the rest, closed with `z`.
pub fn path_from_points(points: &[DVec2]) -> String {
    if points.is_empty() {
        return String::new();
    }

    let mut d = String::with_capacity(points.len() * 16);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            d.push(' ');
        }
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(&format!("{},{}", p.x, p.y));
    }
    d.push_str(" z");
    d
}

/// Normalized outline points of a shape (outer rings only)
pub fn thumbnail_points(shape: &Shape) -> Vec<DVec2> {
    normalize(&shape.outline())
}

/// Thumbnail path for a district shape, or an empty string when the shape
/// has no usable points.
pub fn svg_path(shape: &Shape) -> String {
    path_from_points(&thumbnail_points(shape))
}
