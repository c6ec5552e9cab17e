use glam::DVec2;

use crate::braille::BrailleCanvas;

/// 4x4 ordered-dither thresholds
const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Draw a line using Bresenham's algorithm.
/// `dash` skips every other dot when set.
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32, dash: bool) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (x0, y0);
    let mut step = 0u32;

    loop {
        if !dash || step % 2 == 0 {
            canvas.set_pixel_signed(x, y);
        }
        step += 1;

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a line whose thickness follows a style weight:
/// below 1 dotted, 1 plain, 2 and up doubled.
pub fn draw_weighted_line(canvas: &mut BrailleCanvas, a: (i32, i32), b: (i32, i32), weight: f32) {
    let dash = weight < 1.0;
    draw_line(canvas, a.0, a.1, b.0, b.1, dash);
    if weight >= 2.0 {
        draw_line(canvas, a.0 + 1, a.1, b.0 + 1, b.1, false);
        draw_line(canvas, a.0, a.1 + 1, b.0, b.1 + 1, false);
    }
}

/// Whether a pixel is covered by a stipple of the given density in [0, 1]
#[inline(always)]
pub fn stipple(x: usize, y: usize, density: f32) -> bool {
    (BAYER_4X4[y % 4][x % 4] as f32) < density * 16.0
}

/// Fill one polygon (outer ring plus holes, already in pixel space) with an
/// even-odd scanline, setting only the pixels the stipple mask allows.
pub fn fill_polygon(canvas: &mut BrailleCanvas, rings: &[Vec<DVec2>], density: f32) {
    if density <= 0.0 {
        return;
    }

    let (min_y, max_y) = rings
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    if !min_y.is_finite() {
        return;
    }

    let height = canvas.pixel_height() as f64;
    let width = canvas.pixel_width() as f64;
    let y_start = min_y.max(0.0).floor() as usize;
    let y_end = max_y.min(height - 1.0).ceil().max(0.0) as usize;

    let mut crossings: Vec<f64> = Vec::new();
    for y in y_start..=y_end {
        let scan = y as f64 + 0.5;
        crossings.clear();

        for ring in rings {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                if (a.y > scan) != (b.y > scan) {
                    crossings.push(a.x + (scan - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
        }

        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks_exact(2) {
            let x_start = pair[0].max(0.0).round() as usize;
            let x_end = pair[1].min(width).round() as usize;
            for x in x_start..x_end {
                if stipple(x, y, density) {
                    canvas.set_pixel(x, y);
                }
            }
        }
    }
}

/// Draw a closed ring outline in pixel space
pub fn draw_ring(canvas: &mut BrailleCanvas, ring: &[(i32, i32)], weight: f32) {
    if ring.len() < 2 {
        if let Some(&(x, y)) = ring.first() {
            canvas.set_pixel_signed(x, y);
        }
        return;
    }
    for (i, &a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        draw_weighted_line(canvas, a, b, weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, side: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(x0, y0),
            DVec2::new(x0 + side, y0),
            DVec2::new(x0 + side, y0 + side),
            DVec2::new(x0, y0 + side),
        ]
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0, false);
        assert!((0..10).all(|x| canvas.is_set(x, 0)));
    }

    #[test]
    fn test_dashed_line_skips_dots() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0, true);
        assert!(canvas.is_set(0, 0));
        assert!(!canvas.is_set(1, 0));
        assert!(canvas.is_set(2, 0));
    }

    #[test]
    fn test_heavy_line_is_thicker() {
        let mut canvas = BrailleCanvas::new(5, 2);
        draw_weighted_line(&mut canvas, (0, 0), (9, 0), 2.0);
        assert!(canvas.is_set(3, 0));
        assert!(canvas.is_set(3, 1));
    }

    #[test]
    fn test_stipple_density() {
        let count = |d: f32| {
            (0..4)
                .flat_map(|y| (0..4).map(move |x| (x, y)))
                .filter(|&(x, y)| stipple(x, y, d))
                .count()
        };
        assert_eq!(count(0.0), 0);
        assert_eq!(count(0.5), 8);
        assert_eq!(count(1.0), 16);
        assert!(count(0.2) < count(0.9));
    }

    #[test]
    fn test_fill_with_hole() {
        let mut canvas = BrailleCanvas::new(10, 5);
        fill_polygon(&mut canvas, &[square(0.0, 0.0, 20.0), square(8.0, 8.0, 4.0)], 1.0);
        assert!(canvas.is_set(2, 2));
        assert!(!canvas.is_set(10, 10));
        assert!(canvas.is_set(15, 15));
    }

    #[test]
    fn test_fill_clips_to_canvas() {
        let mut canvas = BrailleCanvas::new(2, 1);
        fill_polygon(&mut canvas, &[square(-50.0, -50.0, 100.0)], 1.0);
        assert_eq!(canvas.glyphs().count(), 2);
    }
}
