//! District popup: name, thumbnail path and its terminal preview.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glam::DVec2;

use crate::braille::BrailleCanvas;
use crate::data::District;
use crate::map::{draw_ring, fill_polygon};
use crate::shape::path::{self, SCALE};
use crate::style::{THUMBNAIL_FILL_HEX, THUMBNAIL_STROKE_HEX};

/// Stipple density of the preview fill
const PREVIEW_FILL: f32 = 0.35;

/// Popup contents for the selected district. Rebuilt on every selection and
/// dropped when the popup closes.
#[derive(Clone, Debug)]
pub struct Popup {
    pub name: String,
    /// SVG `d` attribute, empty when the district has no points
    pub path: String,
    /// Normalized points the path was built from
    pub points: Vec<DVec2>,
}

impl Popup {
    pub fn for_district(district: &District) -> Self {
        let points = path::thumbnail_points(&district.shape);
        Self {
            name: district.name.clone(),
            path: path::path_from_points(&points),
            points,
        }
    }

    pub fn svg(&self) -> String {
        svg_document(&self.name, &self.path)
    }
}

/// Draw normalized points as a closed, lightly filled outline in a square
/// area centered on a canvas of the given character size.
pub fn render_preview(points: &[DVec2], cols: usize, rows: usize) -> BrailleCanvas {
    let mut canvas = BrailleCanvas::new(cols, rows);
    let side = canvas.pixel_width().min(canvas.pixel_height());
    if side < 2 || points.is_empty() {
        return canvas;
    }

    let offset = DVec2::new(
        (canvas.pixel_width() - side) as f64 / 2.0,
        (canvas.pixel_height() - side) as f64 / 2.0,
    );
    let k = (side - 1) as f64 / SCALE;
    let pixels: Vec<DVec2> = points.iter().map(|&p| p * k + offset).collect();

    fill_polygon(&mut canvas, std::slice::from_ref(&pixels), PREVIEW_FILL);
    let outline: Vec<(i32, i32)> = pixels.iter().map(|p| (p.x.round() as i32, p.y.round() as i32)).collect();
    draw_ring(&mut canvas, &outline, 1.0);
    canvas
}

/// Escape the five XML special characters
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Standalone SVG document for a district thumbnail
pub fn svg_document(name: &str, path: &str) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 {scale} {scale}">"#,
            "\n<title>{title}</title>\n",
            r#"<path d="{d}" fill="{fill}" stroke="{stroke}" stroke-width="0.5"/>"#,
            "\n</svg>\n"
        ),
        scale = SCALE,
        title = xml_escape(name),
        d = path,
        fill = THUMBNAIL_FILL_HEX,
        stroke = THUMBNAIL_STROKE_HEX,
    )
}

/// File-name-safe form of a district name
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("district");
    }
    out
}

/// Write the popup's SVG to `<dir>/<slug>.svg`
pub fn export_svg(dir: &Path, popup: &Popup) -> Result<PathBuf> {
    let file = dir.join(format!("{}.svg", slug(&popup.name)));
    fs::write(&file, popup.svg()).with_context(|| format!("writing {}", file.display()))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    fn unit_square() -> District {
        District::new(
            "Kanniyakumari",
            Shape::Polygon(vec![vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(0.0, 10.0),
                DVec2::new(10.0, 10.0),
                DVec2::new(10.0, 0.0),
            ]]),
        )
    }

    #[test]
    fn test_popup_path() {
        let popup = Popup::for_district(&unit_square());
        assert_eq!(popup.path, "M0,100 L0,0 L100,0 L100,100 z");
        assert_eq!(popup.points.len(), 4);
    }

    #[test]
    fn test_svg_document() {
        let svg = svg_document("A & B", "M0,0 z");
        assert!(svg.contains(r#"viewBox="0 0 100 100""#));
        assert!(svg.contains(r##"<path d="M0,0 z" fill="#ff7800" stroke="#333" stroke-width="0.5"/>"##));
        assert!(svg.contains("<title>A &amp; B</title>"));
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("The Nilgiris"), "the-nilgiris");
        assert_eq!(slug("Thoothukudi (Tuticorin)"), "thoothukudi-tuticorin");
        assert_eq!(slug("--"), "district");
    }

    #[test]
    fn test_preview_draws_corners() {
        let popup = Popup::for_district(&unit_square());
        let canvas = render_preview(&popup.points, 10, 5);
        // 20x20 square area, corners at 0 and 19
        assert!(canvas.is_set(0, 0));
        assert!(canvas.is_set(19, 19));
        assert!(canvas.is_set(19, 0));
    }

    #[test]
    fn test_preview_empty() {
        let canvas = render_preview(&[], 10, 5);
        assert_eq!(canvas.glyphs().count(), 0);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = std::env::temp_dir().join(format!("district-map-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let popup = Popup::for_district(&unit_square());
        let file = export_svg(&dir, &popup).unwrap();
        assert_eq!(file.file_name().unwrap(), "kanniyakumari.svg");
        let written = fs::read_to_string(&file).unwrap();
        assert!(written.contains(&popup.path));
        fs::remove_dir_all(&dir).unwrap();
    }
}
