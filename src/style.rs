use ratatui::style::Color;

/// Drawing style for one district layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistrictStyle {
    pub fill: Color,
    /// Outline weight in map pixels (fractional weights draw a dotted line)
    pub weight: f32,
    pub opacity: f32,
    pub stroke: Color,
    /// Fill coverage in [0, 1], rendered as stipple density
    pub fill_opacity: f32,
}

/// All districts when nothing is selected
pub const DEFAULT: DistrictStyle = DistrictStyle {
    fill: Color::Rgb(0x33, 0x88, 0xff),
    weight: 1.0,
    opacity: 1.0,
    stroke: Color::White,
    fill_opacity: 0.5,
};

/// The selected district
pub const HIGHLIGHT: DistrictStyle = DistrictStyle {
    fill: Color::Rgb(0xff, 0x6b, 0x00),
    weight: 2.0,
    opacity: 1.0,
    stroke: Color::Rgb(0xff, 0x78, 0x00),
    fill_opacity: 0.9,
};

/// Every district other than the selected one
pub const BLUR: DistrictStyle = DistrictStyle {
    fill: Color::Rgb(0xcc, 0xcc, 0xcc),
    weight: 0.5,
    opacity: 1.0,
    stroke: Color::Rgb(0x99, 0x99, 0x99),
    fill_opacity: 0.2,
};

/// Pointer over a district that is not dimmed: the base style with the
/// highlight fill and a heavier outline.
pub fn hovered(base: DistrictStyle) -> DistrictStyle {
    DistrictStyle {
        fill: HIGHLIGHT.fill,
        weight: 2.0,
        ..base
    }
}

/// Thumbnail path colors, matching the exported SVG
pub const THUMBNAIL_FILL: Color = Color::Rgb(0xff, 0x78, 0x00);
pub const THUMBNAIL_FILL_HEX: &str = "#ff7800";
pub const THUMBNAIL_STROKE_HEX: &str = "#333";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_keeps_base_stroke() {
        let h = hovered(DEFAULT);
        assert_eq!(h.fill, HIGHLIGHT.fill);
        assert_eq!(h.weight, 2.0);
        assert_eq!(h.stroke, DEFAULT.stroke);
        assert_eq!(h.fill_opacity, DEFAULT.fill_opacity);
    }

    #[test]
    fn test_fill_opacity_ordering() {
        assert!(BLUR.fill_opacity < DEFAULT.fill_opacity);
        assert!(DEFAULT.fill_opacity < HIGHLIGHT.fill_opacity);
    }
}
