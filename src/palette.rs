//! Dashboard colors
//!
//! Categorical charts cycle through a fixed eight-entry palette by position;
//! single-series charts use the primary accent.

use plotters::style::RGBColor;

/// Categorical palette, as hex strings
pub const PALETTE_HEX: [&str; 8] = [
    "#8b5cf6", "#ec4899", "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#6366f1", "#14b8a6",
];

pub const ACCENT_HEX: &str = "#8b5cf6";
pub const GRID_HEX: &str = "#374151";
pub const AXIS_HEX: &str = "#9ca3af";
pub const PANEL_HEX: &str = "#1f2937";

/// Colors used by the chart backend
#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub background: RGBColor,
    pub grid: RGBColor,
    pub axis: RGBColor,
    pub accent: RGBColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        ChartTheme {
            background: parse_hex_color(PANEL_HEX).unwrap_or(RGBColor(31, 41, 55)),
            grid: parse_hex_color(GRID_HEX).unwrap_or(RGBColor(55, 65, 81)),
            axis: parse_hex_color(AXIS_HEX).unwrap_or(RGBColor(156, 163, 175)),
            accent: parse_hex_color(ACCENT_HEX).unwrap_or(RGBColor(139, 92, 246)),
        }
    }
}

/// Palette entry for the item at `index`, wrapping after the last color
pub fn palette_hex(index: usize) -> &'static str {
    PALETTE_HEX[index % PALETTE_HEX.len()]
}

/// Parse hex color (#RRGGBB or #RGB)
pub fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.trim().trim_start_matches('#');
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(RGBColor(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(RGBColor(r, g, b))
        }
        _ => None,
    }
}

/// Hex string to color, falling back to the accent for malformed input
pub fn color_or_accent(hex: &str) -> RGBColor {
    parse_hex_color(hex).unwrap_or_else(|| ChartTheme::default().accent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#8b5cf6"), Some(RGBColor(139, 92, 246)));
        assert_eq!(parse_hex_color("#fff"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_hex(0), "#8b5cf6");
        assert_eq!(palette_hex(7), "#14b8a6");
        assert_eq!(palette_hex(8), palette_hex(0));
        assert_eq!(palette_hex(17), palette_hex(1));
    }

    #[test]
    fn test_every_palette_entry_parses() {
        for hex in PALETTE_HEX {
            assert!(parse_hex_color(hex).is_some(), "bad palette entry {}", hex);
        }
    }

    #[test]
    fn test_color_or_accent_fallback() {
        assert_eq!(color_or_accent("not-a-color"), RGBColor(139, 92, 246));
    }
}
