//! Colour tables used by the charts.

use crate::config::parse_hex_color;
use plotters::style::RGBColor;

/// Daily frequency bars
pub const DAILY_BAR: RGBColor = RGBColor(0xDF, 0x9F, 0x9B);
/// Hourly frequency bars
pub const HOURLY_BAR: RGBColor = RGBColor(0xE6, 0xAA, 0xAA);
/// Hourly density line
pub const HOURLY_DENSITY: RGBColor = RGBColor(0xC6, 0x4F, 0x4F);
/// Word frequency bars
pub const SKY_BLUE: RGBColor = RGBColor(0x87, 0xCE, 0xEB);
/// Sender comparison, self then other
pub const SENDER: [RGBColor; 2] = [RGBColor(0xFF, 0x63, 0x47), RGBColor(0x9A, 0xCD, 0x32)];
/// Calendar cells with no messages
pub const EMPTY_DAY: RGBColor = RGBColor(0xF0, 0xF0, 0xF0);

/// Soft qualitative palette for the calendar heatmap
pub const PASTEL1: [RGBColor; 9] = [
    RGBColor(0xFB, 0xB4, 0xAE),
    RGBColor(0xB3, 0xCD, 0xE3),
    RGBColor(0xCC, 0xEB, 0xC5),
    RGBColor(0xDE, 0xCB, 0xE4),
    RGBColor(0xFE, 0xD9, 0xA6),
    RGBColor(0xFF, 0xFF, 0xCC),
    RGBColor(0xE5, 0xD8, 0xBD),
    RGBColor(0xFD, 0xDA, 0xEC),
    RGBColor(0xF2, 0xF2, 0xF2),
];

/// Paired palette for the weekday pie
pub const PAIRED: [RGBColor; 12] = [
    RGBColor(0xA6, 0xCE, 0xE3),
    RGBColor(0x1F, 0x78, 0xB4),
    RGBColor(0xB2, 0xDF, 0x8A),
    RGBColor(0x33, 0xA0, 0x2C),
    RGBColor(0xFB, 0x9A, 0x99),
    RGBColor(0xE3, 0x1A, 0x1C),
    RGBColor(0xFD, 0xBF, 0x6F),
    RGBColor(0xFF, 0x7F, 0x00),
    RGBColor(0xCA, 0xB2, 0xD6),
    RGBColor(0x6A, 0x3D, 0x9A),
    RGBColor(0xFF, 0xFF, 0x99),
    RGBColor(0xB1, 0x59, 0x28),
];

/// Viridis samples for word cloud text
pub const VIRIDIS: [RGBColor; 10] = [
    RGBColor(0x44, 0x01, 0x54),
    RGBColor(0x48, 0x28, 0x78),
    RGBColor(0x3E, 0x49, 0x89),
    RGBColor(0x31, 0x68, 0x8E),
    RGBColor(0x26, 0x82, 0x8E),
    RGBColor(0x1F, 0x9E, 0x89),
    RGBColor(0x35, 0xB7, 0x79),
    RGBColor(0x6E, 0xCE, 0x58),
    RGBColor(0xB5, 0xDE, 0x2B),
    RGBColor(0xFD, 0xE7, 0x25),
];

/// `#RRGGBB` to a colour, white when malformed
#[must_use]
pub fn hex_color(value: &str) -> RGBColor {
    parse_hex_color(value).map_or(RGBColor(0xFF, 0xFF, 0xFF), |(r, g, b)| RGBColor(r, g, b))
}

/// Pick a heatmap colour for `count` on a scale topping out at `max`
#[must_use]
pub fn heat_color(count: usize, max: usize) -> RGBColor {
    if count == 0 || max == 0 {
        return EMPTY_DAY;
    }
    let last = PASTEL1.len() - 1;
    let index = ((count as f64 / max as f64) * last as f64).round() as usize;
    PASTEL1[index.min(last)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_color_bounds() {
        assert_eq!(heat_color(0, 10), EMPTY_DAY);
        assert_eq!(heat_color(10, 10), PASTEL1[8]);
        assert_eq!(heat_color(1, 1000), PASTEL1[0]);
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#DF9F9B"), DAILY_BAR);
        assert_eq!(hex_color("nope"), RGBColor(0xFF, 0xFF, 0xFF));
    }
}
