//! # Font Metrics
//!
//! Width tables for the standard PDF font the planner draws with.
//!
//! Helvetica is one of the 14 standard fonts every PDF viewer ships, so it
//! never needs embedding. The only thing we need from it is advance widths,
//! which is enough to center titles and labels.

/// Advance widths of a standard font in 1/1000 em units.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    /// Base font name as written into the font dictionary.
    pub pdf_name: &'static str,
    /// Widths for the printable ASCII range, starting at U+0020.
    widths: &'static [u16; 95],
    /// Width used for anything outside the table.
    default_width: u16,
}

/// Helvetica AFM widths for ' ' through '~'.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' - '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0' - '9'
    278, 278, 584, 584, 584, 556, 1015, // ':' - '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' - 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' - 'Z'
    278, 278, 278, 469, 556, 333, // '[' - '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' - 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' - 'z'
    334, 260, 334, 584, // '{' - '~'
];

pub const HELVETICA: StandardFontMetrics = StandardFontMetrics {
    pdf_name: "Helvetica",
    widths: &HELVETICA_WIDTHS,
    default_width: 556,
};

impl StandardFontMetrics {
    /// Advance width of a single character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let code = ch as u32;
        let units = if (0x20..0x7f).contains(&code) {
            self.widths[(code - 0x20) as usize]
        } else {
            self.default_width
        };
        units as f64 * font_size / 1000.0
    }

    /// Width of a whole string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}
