/// Tunables of the pagination engine that are not user-facing rendering settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Font size multipliers for `h1`, `h2` and `h3`.
    pub heading_scales: [f32; 3],
    /// Vertical breathing room added to an image before its height is rounded up to
    /// whole lines, in px.
    pub image_gutter_px: f32,
    /// Average character advance as a fraction of the font size, used when no typeface
    /// is loaded.
    pub average_char_width_ratio: f32,
    /// Width multiplier for bold text in the average-width estimate.
    pub bold_width_factor: f32,
    /// List indentation per nesting level, in ems of the base font size.
    pub list_indent_em: f32,
    /// Blank lines emitted after a closing `</p>`.
    pub paragraph_gap_lines: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            heading_scales: [2.0, 1.6, 1.3],
            image_gutter_px: 8.0,
            average_char_width_ratio: 0.5,
            bold_width_factor: 1.08,
            list_indent_em: 2.0,
            paragraph_gap_lines: 1,
        }
    }
}

impl LayoutConfig {
    /// Multiplier for heading `level` (1-based); other levels are unscaled.
    pub fn heading_scale(&self, level: u8) -> f32 {
        match level {
            1..=3 => self.heading_scales[level as usize - 1],
            _ => 1.0,
        }
    }
}
