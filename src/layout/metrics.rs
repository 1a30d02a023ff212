use super::Size;

/// Text measurement backend. The layout engine only needs the extent of a
/// rendered label; how it is measured belongs to the renderer.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> Size;
}

/// Fixed-pitch approximation: every character is `char_width` wide and every
/// line `line_height` tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMetrics {
    pub char_width: i32,
    pub line_height: i32,
}

impl Default for MonospaceMetrics {
    /// Roughly an 8pt sans-serif face.
    fn default() -> Self {
        Self {
            char_width: 6,
            line_height: 13,
        }
    }
}

impl TextMeasure for MonospaceMetrics {
    fn measure(&self, text: &str) -> Size {
        let lines: Vec<&str> = text.lines().collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Size {
            width: widest as i32 * self.char_width,
            height: lines.len().max(1) as i32 * self.line_height,
        }
    }
}
