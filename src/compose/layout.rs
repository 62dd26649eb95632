//! Text placement math.
//!
//! All positions and sizes are fractions of the template's logical height,
//! which keeps text proportionally placed across templates of differing
//! aspect ratios without per-template configuration.

use super::viewbox::ViewBox;

/// Name baseline sits this fraction of the height above the bottom edge.
const NAME_BOTTOM_RATIO: f64 = 0.05;
/// Name font size as a fraction of the height.
const NAME_SIZE_RATIO: f64 = 0.037;
/// Note font size as a fraction of the height.
const NOTE_SIZE_RATIO: f64 = 0.035;
/// Gap between the note block and the name baseline, as a height fraction.
const NOTE_GAP_RATIO: f64 = 0.05;
/// Line spacing multiplier for stacked note lines.
const LINE_SPACING: f64 = 1.2;

/// A single positioned text layer awaiting injection.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    /// CSS font-weight (500 for the name, 400 for note lines).
    pub font_weight: u16,
    pub content: String,
}

/// Vertical position of the name baseline for a given box.
pub fn name_baseline(vb: &ViewBox) -> f64 {
    vb.height - vb.height * NAME_BOTTOM_RATIO
}

/// Layout the name as one centered layer, or `None` when blank.
pub fn name_layer(vb: &ViewBox, name: &str) -> Option<TextLayer> {
    if name.trim().is_empty() {
        return None;
    }
    Some(TextLayer {
        x: vb.width / 2.0,
        y: name_baseline(vb),
        font_size: vb.height * NAME_SIZE_RATIO,
        font_weight: 500,
        content: name.to_string(),
    })
}

/// Layout the note as one centered layer per line, stacked downward above
/// the name baseline. A blank note yields no layers; otherwise every line
/// produced by splitting on `\n` gets a layer, empty lines included, so the
/// vertical rhythm matches what the user typed.
pub fn note_layers(vb: &ViewBox, note: &str) -> Vec<TextLayer> {
    if note.trim().is_empty() {
        return Vec::new();
    }

    let font_size = vb.height * NOTE_SIZE_RATIO;
    let lines: Vec<&str> = note.split('\n').collect();
    let start_y = name_baseline(vb)
        - lines.len() as f64 * font_size * LINE_SPACING
        - vb.height * NOTE_GAP_RATIO;

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| TextLayer {
            x: vb.width / 2.0,
            y: start_y + i as f64 * font_size * LINE_SPACING,
            font_size,
            font_weight: 400,
            content: (*line).to_string(),
        })
        .collect()
}
