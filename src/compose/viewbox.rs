//! Logical coordinate box parsing.
//!
//! A `viewBox` attribute declares the drawing area as four numbers
//! (`min-x min-y width height`), separated by whitespace or commas.

/// Fallback drawing area when a template declares no usable viewBox.
pub const DEFAULT_WIDTH: f64 = 500.0;
pub const DEFAULT_HEIGHT: f64 = 800.0;

/// The logical coordinate box of a vector template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl ViewBox {
    /// Parse a `viewBox` attribute value.
    ///
    /// Returns `None` unless all four numbers parse and width/height are
    /// positive; callers then fall back to [`ViewBox::default`].
    pub fn parse(value: &str) -> Option<Self> {
        let mut nums = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().ok());

        let min_x = nums.next()??;
        let min_y = nums.next()??;
        let width = nums.next()??;
        let height = nums.next()??;

        if width > 0.0 && height > 0.0 {
            Some(Self {
                min_x,
                min_y,
                width,
                height,
            })
        } else {
            None
        }
    }
}
