//! Intrinsic dimension probing for rasterization.
//!
//! Resolution order mirrors how browsers size an SVG image: the root
//! `viewBox` wins, explicit `width`/`height` attributes are the fallback,
//! and absent both the export defaults apply.

use crate::compose::viewbox::ViewBox;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::RasterError;

/// Fallback export size when the root declares nothing usable.
pub const DEFAULT_WIDTH: f64 = 1000.0;
pub const DEFAULT_HEIGHT: f64 = 1600.0;

/// Probe the markup for its logical pixel dimensions.
///
/// Fails with [`RasterError::Dimension`] when there is no `<svg>` root to
/// read dimensions from.
pub fn probe(markup: &str) -> Result<(f64, f64), RasterError> {
    let mut reader = Reader::from_str(markup);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() != b"svg" {
                    return Err(RasterError::Dimension);
                }

                // viewBox present: use it (or the defaults if it is
                // unparseable); only consult width/height when absent.
                if let Some(raw) = attr_value(&e, b"viewBox") {
                    return Ok(match ViewBox::parse(&raw) {
                        Some(vb) => (vb.width, vb.height),
                        None => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
                    });
                }

                let width = attr_value(&e, b"width")
                    .as_deref()
                    .and_then(parse_length)
                    .unwrap_or(DEFAULT_WIDTH);
                let height = attr_value(&e, b"height")
                    .as_deref()
                    .and_then(parse_length)
                    .unwrap_or(DEFAULT_HEIGHT);
                return Ok((width, height));
            }
            Ok(Event::Eof) | Err(_) => return Err(RasterError::Dimension),
            Ok(_) => {}
        }
    }
}

/// Parse the leading number of a length value, tolerating trailing units
/// (`"500px"` reads as 500).
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit() && !matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        .unwrap_or(value.len());
    let parsed: f64 = value[..end].parse().ok()?;
    if parsed > 0.0 {
        Some(parsed)
    } else {
        None
    }
}

/// Read one attribute value off an element.
fn attr_value(e: &quick_xml::events::BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewbox_wins() {
        let (w, h) = probe(r#"<svg viewBox="0 0 500 800" width="10" height="10"/>"#).unwrap();
        assert_eq!((w, h), (500.0, 800.0));
    }

    #[test]
    fn width_height_attributes_are_the_fallback() {
        let (w, h) = probe(r#"<svg width="640px" height="480"/>"#).unwrap();
        assert_eq!((w, h), (640.0, 480.0));
    }

    #[test]
    fn bare_root_uses_export_defaults() {
        let (w, h) = probe("<svg></svg>").unwrap();
        assert_eq!((w, h), (1000.0, 1600.0));
    }

    #[test]
    fn unparseable_viewbox_uses_export_defaults() {
        let (w, h) = probe(r#"<svg viewBox="a b c d" width="640"/>"#).unwrap();
        assert_eq!((w, h), (1000.0, 1600.0));
    }

    #[test]
    fn no_root_is_a_dimension_error() {
        assert!(matches!(probe("<div/>"), Err(RasterError::Dimension)));
        assert!(matches!(probe("plain text"), Err(RasterError::Dimension)));
        assert!(matches!(probe(""), Err(RasterError::Dimension)));
    }

    #[test]
    fn length_parsing_tolerates_units() {
        assert_eq!(parse_length("500px"), Some(500.0));
        assert_eq!(parse_length(" 72.5 "), Some(72.5));
        assert_eq!(parse_length("1e3"), Some(1000.0));
        assert_eq!(parse_length("px"), None);
        assert_eq!(parse_length("-3"), None);
    }
}
