//! The Compositor: overlays user text onto a template's vector markup.
//!
//! Works at the XML event level (quick-xml reader/writer pair): one scan
//! pass collects the root `viewBox` and whether a `<style>` block already
//! exists, then a rewrite pass strips previously injected layers and appends
//! the new ones before the closing root tag. Re-composition is idempotent -
//! calling [`compose`] on its own output never accumulates duplicate layers.
//!
//! # Modules
//!
//! - [`viewbox`]: logical coordinate box parsing
//! - [`layout`]: text placement math (positions, sizes, line stacking)

pub mod layout;
pub mod viewbox;

use crate::debug;
use layout::TextLayer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;
use thiserror::Error;
use viewbox::ViewBox;

/// Class marking injected text layers, so they can be stripped on recompose.
const LAYER_CLASS: &str = "card-text";
/// Font family declared by the injected `@font-face` block.
const FONT_FAMILY: &str = "banglaFont";
/// Fixed external font resource referenced by the embedded style.
const FONT_URL: &str = "/assets/banglaFont.woff2";

/// Composition failures.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The input has no recognizable `<svg>` root element.
    #[error("markup has no recognizable <svg> root element")]
    MalformedMarkup,

    /// The markup stopped being well-formed mid-document.
    #[error("markup is not well-formed XML")]
    Xml(#[from] quick_xml::Error),

    /// Serializing the mutated document failed.
    #[error("failed to serialize composited markup")]
    Serialize(#[from] std::io::Error),
}

/// What the scan pass learned about the document.
struct DocInfo {
    viewbox: Option<ViewBox>,
    has_style: bool,
}

/// Compose user text onto template markup.
///
/// Injects a centered name layer near the bottom edge and a stack of note
/// lines above it, both sized as fractions of the template height and filled
/// with `text_color`. A `@font-face` style block is added as the first child
/// of the root unless one already exists. Blank name and note are valid and
/// suppress their layers.
pub fn compose(
    markup: &str,
    name: &str,
    note: &str,
    text_color: &str,
) -> Result<String, ComposeError> {
    let doc = scan(markup)?;
    let vb = doc.viewbox.unwrap_or_default();

    let mut layers = Vec::new();
    layers.extend(layout::name_layer(&vb, name));
    layers.extend(layout::note_layers(&vb, note));
    debug!("compose"; "{} text layer(s) over {}x{}", layers.len(), vb.width, vb.height);

    rewrite(markup, &doc, &layers, text_color)
}

/// First pass: find the root element, its viewBox, and any existing style.
fn scan(markup: &str) -> Result<DocInfo, ComposeError> {
    let mut reader = Reader::from_str(markup);
    let mut root_seen = false;
    let mut root_is_svg = false;
    let mut has_style = false;
    let mut viewbox = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if !root_seen {
                    root_seen = true;
                    root_is_svg = e.local_name().as_ref() == b"svg";
                    if root_is_svg {
                        viewbox = attr_value(&e, b"viewBox")
                            .as_deref()
                            .and_then(ViewBox::parse);
                    }
                }
                if e.local_name().as_ref() == b"style" {
                    has_style = true;
                }
            }
            Ok(Event::Eof) => break,
            // Before a valid root there is nothing to compose onto; after
            // one, breakage is an XML error in its own right.
            Err(e) if root_is_svg => return Err(ComposeError::Xml(e)),
            Err(_) => return Err(ComposeError::MalformedMarkup),
            Ok(_) => {}
        }
    }

    if !root_is_svg {
        return Err(ComposeError::MalformedMarkup);
    }

    Ok(DocInfo { viewbox, has_style })
}

/// Second pass: strip old layers, inject style and new layers, serialize.
fn rewrite(
    markup: &str,
    doc: &DocInfo,
    layers: &[TextLayer],
    text_color: &str,
) -> Result<String, ComposeError> {
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(markup.len())));
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if is_injected_layer(&e) {
                    reader.read_to_end(e.name())?;
                    continue;
                }
                depth += 1;
                let is_root = depth == 1;
                writer.write_event(Event::Start(e))?;
                if is_root && !doc.has_style {
                    write_font_face(&mut writer)?;
                }
            }
            Event::Empty(e) => {
                if is_injected_layer(&e) {
                    continue;
                }
                if depth == 0 && e.local_name().as_ref() == b"svg" {
                    // Self-closing root: reopen it so layers have a parent.
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    writer.write_event(Event::Start(e))?;
                    if !doc.has_style {
                        write_font_face(&mut writer)?;
                    }
                    write_layers(&mut writer, layers, text_color)?;
                    writer.write_event(Event::End(BytesEnd::new(name)))?;
                } else {
                    writer.write_event(Event::Empty(e))?;
                }
            }
            Event::End(e) => {
                if depth == 1 {
                    write_layers(&mut writer, layers, text_color)?;
                }
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            ev => writer.write_event(ev)?,
        }
    }

    Ok(String::from_utf8_lossy(&writer.into_inner().into_inner()).into_owned())
}

/// Whether an element carries the injected-layer marker class.
fn is_injected_layer(e: &BytesStart<'_>) -> bool {
    attr_value(e, b"class")
        .map(|classes| classes.split_whitespace().any(|c| c == LAYER_CLASS))
        .unwrap_or(false)
}

/// Read one attribute value off an element, unescaped.
fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Inject the `@font-face` declaration so it is available before any text
/// layer renders.
fn write_font_face(writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<(), ComposeError> {
    let css = format!(
        "\n    @font-face {{\n      font-family: '{FONT_FAMILY}';\n      \
         src: url('{FONT_URL}') format('woff2');\n    }}\n  "
    );
    writer
        .create_element("style")
        .write_text_content(BytesText::new(&css))?;
    Ok(())
}

/// Append all computed text layers before the root close tag.
fn write_layers(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    layers: &[TextLayer],
    text_color: &str,
) -> Result<(), ComposeError> {
    for layer in layers {
        let x = format!("{}", layer.x);
        let y = format!("{:.2}", layer.y);
        let size = format!("{:.2}", layer.font_size);
        let weight = layer.font_weight.to_string();
        writer
            .create_element("text")
            .with_attributes([
                ("x", x.as_str()),
                ("y", y.as_str()),
                ("text-anchor", "middle"),
                ("font-family", FONT_FAMILY),
                ("font-size", size.as_str()),
                ("fill", text_color),
                ("font-weight", weight.as_str()),
                ("class", LAYER_CLASS),
            ])
            .write_text_content(BytesText::new(&layer.content))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 500 800"><rect width="500" height="800" fill="#0f172a"/></svg>"##;

    fn count_layers(markup: &str) -> usize {
        markup.matches(LAYER_CLASS).count()
    }

    #[test]
    fn name_layer_lands_at_five_percent_above_bottom() {
        let out = compose(TEMPLATE, "নাম", "", "#ffb400").unwrap();
        assert!(out.contains(r#"y="760.00""#));
        assert!(out.contains(r#"x="250""#));
        assert!(out.contains(r#"font-size="29.60""#));
        assert!(out.contains(r#"font-weight="500""#));
        assert!(out.contains(r##"fill="#ffb400""##));
        assert!(out.contains("নাম"));
    }

    #[test]
    fn composing_twice_keeps_exactly_one_name_layer() {
        let once = compose(TEMPLATE, "নাম", "", "#fff").unwrap();
        let twice = compose(&once, "নাম", "", "#fff").unwrap();
        assert_eq!(count_layers(&twice), 1);
    }

    #[test]
    fn note_lines_become_ordered_layers() {
        let out = compose(TEMPLATE, "", "ঈদ মোবারক\nভালো থেকো\nআনন্দে", "#fff").unwrap();
        assert_eq!(count_layers(&out), 3);

        // Document order matches line order, top to bottom.
        let first = out.find("ঈদ মোবারক").unwrap();
        let second = out.find("ভালো থেকো").unwrap();
        let third = out.find("আনন্দে").unwrap();
        assert!(first < second && second < third);
        assert!(out.contains(r#"font-weight="400""#));
    }

    #[test]
    fn empty_inputs_inject_no_layers() {
        let out = compose(TEMPLATE, "", "", "#fff").unwrap();
        assert_eq!(count_layers(&out), 0);
        let out = compose(TEMPLATE, "  ", " \n ", "#fff").unwrap();
        assert_eq!(count_layers(&out), 0);
    }

    #[test]
    fn font_face_injected_once() {
        let once = compose(TEMPLATE, "নাম", "", "#fff").unwrap();
        assert_eq!(once.matches("@font-face").count(), 1);
        let twice = compose(&once, "নাম", "", "#fff").unwrap();
        assert_eq!(twice.matches("@font-face").count(), 1);
    }

    #[test]
    fn existing_style_block_is_respected() {
        let with_style = r##"<svg viewBox="0 0 500 800"><style>.x{fill:red}</style></svg>"##;
        let out = compose(with_style, "নাম", "", "#fff").unwrap();
        assert!(!out.contains("@font-face"));
        assert!(out.contains(".x{fill:red}"));
    }

    #[test]
    fn missing_viewbox_falls_back_to_500x800() {
        let out = compose("<svg><rect/></svg>", "নাম", "", "#fff").unwrap();
        assert!(out.contains(r#"y="760.00""#));
        assert!(out.contains(r#"x="250""#));
    }

    #[test]
    fn self_closing_root_still_gains_layers() {
        let out = compose(r#"<svg viewBox="0 0 500 800"/>"#, "নাম", "", "#fff").unwrap();
        assert_eq!(count_layers(&out), 1);
        assert!(out.ends_with("</svg>"));
    }

    #[test]
    fn non_svg_root_is_malformed() {
        let err = compose("<div>hello</div>", "নাম", "", "#fff").unwrap_err();
        assert!(matches!(err, ComposeError::MalformedMarkup));
    }

    #[test]
    fn garbage_input_is_malformed_not_a_panic() {
        for bad in ["", "just text", "<svg", "<<<>>>"] {
            assert!(matches!(
                compose(bad, "x", "y", "#fff"),
                Err(ComposeError::MalformedMarkup)
            ));
        }
    }

    #[test]
    fn breakage_after_a_valid_root_is_an_xml_error() {
        let broken = r#"<svg viewBox="0 0 500 800"><g></p></svg>"#;
        let err = compose(broken, "নাম", "", "#fff").unwrap_err();
        assert!(matches!(err, ComposeError::Xml(_)));
    }

    #[test]
    fn changing_text_replaces_rather_than_accumulates() {
        let first = compose(TEMPLATE, "পুরনো", "", "#fff").unwrap();
        let second = compose(&first, "নতুন", "", "#fff").unwrap();
        assert!(!second.contains("পুরনো"));
        assert!(second.contains("নতুন"));
        assert_eq!(count_layers(&second), 1);
    }
}
