//! Deep-link construction and parsing.
//!
//! - Internal representation: always decoded (human-readable Bengali)
//! - Link boundary: encode on output, decode on input
//!
//! Parsing is deliberately permissive: missing, unreadable, or out-of-range
//! parameters fall back to defaults rather than erroring, so a mangled link
//! still opens the generator instead of a wall of errors.

use crate::catalog::CardInput;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::sync::OnceLock;
use url::Url;

/// Build a share link for a card.
///
/// `template_id` is the 1-based catalog id, written verbatim; the `note`
/// parameter is omitted entirely when the note is empty, matching the links
/// the product has always produced.
pub fn share_link(base: &str, name: &str, note: &str, template_id: usize) -> String {
    let base = base.trim_end_matches('/');
    let mut link = format!("{base}/?name={}&id={template_id}", encode(name));
    if !note.is_empty() {
        link.push_str("&note=");
        link.push_str(&encode(note));
    }
    link
}

/// Parse card state back out of a share link (absolute or relative).
///
/// Unknown parameters are ignored; a missing or out-of-range 1-based `id`
/// leaves the default template selected.
pub fn parse_share_link(link: &str, catalog_len: usize) -> CardInput {
    let mut input = CardInput::new();

    let Some(parsed) = parse_lenient(link) else {
        return input;
    };

    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "name" => input.set_name(&value),
            "note" => input.set_note(&value),
            "id" => {
                if let Ok(id) = value.parse::<usize>() {
                    if (1..=catalog_len).contains(&id) {
                        input.select_template(id - 1, catalog_len);
                    }
                }
            }
            _ => {}
        }
    }

    input
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, NON_ALPHANUMERIC).to_string()
}

/// Parse an absolute URL, falling back to resolving against a dummy base so
/// relative links (`/?name=...`) parse too.
fn parse_lenient(link: &str) -> Option<Url> {
    static BASE: OnceLock<Url> = OnceLock::new();
    let base = BASE.get_or_init(|| Url::parse("http://x").expect("static base url"));

    Url::parse(link).ok().or_else(|| base.join(link).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_bengali_name_and_one_based_id() {
        let link = share_link("https://cards.example", "নাম", "", 2);
        let input = parse_share_link(&link, 5);
        assert_eq!(input.name(), "নাম");
        assert_eq!(input.template_index(), 1);
        assert_eq!(input.note(), "");
    }

    #[test]
    fn empty_note_is_omitted_from_the_query() {
        let link = share_link("https://cards.example", "নাম", "", 3);
        assert!(!link.contains("note="));
        assert!(link.contains("id=3"));
    }

    #[test]
    fn note_with_newlines_survives_the_trip() {
        let note = "ঈদ মোবারক\nভালো থেকো";
        let link = share_link("https://cards.example/", "নাম", note, 1);
        let input = parse_share_link(&link, 5);
        assert_eq!(input.note(), note);
    }

    #[test]
    fn relative_links_parse() {
        let input = parse_share_link("/?name=x&id=4", 5);
        assert_eq!(input.name(), "x");
        assert_eq!(input.template_index(), 3);
    }

    #[test]
    fn out_of_range_or_garbage_id_keeps_the_default_template() {
        assert_eq!(parse_share_link("/?id=9", 5).template_index(), 0);
        assert_eq!(parse_share_link("/?id=0", 5).template_index(), 0);
        assert_eq!(parse_share_link("/?id=abc", 5).template_index(), 0);
        assert_eq!(parse_share_link("/?id=-1", 5).template_index(), 0);
    }

    #[test]
    fn missing_parameters_fall_back_to_defaults() {
        let input = parse_share_link("https://cards.example/", 5);
        assert_eq!(input.name(), "");
        assert_eq!(input.note(), "");
        assert_eq!(input.template_index(), 0);
    }

    #[test]
    fn unparseable_input_yields_defaults_not_errors() {
        let input = parse_share_link("::::not a url::::", 5);
        assert_eq!(input.name(), "");
    }

    #[test]
    fn overlong_parameters_are_capped_like_direct_input() {
        let long = "x".repeat(200);
        let link = share_link("https://cards.example", &long, &long, 1);
        let input = parse_share_link(&link, 5);
        assert_eq!(input.name().chars().count(), 50);
        assert_eq!(input.note().chars().count(), 100);
    }
}
