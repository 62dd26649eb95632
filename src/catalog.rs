//! Template catalog and card input state.
//!
//! Templates are immutable `{path, color, thumbnail}` entries; the built-in
//! catalog mirrors the five cards the product ships with. Retrieval of the
//! raw template markup goes through [`TemplateStore`] so the rest of the
//! crate stays independent of where templates actually live.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum accepted characters for the display name.
pub const NAME_MAX_CHARS: usize = 50;
/// Maximum accepted characters for the note (newlines included).
pub const NOTE_MAX_CHARS: usize = 100;

// ============================================================================
// Template
// ============================================================================

/// A reusable background vector image plus its accent color and thumbnail.
///
/// Loaded once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Location of the SVG markup, relative to the template store root.
    pub path: String,
    /// Accent color used to fill the injected text layers.
    pub color: String,
    /// Optional preview image (defaults to the template itself).
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl Template {
    pub fn new(path: impl Into<String>, color: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            thumbnail: Some(path.clone()),
            path,
            color: color.into(),
        }
    }
}

/// The built-in catalog of five templates.
pub fn builtin() -> Vec<Template> {
    vec![
        Template::new("templates/template1.svg", "#3f3b3a"),
        Template::new("templates/template2.svg", "#ffb400"),
        Template::new("templates/template3.svg", "#ffffff"),
        Template::new("templates/template4.svg", "#ffffff"),
        Template::new("templates/template5.svg", "#3f3b3a"),
    ]
}

// ============================================================================
// Card Input
// ============================================================================

/// User-entered card state: display name, multi-line note, template choice.
///
/// Empty strings are valid and suppress their respective text layer. Length
/// caps are enforced in characters, not bytes, since inputs are Bengali
/// script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardInput {
    name: String,
    note: String,
    template_index: usize,
}

impl CardInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// 0-based index into the catalog.
    pub fn template_index(&self) -> usize {
        self.template_index
    }

    /// Set the display name, truncated to [`NAME_MAX_CHARS`] characters.
    pub fn set_name(&mut self, name: &str) {
        self.name = truncate_chars(name, NAME_MAX_CHARS);
    }

    /// Set the note, truncated to [`NOTE_MAX_CHARS`] characters.
    pub fn set_note(&mut self, note: &str) {
        self.note = truncate_chars(note, NOTE_MAX_CHARS);
    }

    /// Select a template. Out-of-range indices fall back to the first entry
    /// rather than erroring, matching the permissive deep-link behavior.
    pub fn select_template(&mut self, index: usize, catalog_len: usize) {
        self.template_index = if index < catalog_len { index } else { 0 };
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ============================================================================
// Template Store
// ============================================================================

/// Template retrieval failed (the card shows a placeholder instead).
#[derive(Debug, Error)]
#[error("failed to fetch template `{path}`")]
pub struct FetchError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

/// Source of raw template markup.
///
/// Keeps the compositor independent of where templates live; card logic only
/// ever sees markup strings.
pub trait TemplateStore {
    fn fetch(&self, template: &Template) -> Result<String, FetchError>;
}

/// Filesystem-backed template store rooted at a directory.
#[derive(Debug, Clone)]
pub struct DirTemplateStore {
    root: PathBuf,
}

impl DirTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateStore for DirTemplateStore {
    fn fetch(&self, template: &Template) -> Result<String, FetchError> {
        let path = self.root.join(&template.path);
        fs::read_to_string(&path).map_err(|source| FetchError {
            path: template.path.clone(),
            source,
        })
    }
}

/// Visible substitute shown in place of a card whose template failed to load.
pub fn placeholder_markup() -> &'static str {
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 500 800"><rect width="500" height="800" fill="#fef2f2"/><text x="250" y="400" text-anchor="middle" font-size="24" fill="#ef4444">Error loading template</text></svg>"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_has_five_entries() {
        let catalog = builtin();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog[0].color, "#3f3b3a");
        assert_eq!(catalog[1].color, "#ffb400");
        assert_eq!(catalog[4].path, "templates/template5.svg");
        assert!(catalog.iter().all(|t| t.thumbnail.is_some()));
    }

    #[test]
    fn name_cap_counts_characters_not_bytes() {
        let mut input = CardInput::new();
        // 60 Bengali characters, well over 50 but far more bytes
        let long: String = "ন".repeat(60);
        input.set_name(&long);
        assert_eq!(input.name().chars().count(), NAME_MAX_CHARS);
    }

    #[test]
    fn note_cap_applies() {
        let mut input = CardInput::new();
        input.set_note(&"a\n".repeat(80));
        assert_eq!(input.note().chars().count(), NOTE_MAX_CHARS);
    }

    #[test]
    fn out_of_range_template_falls_back_to_first() {
        let mut input = CardInput::new();
        input.select_template(3, 5);
        assert_eq!(input.template_index(), 3);
        input.select_template(9, 5);
        assert_eq!(input.template_index(), 0);
    }

    #[test]
    fn dir_store_fetches_markup() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        let mut f = std::fs::File::create(templates.join("template1.svg")).unwrap();
        write!(f, r#"<svg viewBox="0 0 500 800"></svg>"#).unwrap();

        let store = DirTemplateStore::new(dir.path());
        let markup = store.fetch(&builtin()[0]).unwrap();
        assert!(markup.starts_with("<svg"));
    }

    #[test]
    fn dir_store_missing_template_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirTemplateStore::new(dir.path());
        let err = store.fetch(&builtin()[2]).unwrap_err();
        assert_eq!(err.path, "templates/template3.svg");
    }
}
