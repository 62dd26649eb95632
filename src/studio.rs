//! Orchestration: one place that owns the current card state.
//!
//! The current composited markup is an explicit field on [`Studio`] rather
//! than ambient state shared between preview and export: recomposition
//! unconditionally replaces it (last write wins), exports read whatever is
//! current, and a failed template load clears it so a stale card can never
//! be exported as if it matched the newest input.

use crate::catalog::{self, CardInput, Template, TemplateStore};
use crate::compose::compose;
use crate::config::StudioConfig;
use crate::raster::{self, CancelToken, Renderer};
use crate::share;
use crate::{debug, log};
use anyhow::{Context, Result};

/// A named, exportable PNG.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Card generator session: catalog, template store, input, current markup.
pub struct Studio<S: TemplateStore> {
    templates: Vec<Template>,
    store: S,
    renderer: Renderer,
    config: StudioConfig,
    input: CardInput,
    current_markup: Option<String>,
}

impl<S: TemplateStore> Studio<S> {
    /// A studio over the built-in five-template catalog.
    pub fn new(store: S, config: StudioConfig) -> Result<Self> {
        let mut renderer = Renderer::new().with_system_fonts();
        if let Some(path) = &config.font.path {
            let data = std::fs::read(path)
                .with_context(|| format!("failed to read font file {}", path.display()))?;
            renderer = renderer.with_font_data(data);
        }

        Ok(Self {
            templates: catalog::builtin(),
            store,
            renderer,
            config,
            input: CardInput::new(),
            current_markup: None,
        })
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn input(&self) -> &CardInput {
        &self.input
    }

    /// The latest composited markup, if the last recomposition succeeded.
    pub fn current_markup(&self) -> Option<&str> {
        self.current_markup.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.input.set_name(name);
    }

    pub fn set_note(&mut self, note: &str) {
        self.input.set_note(note);
    }

    pub fn select_template(&mut self, index: usize) {
        self.input.select_template(index, self.templates.len());
    }

    /// Restore card state from a shared deep link.
    pub fn apply_share_link(&mut self, link: &str) {
        self.input = share::parse_share_link(link, self.templates.len());
        debug!("share"; "restored input from link: template {}", self.input.template_index());
    }

    /// Fetch the selected template and recompose the card.
    ///
    /// On success the result becomes the current markup; on failure the
    /// previous markup is cleared and the error is returned, so callers can
    /// show [`catalog::placeholder_markup`] in the preview.
    pub fn recompose(&mut self) -> Result<&str> {
        self.current_markup = None;

        let template = &self.templates[self.input.template_index()];
        let raw = self
            .store
            .fetch(template)
            .with_context(|| format!("template `{}` unavailable", template.path))?;

        let composited = compose(&raw, self.input.name(), self.input.note(), &template.color)
            .with_context(|| format!("template `{}` could not be composited", template.path))?;

        debug!("compose"; "recomposed `{}` ({} bytes)", template.path, composited.len());
        self.current_markup = Some(composited);
        Ok(self.current_markup.as_deref().unwrap_or_default())
    }

    /// Export the current card as a named PNG artifact.
    ///
    /// Errors when no composition has succeeded yet ("card is not ready").
    pub fn export_png(&self) -> Result<Artifact> {
        let markup = self
            .current_markup
            .as_deref()
            .context("card is not ready for download yet")?;

        let bytes = self
            .renderer
            .rasterize(markup, self.config.render.scale)
            .context("failed to rasterize the card")?;

        let file_name = raster::card_file_name(self.input.name());
        log!("raster"; "exported {} ({} bytes)", file_name, bytes.len());
        Ok(Artifact { file_name, bytes })
    }

    /// Cancellable variant of [`Studio::export_png`] for UI loops that may
    /// supersede an in-flight export.
    pub async fn export_png_cancellable(&self, cancel: CancelToken) -> Result<Artifact> {
        let markup = self
            .current_markup
            .clone()
            .context("card is not ready for download yet")?;

        let bytes = self
            .renderer
            .render_png(markup, self.config.render.scale, cancel)
            .await
            .context("failed to rasterize the card")?;

        Ok(Artifact {
            file_name: raster::card_file_name(self.input.name()),
            bytes,
        })
    }

    /// Deep link reproducing the current card (1-based template id).
    pub fn share_link(&self) -> String {
        share::share_link(
            &self.config.share.base_url,
            self.input.name(),
            self.input.note(),
            self.input.template_index() + 1,
        )
    }

    /// The share link rendered as a QR PNG artifact.
    pub fn share_qr(&self) -> Result<Artifact> {
        let bytes = share::share_qr(&self.share_link()).context("failed to build share QR")?;
        Ok(Artifact {
            file_name: raster::qr_file_name(self.input.name()),
            bytes,
        })
    }
}
