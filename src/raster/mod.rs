//! The Rasterizer: converts composited vector markup into PNG bytes.
//!
//! Rendering is supersampled: the markup is drawn onto a surface `scale`
//! times larger than its logical size (4x by default), which is what gives
//! exported cards their clean edges. The decode-render-encode sequence also
//! exists as an explicit awaitable ([`Renderer::render_png`]) carrying a
//! [`CancelToken`], so a superseding input change can drop a stale in-flight
//! export instead of racing it.
//!
//! # Modules
//!
//! - [`dimensions`]: intrinsic dimension probing (viewBox, attributes, defaults)

pub mod dimensions;

use crate::debug;
use resvg::tiny_skia::{Pixmap, Transform};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use usvg::fontdb;

/// Default supersampling factor for exports.
pub const DEFAULT_SCALE: u32 = 4;

/// Rasterization failures.
#[derive(Debug, Error)]
pub enum RasterError {
    /// No usable width/height could be determined from the markup.
    #[error("could not determine usable dimensions for the card markup")]
    Dimension,

    /// The markup could not be loaded as an image source.
    #[error("markup could not be decoded as an SVG image: {0}")]
    Decode(String),

    /// PNG encoding of the rendered surface failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// A newer input superseded this render.
    #[error("rasterization was cancelled")]
    Cancelled,
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cooperative cancellation handle for an in-flight render.
///
/// Cloned freely; cancelling any clone cancels the render it was passed to.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// SVG-to-PNG renderer holding the font database used for text layers.
///
/// The embedded `@font-face` only helps browsers; native rasterization needs
/// the face loaded here or Bengali text comes out as missing glyphs.
#[derive(Debug, Clone)]
pub struct Renderer {
    fontdb: Arc<fontdb::Database>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// An empty renderer; text in the markup will not resolve to glyphs
    /// until fonts are registered.
    pub fn new() -> Self {
        Self {
            fontdb: Arc::new(fontdb::Database::new()),
        }
    }

    /// Register an in-memory font (the card face, typically woff2's TTF
    /// sibling since the raster path cannot consume woff2).
    pub fn with_font_data(mut self, data: Vec<u8>) -> Self {
        Arc::make_mut(&mut self.fontdb).load_font_data(data);
        self
    }

    /// Also resolve against system-installed fonts.
    pub fn with_system_fonts(mut self) -> Self {
        Arc::make_mut(&mut self.fontdb).load_system_fonts();
        self
    }

    /// Rasterize markup to PNG bytes at `scale`x supersampling.
    ///
    /// Physical output is logical size times `scale` (a `0 0 500 800`
    /// viewBox at scale 4 yields a 2000x3200 surface).
    pub fn rasterize(&self, markup: &str, scale: u32) -> Result<Vec<u8>, RasterError> {
        self.rasterize_inner(markup, scale, None)
    }

    /// Awaitable rasterization that observes `cancel` between stages.
    ///
    /// Runs on a blocking task; a token cancelled mid-flight resolves to
    /// [`RasterError::Cancelled`] instead of racing newer input.
    pub async fn render_png(
        &self,
        markup: String,
        scale: u32,
        cancel: CancelToken,
    ) -> Result<Vec<u8>, RasterError> {
        let renderer = self.clone();
        let task = tokio::task::spawn_blocking(move || {
            renderer.rasterize_inner(&markup, scale, Some(&cancel))
        });
        match task.await {
            Ok(result) => result,
            Err(_) => Err(RasterError::Cancelled),
        }
    }

    fn rasterize_inner(
        &self,
        markup: &str,
        scale: u32,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<u8>, RasterError> {
        let check = |stage: &str| -> Result<(), RasterError> {
            match cancel {
                Some(token) if token.is_cancelled() => {
                    debug!("raster"; "cancelled before {stage}");
                    Err(RasterError::Cancelled)
                }
                _ => Ok(()),
            }
        };

        check("probe")?;
        let (width, height) = dimensions::probe(markup)?;
        let scale = scale.max(1);
        let physical_w = (width * f64::from(scale)).round() as u32;
        let physical_h = (height * f64::from(scale)).round() as u32;
        debug!("raster"; "surface {physical_w}x{physical_h} ({width}x{height} @ {scale}x)");

        let mut pixmap = Pixmap::new(physical_w, physical_h).ok_or(RasterError::Dimension)?;

        check("decode")?;
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        let tree = usvg::Tree::from_str(markup, &options)
            .map_err(|e| RasterError::Decode(e.to_string()))?;

        check("render")?;
        let size = tree.size();
        let sx = physical_w as f32 / size.width();
        let sy = physical_h as f32 / size.height();
        resvg::render(&tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());

        check("encode")?;
        pixmap
            .encode_png()
            .map_err(|e| RasterError::Encode(e.to_string()))
    }
}

// ============================================================================
// Artifact naming
// ============================================================================

/// Download name for an exported card: `eid-card-<name>-<unix-ms>.png`.
///
/// The timestamp avoids collisions between successive exports; it does not
/// guarantee uniqueness.
pub fn card_file_name(name: &str) -> String {
    format!("eid-card-{}-{}.png", artifact_stem(name), unix_millis())
}

/// Download name for a share QR image: `eid-card-<name>-qr.png`.
pub fn qr_file_name(name: &str) -> String {
    format!("eid-card-{}-qr.png", artifact_stem(name))
}

fn artifact_stem(name: &str) -> &str {
    if name.trim().is_empty() {
        "anonymous"
    } else {
        name
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
