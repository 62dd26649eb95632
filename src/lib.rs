//! eidcard - greeting-card composition, rasterization, and share links.
//!
//! A user picks an SVG template, enters a name and a short note in Bengali
//! script, and gets back composited vector markup, a supersampled PNG export,
//! and a share link (optionally as a QR image) that reproduces the same card
//! from URL parameters. Nothing is persisted beyond the link itself.
//!
//! # Pipeline
//!
//! ```text
//! Template markup + CardInput
//!         │
//!         ▼
//!    ┌─────────┐
//!    │ compose │ ──► text layers + embedded font face, serialized SVG
//!    └────┬────┘
//!         │
//!         ▼
//!    ┌─────────┐
//!    │ raster  │ ──► 4x supersampled PNG bytes (on demand, never cached)
//!    └─────────┘
//!
//!    CardInput ──► share ──► deep link / QR PNG   (independent path)
//! ```
//!
//! [`Studio`] ties the pieces together and owns the single "current
//! composited markup" value explicitly, last-write-wins on every
//! recomposition.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod logger;
pub mod raster;
pub mod share;
pub mod studio;

pub use catalog::{CardInput, DirTemplateStore, FetchError, Template, TemplateStore};
pub use compose::{compose, ComposeError};
pub use config::{ConfigError, StudioConfig};
pub use raster::{CancelToken, RasterError, Renderer};
pub use share::{parse_share_link, share_link, share_qr, ShareError};
pub use studio::{Artifact, Studio};
