//! Deep links and QR images for sharing a card.
//!
//! A share link encodes the full card state (`name`, 1-based template `id`,
//! optional `note`) in query parameters, so opening it reproduces the card
//! with no server storage involved. The QR path just wraps that link in a
//! scannable image.
//!
//! # Modules
//!
//! - [`link`]: deep-link construction and permissive parsing
//! - [`qr`]: matrix-barcode rendering (delegated to the `qrcode` crate)

pub mod link;
pub mod qr;

pub use link::{parse_share_link, share_link};
pub use qr::share_qr;

use thiserror::Error;

/// Share-path failures (QR generation only; link building is total).
#[derive(Debug, Error)]
pub enum ShareError {
    /// The link could not be encoded as a QR symbol (far too long, usually).
    #[error("QR payload rejected: {0}")]
    Qr(String),

    /// Encoding the QR image as PNG failed.
    #[error("QR image encoding failed: {0}")]
    Encode(String),
}
