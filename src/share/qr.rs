//! Share-link QR rendering.
//!
//! The matrix-barcode algorithm itself is delegated to the `qrcode` crate;
//! this module only fixes the product's parameters: error-correction level
//! H, at least 250px a side with a quiet zone, `#333333` foreground on
//! white, PNG output.

use super::ShareError;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Minimum rendered size in pixels (quiet zone included).
const QR_SIZE: u32 = 250;
/// Foreground gray level (`#333333`).
const QR_DARK: u8 = 0x33;

/// Render a share link as a QR image, returned as PNG bytes.
pub fn share_qr(link: &str) -> Result<Vec<u8>, ShareError> {
    let code = QrCode::with_error_correction_level(link.as_bytes(), EcLevel::H)
        .map_err(|e| ShareError::Qr(e.to_string()))?;

    let img = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .min_dimensions(QR_SIZE, QR_SIZE)
        .dark_color(Luma([QR_DARK]))
        .light_color(Luma([0xff]))
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ShareError::Encode(e.to_string()))?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::share_link;

    #[test]
    fn renders_at_least_250px_square() {
        let link = share_link("https://cards.example", "নাম", "ঈদ মোবারক", 2);
        let png = share_qr(&link).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert!(img.width() >= QR_SIZE);
        assert_eq!(img.width(), img.height());
    }

    #[test]
    fn foreground_is_333333_gray() {
        let png = share_qr("https://cards.example/?name=x&id=1").unwrap();
        let img = image::load_from_memory(&png).unwrap().into_luma8();
        // A finder pattern guarantees dark modules exist.
        assert!(img.pixels().any(|p| p.0[0] == QR_DARK));
        assert!(img.pixels().any(|p| p.0[0] == 0xff));
        assert!(img.pixels().all(|p| p.0[0] == QR_DARK || p.0[0] == 0xff));
    }

    #[test]
    fn overlong_payload_is_a_qr_error_not_a_panic() {
        let huge = "x".repeat(8000);
        assert!(matches!(share_qr(&huge), Err(ShareError::Qr(_))));
    }
}
