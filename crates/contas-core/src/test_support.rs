//! Fixtures shared by unit tests.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};

pub const PIX_PAYLOAD: &str = "00020126580014BR.GOV.BCB.PIX0136123e4567-e12b-12d1-a456-4266554400005204000053039865802BR5913Fulano de Tal6008BRASILIA62070503***63041D3D";

const MODULE_PX: u32 = 8;
const QUIET_ZONE: u32 = 4;

/// Render `content` as a QR code PNG.
pub fn qr_png(content: &str) -> Vec<u8> {
    let code = QrCode::new(content.as_bytes()).unwrap();
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let side = (modules + 2 * QUIET_ZONE) * MODULE_PX;

    let img = GrayImage::from_fn(side, side, |x, y| {
        let mx = (x / MODULE_PX).checked_sub(QUIET_ZONE);
        let my = (y / MODULE_PX).checked_sub(QUIET_ZONE);
        match (mx, my) {
            (Some(mx), Some(my)) if mx < modules && my < modules => {
                match colors[(my * modules + mx) as usize] {
                    Color::Dark => Luma([0]),
                    Color::Light => Luma([255]),
                }
            }
            _ => Luma([255]),
        }
    });

    encode(img)
}

/// A white PNG with no QR code.
pub fn blank_png() -> Vec<u8> {
    encode(GrayImage::from_pixel(120, 80, Luma([255])))
}

fn encode(img: GrayImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}
