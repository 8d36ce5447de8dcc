//! PIX payment code detection from QR codes embedded in bill images.

use image::GenericImageView;
use tracing::{debug, info, warn};

use crate::error::QrError;

/// Payload format indicator that opens every EMV merchant-presented QR code.
pub const EMV_PREFIX: &str = "00020";

/// Domain identifier of the Brazilian Central Bank PIX arrangement.
pub const PIX_KEY_DOMAIN: &str = "BR.GOV.BCB.PIX";

/// Whether a decoded QR payload is a PIX copy-paste code.
pub fn is_pix_payload(payload: &str) -> bool {
    payload.starts_with(EMV_PREFIX) || payload.contains(PIX_KEY_DOMAIN)
}

/// Return the payload verbatim if it is a PIX code.
pub fn classify_qr_payload(payload: &str) -> Option<String> {
    is_pix_payload(payload).then(|| payload.to_string())
}

/// Decode every readable QR code in an encoded image.
///
/// Grids that are found but fail to decode are skipped. Returns
/// [`QrError::NoCode`] when nothing could be decoded at all.
pub fn decode_qr_payloads(image: &[u8]) -> Result<Vec<String>, QrError> {
    let image = image::load_from_memory(image)?;
    let (width, height) = image.dimensions();
    let luma = image.to_luma8();

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        width as usize,
        height as usize,
        |x, y| luma.get_pixel(x as u32, y as u32).0[0],
    );

    let grids = prepared.detect_grids();
    debug!("Found {} QR grid candidates in {}x{} image", grids.len(), width, height);

    let mut payloads = Vec::new();
    let mut last_error = None;
    for grid in grids {
        match grid.decode() {
            Ok((_meta, content)) => payloads.push(content),
            Err(e) => last_error = Some(format!("{:?}", e)),
        }
    }

    match (payloads.is_empty(), last_error) {
        (true, Some(e)) => Err(QrError::Decode(e)),
        (true, None) => Err(QrError::NoCode),
        (false, _) => Ok(payloads),
    }
}

/// Find a PIX payment code in an image.
///
/// Never fails: unreadable images, missing codes and non-PIX payloads all
/// yield `None`. When several codes are present the first PIX one wins.
pub fn detect_payment_qr(image: &[u8]) -> Option<String> {
    let payloads = match decode_qr_payloads(image) {
        Ok(payloads) => payloads,
        Err(QrError::NoCode) => {
            debug!("No QR code found");
            return None;
        }
        Err(e) => {
            warn!("QR detection failed: {}", e);
            return None;
        }
    };

    let pix = payloads.iter().find_map(|p| classify_qr_payload(p));
    match &pix {
        Some(code) => info!("Detected PIX code ({} chars)", code.len()),
        None => debug!("{} QR payload(s) decoded, none is a PIX code", payloads.len()),
    }
    pix
}
