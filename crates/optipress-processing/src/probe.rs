//! Best-effort pixel dimension probe for accepted uploads.

use image::ImageReader;
use std::io::Cursor;

/// Read the pixel dimensions of an image buffer without a full decode.
///
/// Returns `None` when the codec stack cannot parse the bytes — which can
/// happen for files accepted through the validation fallback path (e.g.
/// HEIC variants); the preview then renders without dimensions.
pub fn probe_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
