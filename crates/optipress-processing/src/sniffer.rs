//! Byte-signature format sniffer.
//!
//! Classifies an uploaded buffer from its leading bytes, independent of the
//! declared content type or filename. Container checks that can hide video
//! payloads (ISO-BMFF, WebM, RIFF) run before the permissive image
//! signatures, so a disguised video is always caught first.

use optipress_core::FormatTag;

/// ISO-BMFF major brands that identify video containers.
const VIDEO_BRANDS: &[[u8; 4]] = &[
    *b"isom", *b"iso2", *b"iso4", *b"iso5", *b"iso6", *b"mp41", *b"mp42", *b"mp4 ", *b"avc1",
    *b"qt  ", *b"mov ", *b"M4V ", *b"m4v ",
];

/// ISO-BMFF major brands for AVIF images.
const AVIF_BRANDS: &[[u8; 4]] = &[*b"avif", *b"avis"];

/// ISO-BMFF major brands for HEIC/HEIF images.
const HEIC_BRANDS: &[[u8; 4]] = &[*b"heic", *b"heix", *b"hevc", *b"hevx", *b"mif1", *b"msf1"];

const WEBM_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];
const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

/// Classify the leading bytes of a candidate file.
///
/// Deterministic and allocation-free. A signature shorter than the bytes a
/// given check needs is treated as non-matching for that check; only
/// buffers under 4 bytes are unclassifiable outright.
pub fn classify(signature: &[u8]) -> FormatTag {
    if signature.len() < 4 {
        return FormatTag::TooShort;
    }

    if let Some(tag) = classify_bmff(signature) {
        return tag;
    }

    if signature[..4] == WEBM_MAGIC {
        return FormatTag::Video;
    }

    if let Some(tag) = classify_riff(signature) {
        return tag;
    }

    if signature[..2] == [0xFF, 0xD8] {
        return FormatTag::Jpeg;
    }

    if signature[..4] == PNG_MAGIC {
        return FormatTag::Png;
    }

    if signature.len() >= 6
        && (signature[..6] == *b"GIF87a" || signature[..6] == *b"GIF89a")
    {
        return FormatTag::Gif;
    }

    FormatTag::Unknown
}

/// ISO-BMFF box check: `ftyp` at bytes 4..8, major brand at 8..12. Brands
/// are matched by exact 4-byte comparison against closed tables; an
/// unlisted brand means the container is real but unrecognized.
fn classify_bmff(signature: &[u8]) -> Option<FormatTag> {
    if signature.len() < 12 || &signature[4..8] != b"ftyp" {
        return None;
    }

    let brand = [signature[8], signature[9], signature[10], signature[11]];

    if VIDEO_BRANDS.contains(&brand) {
        Some(FormatTag::Video)
    } else if AVIF_BRANDS.contains(&brand) {
        Some(FormatTag::Avif)
    } else if HEIC_BRANDS.contains(&brand) {
        Some(FormatTag::Heic)
    } else {
        Some(FormatTag::Unknown)
    }
}

/// RIFF container check: `RIFF` at 0..4, form type at 8..12 decides between
/// AVI video and WebP.
fn classify_riff(signature: &[u8]) -> Option<FormatTag> {
    if signature.len() < 12 || &signature[..4] != b"RIFF" {
        return None;
    }

    match &signature[8..12] {
        b"AVI " => Some(FormatTag::Video),
        b"WEBP" => Some(FormatTag::WebP),
        _ => Some(FormatTag::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ftyp(brand: &[u8; 4]) -> Vec<u8> {
        let mut sig = vec![0x00, 0x00, 0x00, 0x18];
        sig.extend_from_slice(b"ftyp");
        sig.extend_from_slice(brand);
        sig.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        sig
    }

    fn riff(form: &[u8; 4]) -> Vec<u8> {
        let mut sig = b"RIFF".to_vec();
        sig.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
        sig.extend_from_slice(form);
        sig
    }

    #[test]
    fn test_too_short_buffers() {
        assert_eq!(classify(&[]), FormatTag::TooShort);
        assert_eq!(classify(&[0xFF]), FormatTag::TooShort);
        assert_eq!(classify(&[0xFF, 0xD8]), FormatTag::TooShort);
        assert_eq!(classify(&[0xFF, 0xD8, 0xFF]), FormatTag::TooShort);
    }

    #[test]
    fn test_jpeg_signature() {
        assert_eq!(classify(&[0xFF, 0xD8, 0xFF, 0xE0]), FormatTag::Jpeg);
        assert_eq!(
            classify(&[0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x10]),
            FormatTag::Jpeg
        );
    }

    #[test]
    fn test_png_signature() {
        assert_eq!(
            classify(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            FormatTag::Png
        );
    }

    #[test]
    fn test_gif_signatures() {
        assert_eq!(classify(b"GIF87a\x01\x00"), FormatTag::Gif);
        assert_eq!(classify(b"GIF89a\x01\x00"), FormatTag::Gif);
        // 4 bytes of GIF header are not enough for the GIF check
        assert_eq!(classify(b"GIF8"), FormatTag::Unknown);
    }

    #[test]
    fn test_webm_is_video() {
        assert_eq!(classify(&[0x1A, 0x45, 0xDF, 0xA3]), FormatTag::Video);
    }

    #[test]
    fn test_riff_forms() {
        assert_eq!(classify(&riff(b"AVI ")), FormatTag::Video);
        assert_eq!(classify(&riff(b"WEBP")), FormatTag::WebP);
        assert_eq!(classify(&riff(b"WAVE")), FormatTag::Unknown);
    }

    #[test]
    fn test_riff_truncated_is_not_webp() {
        // RIFF header without the form type: non-matching, falls through
        assert_eq!(classify(b"RIFF\x24\x00"), FormatTag::Unknown);
    }

    #[test]
    fn test_ftyp_video_brands() {
        for brand in [b"isom", b"mp41", b"mp42", b"mp4 ", b"avc1"] {
            assert_eq!(classify(&ftyp(brand)), FormatTag::Video, "{:?}", brand);
        }
        assert_eq!(classify(&ftyp(b"qt  ")), FormatTag::Video);
        assert_eq!(classify(&ftyp(b"M4V ")), FormatTag::Video);
    }

    #[test]
    fn test_ftyp_image_brands() {
        assert_eq!(classify(&ftyp(b"avif")), FormatTag::Avif);
        assert_eq!(classify(&ftyp(b"avis")), FormatTag::Avif);
        assert_eq!(classify(&ftyp(b"heic")), FormatTag::Heic);
        assert_eq!(classify(&ftyp(b"mif1")), FormatTag::Heic);
        assert_eq!(classify(&ftyp(b"msf1")), FormatTag::Heic);
        assert_eq!(classify(&ftyp(b"hevc")), FormatTag::Heic);
    }

    #[test]
    fn test_ftyp_unrecognized_brand() {
        assert_eq!(classify(&ftyp(b"zzzz")), FormatTag::Unknown);
    }

    #[test]
    fn test_ftyp_truncated_falls_through() {
        // "ftyp" present but brand bytes missing: the BMFF check is
        // non-matching, and nothing else matches either
        let mut sig = vec![0x00, 0x00, 0x00, 0x18];
        sig.extend_from_slice(b"ftyp");
        assert_eq!(classify(&sig), FormatTag::Unknown);
    }

    #[test]
    fn test_video_checked_before_image_acceptance() {
        // An MP4 whose brand bytes happen to sit where an image check would
        // never look must still classify as video
        assert_eq!(classify(&ftyp(b"iso5")), FormatTag::Video);
    }

    #[test]
    fn test_unknown_garbage() {
        assert_eq!(classify(&[0x00, 0x01, 0x02, 0x03]), FormatTag::Unknown);
        assert_eq!(classify(b"hello world!"), FormatTag::Unknown);
    }
}
