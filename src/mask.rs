use image::imageops::{self, FilterType};
use image::GrayImage;

use crate::error::ConvertError;

/// Decode an instance mask buffer into a binary occupancy grid of exactly
/// `(width, height)`.
///
/// The buffer is decoded as a single-channel intensity image. If its embedded
/// resolution differs from the declared media resolution it is resized with
/// nearest-neighbor interpolation, which keeps mask edges hard; any smoothing
/// here would corrupt the contour trace downstream. Values above zero are
/// canonicalized to 255 so masks with intermediate gray values binarize
/// consistently.
pub fn decode_mask(bytes: &[u8], width: u32, height: u32) -> Result<GrayImage, ConvertError> {
    let decoded = image::load_from_memory(bytes)?.to_luma8();

    let mask = if decoded.dimensions() == (width, height) {
        decoded
    } else {
        log::debug!(
            "mask resolution {:?} differs from declared ({}, {}), resizing",
            decoded.dimensions(),
            width,
            height
        );
        imageops::resize(&decoded, width, height, FilterType::Nearest)
    };

    Ok(binarize(mask))
}

// Map any foreground value (> 0) to 255.
fn binarize(mut mask: GrayImage) -> GrayImage {
    for pixel in mask.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > 0 { 255 } else { 0 };
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::io::Cursor;

    fn encode_png(mask: &GrayImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        mask.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_matching_resolution_unchanged() {
        let mut mask = GrayImage::new(20, 10);
        mask.put_pixel(5, 5, Luma([255]));
        let decoded = decode_mask(&encode_png(&mask), 20, 10).unwrap();
        assert_eq!(decoded.dimensions(), (20, 10));
        assert_eq!(decoded.get_pixel(5, 5).0[0], 255);
        assert_eq!(decoded.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn resizes_mismatched_resolution_to_declared() {
        let mut mask = GrayImage::new(50, 50);
        for y in 10..30 {
            for x in 10..30 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let decoded = decode_mask(&encode_png(&mask), 100, 100).unwrap();
        assert_eq!(decoded.dimensions(), (100, 100));
        // The block scales 2x; sample well inside the scaled region.
        assert_eq!(decoded.get_pixel(40, 40).0[0], 255);
        assert_eq!(decoded.get_pixel(5, 5).0[0], 0);
    }

    #[test]
    fn intermediate_gray_values_become_foreground() {
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(1, 1, Luma([1]));
        mask.put_pixel(2, 2, Luma([128]));
        let decoded = decode_mask(&encode_png(&mask), 4, 4).unwrap();
        assert_eq!(decoded.get_pixel(1, 1).0[0], 255);
        assert_eq!(decoded.get_pixel(2, 2).0[0], 255);
        assert_eq!(decoded.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let result = decode_mask(b"not an image", 10, 10);
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }
}
