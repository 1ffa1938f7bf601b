use crate::config::DecoderConfig;
use crate::error::Result;
use crate::models::CanonicalBitmap;
use crate::utils::binarization::threshold_binarize;
use crate::utils::grayscale::rgb_to_grayscale;
use image::DynamicImage;

/// Decode encoded image bytes (format inferred from content)
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Resize `region` to canonical size and return its luminance, row-major
pub fn canonical_luminance(region: &DynamicImage, config: &DecoderConfig) -> Vec<u8> {
    let (width, height) = (config.canonical.width, config.canonical.height);
    let resized = region.resize_exact(width, height, config.resample.filter());
    let rgb = resized.to_rgb8();
    rgb_to_grayscale(rgb.as_raw(), width as usize, height as usize)
}

/// Resize, convert to luminance and binarize with the configured threshold
pub fn canonicalize(region: &DynamicImage, config: &DecoderConfig) -> CanonicalBitmap {
    let gray = canonical_luminance(region, config);
    threshold_binarize(
        &gray,
        config.canonical.width as usize,
        config.canonical.height as usize,
        config.binarize_threshold,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_corrupt_bytes() {
        let err = decode_image_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DecodeError::ImageDecode(_)));
    }

    #[test]
    fn test_canonicalize_size_and_threshold() {
        let mut config = DecoderConfig::default();
        config.canonical.width = 60;
        config.canonical.height = 18;
        config.binarize_threshold = 128;

        // Left half bright, right half dark, at twice the canonical size
        let img = RgbImage::from_fn(120, 36, |x, _| {
            if x < 60 {
                Rgb([220, 220, 220])
            } else {
                Rgb([20, 20, 20])
            }
        });
        let bitmap = canonicalize(&DynamicImage::ImageRgb8(img), &config);

        assert_eq!(bitmap.width(), 60);
        assert_eq!(bitmap.height(), 18);
        assert!(bitmap.as_bytes().iter().all(|&v| v == 0 || v == 255));
        assert!(bitmap.is_on(5, 9));
        assert!(!bitmap.is_on(55, 9));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut config = DecoderConfig::default();
        config.canonical.width = 4;
        config.canonical.height = 4;
        config.binarize_threshold = 100;

        let img = RgbImage::from_pixel(4, 4, Rgb([100, 100, 100]));
        let bitmap = canonicalize(&DynamicImage::ImageRgb8(img), &config);
        // (76 + 150 + 29) * 100 >> 8 == 99
        assert_eq!(bitmap.lit_count(), 0);

        config.binarize_threshold = 99;
        let img = RgbImage::from_pixel(4, 4, Rgb([100, 100, 100]));
        let bitmap = canonicalize(&DynamicImage::ImageRgb8(img), &config);
        assert_eq!(bitmap.lit_count(), 16);
    }
}
