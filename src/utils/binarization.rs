use crate::models::CanonicalBitmap;

/// Simple global threshold binarization
/// Pixels with luminance >= `threshold` become lit (255), all others 0
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> CanonicalBitmap {
    let pixel_count = width * height;
    let mut data = vec![CanonicalBitmap::OFF; pixel_count];

    for (out, &lum) in data.iter_mut().zip(gray.iter().take(pixel_count)) {
        if lum >= threshold {
            *out = CanonicalBitmap::ON;
        }
    }

    CanonicalBitmap::from_binary_parts(width, height, data)
}

/// Calculate Otsu's optimal threshold
///
/// Only used to suggest a starting `binarize_threshold` during calibration;
/// decoding always uses the configured fixed threshold.
pub fn otsu_threshold(gray: &[u8]) -> u8 {
    // Build histogram
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = gray.len() as f64;
    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;

    for threshold in 0..=255usize {
        let (mut class1_pixels, mut class1_sum) = (0u64, 0u64);
        let (mut class2_pixels, mut class2_sum) = (0u64, 0u64);

        for (intensity, &count) in histogram.iter().enumerate() {
            if intensity < threshold {
                class1_pixels += count;
                class1_sum += count * intensity as u64;
            } else {
                class2_pixels += count;
                class2_sum += count * intensity as u64;
            }
        }

        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_mean = class1_sum as f64 / class1_pixels as f64;
        let class2_mean = class2_sum as f64 / class2_pixels as f64;

        let weight1 = class1_pixels as f64 / total_pixels;
        let weight2 = class2_pixels as f64 / total_pixels;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}
