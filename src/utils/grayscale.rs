//! Convert RGB image to single-channel luminance
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    lum.min(255) as u8
}

/// Convert packed RGB bytes (3 per pixel) to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];
    rgb_to_grayscale_with_buffer(rgb, width, height, &mut gray);
    gray
}

/// Convert RGB to grayscale into a pre-allocated buffer
///
/// # Returns
/// Number of pixels written (width * height, capped by the input length)
pub fn rgb_to_grayscale_with_buffer(
    rgb: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> usize {
    let pixel_count = (width * height).min(rgb.len() / 3).min(output.len());
    for (out, px) in output[..pixel_count]
        .iter_mut()
        .zip(rgb.chunks_exact(3))
    {
        *out = luminance(px[0], px[1], px[2]);
    }
    pixel_count
}
