//! Crop the source photo down to the display area
use crate::config::CropRect;
use crate::error::{DecodeError, Result};
use image::{DynamicImage, GenericImageView};

/// Return exactly the pixels inside `rect`.
///
/// Fails with [`DecodeError::OutOfBounds`] when any part of the rectangle lies
/// outside the image; nothing is clamped.
pub fn crop_region(image: &DynamicImage, rect: CropRect) -> Result<DynamicImage> {
    let (image_width, image_height) = image.dimensions();
    let right = rect.left as u64 + rect.width as u64;
    let bottom = rect.top as u64 + rect.height as u64;
    if right > image_width as u64 || bottom > image_height as u64 {
        return Err(DecodeError::OutOfBounds {
            rect,
            image_width,
            image_height,
        });
    }
    Ok(image.crop_imm(rect.left, rect.top, rect.width, rect.height))
}
