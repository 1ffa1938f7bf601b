use crate::config::DecoderConfig;
use crate::decoder::assembler::read_bitmap;
use crate::detector::canonical::{canonicalize, decode_image_bytes};
use crate::detector::region::crop_region;
use crate::error::{DecodeError, Result};
use crate::models::{CanonicalBitmap, WeightReading};
use image::{DynamicImage, GenericImageView};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Crop, canonicalize and read an already decoded photo.
///
/// Assumes `config` has been validated.
pub(crate) fn read_image(image: &DynamicImage, config: &DecoderConfig) -> Result<WeightReading> {
    let region = crop_region(image, config.crop)?;
    let (width, height) = region.dimensions();
    debug!(width, height, "cropped display region");

    let bitmap = canonicalize(&region, config);
    debug!(
        width = bitmap.width(),
        height = bitmap.height(),
        lit_ratio = bitmap.lit_ratio(),
        "canonical bitmap ready"
    );

    let reading = read_bitmap(&bitmap, config);
    debug!(
        text = %reading.text,
        gaps = reading.gap_count(),
        "assembled reading"
    );
    Ok(reading)
}

/// Decode encoded image bytes into a weight reading
#[instrument(skip_all, fields(bytes = image_bytes.len()))]
pub fn decode(image_bytes: &[u8], config: &DecoderConfig) -> Result<WeightReading> {
    config.validate()?;
    let image = decode_image_bytes(image_bytes)?;
    read_image(&image, config)
}

/// Decode an already loaded photo
#[instrument(skip_all)]
pub fn decode_image(image: &DynamicImage, config: &DecoderConfig) -> Result<WeightReading> {
    config.validate()?;
    read_image(image, config)
}

/// Read a canonical bitmap directly, skipping crop and canonicalization.
///
/// The bitmap must have exactly the configured canonical size.
pub fn decode_bitmap(bitmap: &CanonicalBitmap, config: &DecoderConfig) -> Result<WeightReading> {
    config.validate()?;
    let (width, height) = (bitmap.width(), bitmap.height());
    if width != config.canonical.width as usize || height != config.canonical.height as usize {
        return Err(DecodeError::BitmapSize {
            width,
            height,
            expected_width: config.canonical.width,
            expected_height: config.canonical.height,
        });
    }
    Ok(read_bitmap(bitmap, config))
}

/// Decode independent images in parallel; results keep input order
pub fn decode_batch(images: &[&[u8]], config: &DecoderConfig) -> Vec<Result<WeightReading>> {
    images
        .par_iter()
        .map(|bytes| decode(bytes, config))
        .collect()
}

/// Decoder bound to one validated configuration
#[derive(Debug, Clone)]
pub struct WeightReader {
    config: DecoderConfig,
}

impl WeightReader {
    /// Validate `config` and build a reader around it
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode encoded image bytes
    #[instrument(skip_all, fields(bytes = image_bytes.len()))]
    pub fn read(&self, image_bytes: &[u8]) -> Result<WeightReading> {
        let image = decode_image_bytes(image_bytes)?;
        read_image(&image, &self.config)
    }

    /// Decode an already loaded photo
    pub fn read_image(&self, image: &DynamicImage) -> Result<WeightReading> {
        read_image(image, &self.config)
    }

    /// Decode many images in parallel; results keep input order
    pub fn read_batch(&self, images: &[&[u8]]) -> Vec<Result<WeightReading>> {
        images.par_iter().map(|bytes| self.read(bytes)).collect()
    }
}

impl Default for WeightReader {
    fn default() -> Self {
        Self {
            config: DecoderConfig::default(),
        }
    }
}
