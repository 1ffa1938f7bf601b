//! Helpers shared by the `scaletool` binary, benches and tests
//!
//! Fixture rendering paints the configured probe regions directly, so a
//! rendered reading always decodes back under the same configuration.

use crate::config::DecoderConfig;
use crate::decoder::segment::pattern_for_digit;
use crate::detector::sampler::segment_probes;
use crate::detector::slots::{decimal_probe, digit_slots};
use crate::models::CanonicalBitmap;
use crate::pipeline::decode;
use image::imageops::FilterType;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use rayon::prelude::*;
use std::env;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extra pixels painted around each lit probe so resampling blur stays
/// outside the probe
pub const RENDER_MARGIN: u32 = 6;

/// Read a whole file into memory.
pub fn load_bytes<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<u8>> {
    fs::read(path)
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let avg = if gray.is_empty() {
        0
    } else {
        (sum / gray.len() as u64) as u8
    };
    GrayStats { min, max, avg }
}

/// Why a reading cannot be rendered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// More digits than configured slots
    #[error("{digits} digits do not fit in {slots} slots")]
    TooManyDigits {
        /// Digits in the text
        digits: usize,
        /// Configured slots
        slots: usize,
    },
    /// Character other than a digit or '.'
    #[error("cannot render character {0:?}")]
    UnsupportedChar(char),
    /// Decimal point not directly after the anchor slot
    #[error("decimal point must follow digit slot {0}")]
    MisplacedDecimal(usize),
}

/// Paint `text` (digits and at most one '.') into a canonical bitmap.
///
/// Digits are right-aligned in the configured slots; unused leading slots
/// stay blank.
pub fn render_reading(config: &DecoderConfig, text: &str) -> Result<CanonicalBitmap, RenderError> {
    let slots = digit_slots(config);
    let slot_count = slots.len();
    let mut digits = Vec::new();
    let mut decimal_after = None;
    for c in text.chars() {
        match c {
            '0'..='9' => digits.push(c),
            '.' if decimal_after.is_none() && !digits.is_empty() => {
                decimal_after = Some(digits.len() - 1)
            }
            other => return Err(RenderError::UnsupportedChar(other)),
        }
    }
    if digits.len() > slot_count {
        return Err(RenderError::TooManyDigits {
            digits: digits.len(),
            slots: slot_count,
        });
    }

    let lead = slot_count - digits.len();
    let anchor = config.decimal.anchor_slot;
    if let Some(after) = decimal_after {
        if after + lead != anchor {
            return Err(RenderError::MisplacedDecimal(anchor));
        }
    }

    let mut bitmap = CanonicalBitmap::new(
        config.canonical.width as usize,
        config.canonical.height as usize,
    );
    for (i, &digit) in digits.iter().enumerate() {
        let slot = slots[lead + i];
        let probes = segment_probes(slot, config.canonical.height, &config.segments);
        let Some(pattern) = pattern_for_digit(digit) else {
            return Err(RenderError::UnsupportedChar(digit));
        };
        for seg in pattern.lit_segments() {
            bitmap.fill_region(&probes[seg.index()].inflate(RENDER_MARGIN), true);
        }
    }
    if decimal_after.is_some() {
        let probe = decimal_probe(config).ok_or(RenderError::MisplacedDecimal(anchor))?;
        bitmap.fill_region(&probe.inflate(RENDER_MARGIN), true);
    }
    Ok(bitmap)
}

/// Render `text` as a full source photo of `width` x `height` pixels with
/// the display scaled into the configured crop rectangle.
pub fn render_photo(
    config: &DecoderConfig,
    text: &str,
    width: u32,
    height: u32,
) -> Result<RgbImage, RenderError> {
    let bitmap = render_reading(config, text)?;
    let crop = config.crop;
    let display = image::imageops::resize(
        &bitmap.to_gray_image(),
        crop.width,
        crop.height,
        FilterType::Nearest,
    );

    let mut photo = RgbImage::new(width, height);
    for (x, y, px) in display.enumerate_pixels() {
        let (px_x, px_y) = (crop.left + x, crop.top + y);
        if px_x < width && px_y < height {
            let v = px[0];
            photo.put_pixel(px_x, px_y, Rgb([v, v, v]));
        }
    }
    Ok(photo)
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

/// Default dataset root from environment variables.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("SCALE_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("fixtures/readings"))
}

/// Expected reading encoded in a dataset file name.
///
/// `72.5.jpg` and `72.5_kitchen.jpg` both label `72.5`.
pub fn expected_from_path<P: AsRef<Path>>(path: P) -> Option<String> {
    let path = path.as_ref();
    let name = path.file_name()?.to_string_lossy();
    let ext_len = path
        .extension()
        .map(|e| e.to_string_lossy().len() + 1)
        .unwrap_or(0);
    let stem = &name[..name.len() - ext_len];
    let label = stem.split('_').next()?;
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    Some(label.to_string())
}

/// Iterate dataset image paths, sorted, with an optional limit.
pub fn dataset_iter<P: AsRef<Path>>(root: P, limit: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if ext == "png" || ext == "jpg" || ext == "jpeg" || ext == "bmp" {
                    images.push(path);
                }
            }
        }
    }

    images
}

/// Outcome of one labeled dataset image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Decoded text matched the label
    Correct,
    /// Decoded text differed from the label
    Mismatch {
        /// Label from the file name
        expected: String,
        /// Decoded text
        got: String,
    },
    /// Decode failed with a hard error
    Failed(String),
}

/// Aggregate reading rate over a labeled dataset
#[derive(Debug, Clone, Default)]
pub struct ReadingRateReport {
    /// Per-image outcomes, in input order
    pub samples: Vec<(PathBuf, SampleOutcome)>,
}

impl ReadingRateReport {
    /// Number of evaluated images
    pub fn total(&self) -> usize {
        self.samples.len()
    }

    /// Number of images decoded to their label
    pub fn correct(&self) -> usize {
        self.samples
            .iter()
            .filter(|(_, o)| *o == SampleOutcome::Correct)
            .count()
    }

    /// Percentage of correct images
    pub fn rate(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        100.0 * self.correct() as f64 / self.total() as f64
    }
}

/// Decode every labeled image in `paths` in parallel and compare with labels.
///
/// Files without a label in their name are skipped.
pub fn reading_rate(paths: &[PathBuf], config: &DecoderConfig) -> ReadingRateReport {
    let samples = paths
        .par_iter()
        .filter_map(|path| {
            let expected = expected_from_path(path)?;
            let outcome = match load_bytes(path) {
                Ok(bytes) => match decode(&bytes, config) {
                    Ok(reading) if reading.text == expected => SampleOutcome::Correct,
                    Ok(reading) => SampleOutcome::Mismatch {
                        expected,
                        got: reading.text,
                    },
                    Err(err) => SampleOutcome::Failed(err.to_string()),
                },
                Err(err) => SampleOutcome::Failed(err.to_string()),
            };
            Some((path.clone(), outcome))
        })
        .collect();
    ReadingRateReport { samples }
}
