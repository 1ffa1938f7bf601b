//! Segment probing for one digit slot
//!
//! Each segment is tested by averaging a small rectangle around its nominal
//! position. The probe size is the main accuracy/noise knob: a larger probe
//! needs more of the stroke lit before it registers.
use crate::config::{DecoderConfig, DigitSlot, SegmentGeometry};
use crate::detector::slots::decimal_probe;
use crate::models::{CanonicalBitmap, ProbeRegion, SegmentPattern};

/// Probe rectangles for one slot, in order A..G
pub fn segment_probes(
    slot: DigitSlot,
    canonical_height: u32,
    geometry: &SegmentGeometry,
) -> [ProbeRegion; 7] {
    let slot_x = slot.x as f32;
    let slot_w = slot.width as f32;
    let height = canonical_height as f32;
    let probe_w = geometry.probe_width * slot_w;
    let probe_h = geometry.probe_height * height;

    geometry.centers.map(|c| {
        ProbeRegion::centered(slot_x + c.cx * slot_w, c.cy * height, probe_w, probe_h)
    })
}

/// Mean pixel value inside `probe`.
///
/// Pixels outside the bitmap are left out of the average; a probe with no
/// pixel inside the bitmap has mean 0.
pub fn mean_brightness(bitmap: &CanonicalBitmap, probe: &ProbeRegion) -> f64 {
    let Some((x0, y0, x1, y1)) = probe.clip(bitmap.width(), bitmap.height()) else {
        return 0.0;
    };

    let width = bitmap.width();
    let data = bitmap.as_bytes();
    let mut sum = 0u64;
    for y in y0..y1 {
        let row = y * width;
        sum += data[row + x0..row + x1].iter().map(|&v| v as u64).sum::<u64>();
    }
    let count = ((x1 - x0) * (y1 - y0)) as u64;
    sum as f64 / count as f64
}

/// Activation rule: lit when `mean / 255` is strictly above `threshold`
#[inline]
pub fn is_active(mean: f64, threshold: f64) -> bool {
    mean / 255.0 > threshold
}

/// Probe results for one digit slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSample {
    /// Probe rectangles, A..G
    pub probes: [ProbeRegion; 7],
    /// Mean brightness per probe, A..G
    pub means: [f64; 7],
    /// Thresholded pattern
    pub pattern: SegmentPattern,
}

/// Probe all seven segments of `slot`
pub fn sample_slot(bitmap: &CanonicalBitmap, slot: DigitSlot, config: &DecoderConfig) -> SlotSample {
    let probes = segment_probes(slot, config.canonical.height, &config.segments);
    let means = probes.map(|p| mean_brightness(bitmap, &p));
    let pattern = SegmentPattern::from_states(means.map(|m| is_active(m, config.activation_threshold)));
    SlotSample {
        probes,
        means,
        pattern,
    }
}

/// Mean brightness of the decimal-point probe, `None` if the configuration
/// places no decimal probe
pub fn sample_decimal(bitmap: &CanonicalBitmap, config: &DecoderConfig) -> Option<f64> {
    decimal_probe(config).map(|probe| mean_brightness(bitmap, &probe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Segment;

    #[test]
    fn test_default_probe_layout() {
        let config = DecoderConfig::default();
        let probes = segment_probes(config.slots[0], 180, &config.segments);

        // A: centered at (100, 18), 40x18
        assert_eq!(probes[Segment::A.index()], ProbeRegion::new(80, 9, 40, 18));
        // B: right side, upper half
        assert_eq!(probes[Segment::B.index()], ProbeRegion::new(150, 45, 40, 18));
        // E: left side, lower half
        assert_eq!(probes[Segment::E.index()], ProbeRegion::new(10, 117, 40, 18));
        // G: middle
        assert_eq!(probes[Segment::G.index()], ProbeRegion::new(80, 81, 40, 18));
    }

    #[test]
    fn test_probes_follow_slot_offset() {
        let config = DecoderConfig::default();
        let first = segment_probes(config.slots[0], 180, &config.segments);
        let third = segment_probes(config.slots[2], 180, &config.segments);
        for (a, b) in first.iter().zip(third.iter()) {
            assert_eq!(b.x - a.x, 400);
            assert_eq!(a.y, b.y);
        }
    }

    #[test]
    fn test_probes_do_not_overlap() {
        let config = DecoderConfig::default();
        let probes = segment_probes(config.slots[1], 180, &config.segments);
        for (i, a) in probes.iter().enumerate() {
            for b in probes.iter().skip(i + 1) {
                let disjoint = a.x + a.width as i32 <= b.x
                    || b.x + b.width as i32 <= a.x
                    || a.y + a.height as i32 <= b.y
                    || b.y + b.height as i32 <= a.y;
                assert!(disjoint, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_mean_brightness() {
        let mut bitmap = CanonicalBitmap::new(10, 10);
        bitmap.fill_region(&ProbeRegion::new(0, 0, 2, 2), true);

        assert_eq!(mean_brightness(&bitmap, &ProbeRegion::new(0, 0, 2, 2)), 255.0);
        assert_eq!(mean_brightness(&bitmap, &ProbeRegion::new(0, 0, 4, 2)), 127.5);
        assert_eq!(mean_brightness(&bitmap, &ProbeRegion::new(5, 5, 2, 2)), 0.0);
    }

    #[test]
    fn test_mean_excludes_outside_pixels() {
        let mut bitmap = CanonicalBitmap::new(10, 10);
        bitmap.fill_region(&ProbeRegion::new(0, 0, 2, 2), true);

        // Only the 2x2 lit corner lies inside the bitmap
        let probe = ProbeRegion::new(-2, -2, 4, 4);
        assert_eq!(mean_brightness(&bitmap, &probe), 255.0);

        let outside = ProbeRegion::new(20, 20, 4, 4);
        assert_eq!(mean_brightness(&bitmap, &outside), 0.0);
    }

    #[test]
    fn test_activation_is_strict() {
        // 0.75 * 255
        assert!(!is_active(191.25, 0.75));
        assert!(is_active(192.25, 0.75));
        assert!(!is_active(0.0, 0.0));
        assert!(is_active(1.0, 0.0));
    }

    #[test]
    fn test_activation_boundary_on_pixels() {
        // 2x2 probe with exactly three lit pixels: ratio 0.75
        let mut bitmap = CanonicalBitmap::new(2, 2);
        bitmap.fill_region(&ProbeRegion::new(0, 0, 2, 1), true);
        bitmap.fill_region(&ProbeRegion::new(0, 1, 1, 1), true);
        let probe = ProbeRegion::new(0, 0, 2, 2);
        let mean = mean_brightness(&bitmap, &probe);
        assert_eq!(mean / 255.0, 0.75);
        assert!(!is_active(mean, 0.75));

        bitmap.fill_region(&ProbeRegion::new(1, 1, 1, 1), true);
        assert!(is_active(mean_brightness(&bitmap, &probe), 0.75));
    }

    #[test]
    fn test_sample_slot_pattern() {
        let config = DecoderConfig::default();
        let slot = config.slots[0];
        let probes = segment_probes(slot, config.canonical.height, &config.segments);

        let mut bitmap = CanonicalBitmap::new(600, 180);
        for seg in [Segment::B, Segment::C] {
            bitmap.fill_region(&probes[seg.index()], true);
        }
        let sample = sample_slot(&bitmap, slot, &config);
        assert_eq!(sample.pattern.to_string(), "0110000");
        assert_eq!(sample.means[Segment::B.index()], 255.0);
        assert_eq!(sample.means[Segment::A.index()], 0.0);
    }

    #[test]
    fn test_sample_decimal() {
        let config = DecoderConfig::default();
        let mut bitmap = CanonicalBitmap::new(600, 180);
        assert_eq!(sample_decimal(&bitmap, &config), Some(0.0));
        bitmap.fill_region(&decimal_probe(&config).unwrap(), true);
        assert_eq!(sample_decimal(&bitmap, &config), Some(255.0));
    }
}
