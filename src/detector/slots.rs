use crate::config::{DecoderConfig, DigitSlot};
use crate::models::ProbeRegion;

/// Digit positions in canonical coordinates, left to right
pub fn digit_slots(config: &DecoderConfig) -> &[DigitSlot] {
    &config.slots
}

/// Probe for the decimal point, centered `offset_x` pixels right of the
/// anchor slot's right edge.
///
/// `None` when `anchor_slot` names no configured slot or the slot's right
/// edge does not fit in `u32`.
pub fn decimal_probe(config: &DecoderConfig) -> Option<ProbeRegion> {
    let dp = &config.decimal;
    let anchor = digit_slots(config).get(dp.anchor_slot)?;
    let anchor_right = anchor.x.checked_add(anchor.width)?;
    let cx = anchor_right as f32 + dp.offset_x as f32;
    let cy = dp.center_y * config.canonical.height as f32;
    Some(ProbeRegion::centered(cx, cy, dp.width as f32, dp.height as f32))
}
