//! Conversion between raw counts and millivolts.
//!
//! All conversions truncate, so they are not exact inverses of each other: converting a raw value
//! to millivolts and back can lose up to one millivolt step worth of counts. The round trip is only
//! exact when `vref_mv` is a multiple of [`MAX_RAW`].

use crate::MAX_RAW;

/// Converts a raw sample to millivolts for the given reference voltage.
pub fn to_analog(raw: u16, vref_mv: u16) -> u16 {
    let raw = raw.min(MAX_RAW);
    // raw <= MAX_RAW keeps the result <= vref_mv
    (u32::from(raw) * u32::from(vref_mv) / u32::from(MAX_RAW)) as u16
}

/// Converts millivolts to the raw sample the ADC would report for the given reference voltage.
///
/// Inputs above `vref_mv` saturate at [`MAX_RAW`], as does a zero reference voltage.
pub fn to_digital(millivolts: u16, vref_mv: u16) -> u16 {
    (u32::from(millivolts) * u32::from(MAX_RAW))
        .checked_div(u32::from(vref_mv))
        .map_or(MAX_RAW, |raw| raw.min(u32::from(MAX_RAW)) as u16)
}

/// Voltage represented by one count, in microvolts.
pub fn analog_resolution_uv(vref_mv: u16) -> u16 {
    // u16::MAX * 1000 / MAX_RAW still fits
    (u32::from(vref_mv) * 1000 / u32::from(MAX_RAW)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_at_3v3() {
        assert_eq!(analog_resolution_uv(3300), 805);
        assert_eq!(analog_resolution_uv(5000), 1221);
    }

    #[test]
    fn to_analog_truncates() {
        // 2048 * 3300 / 4095 = 1650.4
        assert_eq!(to_analog(2048, 3300), 1650);
        assert_eq!(to_analog(0, 3300), 0);
        assert_eq!(to_analog(MAX_RAW, 3300), 3300);
    }

    #[test]
    fn to_digital_truncates_and_saturates() {
        assert_eq!(to_digital(1650, 3300), 2047);
        assert_eq!(to_digital(3300, 3300), MAX_RAW);
        assert_eq!(to_digital(5000, 3300), MAX_RAW);
        assert_eq!(to_digital(1000, 0), MAX_RAW);
    }

    #[test]
    fn round_trip_is_exact_for_multiples_of_full_scale() {
        for vref in [4095, 8190] {
            for raw in 0..=MAX_RAW {
                assert_eq!(to_digital(to_analog(raw, vref), vref), raw);
            }
        }
    }

    #[test]
    fn round_trip_loses_at_most_one_step() {
        // one millivolt is ~1.24 counts at 3.3V, so truncating twice can cost two counts
        for raw in 0..=MAX_RAW {
            let back = to_digital(to_analog(raw, 3300), 3300);
            assert!(back <= raw);
            assert!(raw - back <= 2, "raw {raw} came back as {back}");
        }
    }

    #[test]
    fn round_trip_within_one_count_above_full_scale() {
        for raw in 0..=MAX_RAW {
            let back = to_digital(to_analog(raw, 5000), 5000);
            assert!(raw - back <= 1, "raw {raw} came back as {back}");
        }
    }
}
