//! Per-frame usability rules.
//!
//! The engine reports "nothing measured" with sentinels: a non-positive pitch or
//! intensity, a NaN formant. Non-finite readings of any kind count as absent.
//! These helpers are the only place those sentinels
//! are interpreted; everything downstream sees `Option`.

use super::distance::FormantTriple;

/// A finite positive pitch in Hz, or `None` for unvoiced/undetected frames.
///
/// No range check against the pitch floor/ceiling is applied here.
pub fn voiced_pitch(raw_hz: f64) -> Option<f64> {
    positive(raw_hz)
}

/// Intensity in dB, or `None` for silent/undetected frames.
pub fn audible_intensity(raw_db: f64) -> Option<f64> {
    positive(raw_db)
}

/// A complete triple, or `None` when any component is NaN or infinite.
pub fn complete_formants(raw: [f64; 3]) -> Option<FormantTriple> {
    raw.iter()
        .all(|value| value.is_finite())
        .then(|| FormantTriple::from(raw))
}

/// Formants usable for classification at one instant: present only when the
/// frame is voiced and all three readings are valid.
pub fn gated_formants(pitch: Option<f64>, raw: impl FnOnce() -> [f64; 3]) -> Option<FormantTriple> {
    pitch?;
    complete_formants(raw())
}

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}
