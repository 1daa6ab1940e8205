use super::window::{gaussian, remove_mean, segment};
use super::IntensityTrack;

/// Squared reference pressure, (2·10⁻⁵ Pa)².
const REFERENCE_POWER: f64 = 4.0e-10;
/// Reported for frames with no energy at all.
pub(super) const SILENT_DB: f64 = -300.0;
const WINDOW_PERIODS: f64 = 3.2;

/// Gaussian-weighted mean-square energy in dB at each of `times`.
pub(super) fn track_intensity(
    samples: &[f64],
    sample_rate: f64,
    times: &[f64],
    minimum_pitch: f64,
) -> IntensityTrack {
    let len = ((WINDOW_PERIODS / minimum_pitch * sample_rate).round() as usize).max(1);
    let window = gaussian(len);
    let weight_sum = window.sum();
    let values = times
        .iter()
        .map(|&t| {
            let mut frame = segment(samples, sample_rate, t, len);
            remove_mean(&mut frame);
            let power = frame.mapv(|v| v * v).dot(&window) / weight_sum.max(f64::EPSILON);
            to_decibels(power)
        })
        .collect();
    IntensityTrack::new(values)
}

fn to_decibels(power: f64) -> f64 {
    if power <= 0.0 {
        SILENT_DB
    } else {
        (10.0 * (power / REFERENCE_POWER).log10()).max(SILENT_DB)
    }
}
