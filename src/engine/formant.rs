use anyhow::Result;
use ndarray::Array1;
use rustfft::num_complex::Complex64;

use super::window::{gaussian, remove_mean, segment, FrameGrid};
use super::FormantTrack;

const MAX_ROOT_ITERATIONS: usize = 500;
const ROOT_TOLERANCE: f64 = 1e-12;
/// Candidates this close to 0 Hz or to Nyquist are discarded.
const EDGE_MARGIN_HZ: f64 = 50.0;

#[derive(Debug, Clone, Copy)]
pub(super) struct BurgSettings {
    pub max_formant: f64,
    pub formant_count: usize,
    /// Effective window length; the taper actually spans twice this.
    pub window_length: f64,
    pub pre_emphasis_from: f64,
}

/// Formant tracking by Burg LPC on pre-emphasised, Gaussian-windowed frames.
///
/// `samples` must already be at `2 * max_formant` Hz.
pub(super) fn track_formants(
    samples: &[f64],
    sample_rate: f64,
    time_step: f64,
    settings: &BurgSettings,
) -> Result<FormantTrack> {
    let mut emphasised = samples.to_vec();
    pre_emphasise(&mut emphasised, sample_rate, settings.pre_emphasis_from);

    let duration = samples.len() as f64 / sample_rate;
    let window_seconds = 2.0 * settings.window_length;
    let grid = FrameGrid::centred(duration, window_seconds, time_step)?;
    let len = (window_seconds * sample_rate).round() as usize;
    let window = gaussian(len);
    let order = 2 * settings.formant_count;

    let frames = grid
        .times()
        .map(|t| {
            let mut frame = segment(&emphasised, sample_rate, t, len);
            remove_mean(&mut frame);
            frame *= &window;
            frame_formants(&frame, sample_rate, order)
        })
        .collect();
    Ok(FormantTrack::new(grid.first, time_step, frames))
}

fn pre_emphasise(samples: &mut [f64], sample_rate: f64, from_frequency: f64) {
    if from_frequency <= 0.0 {
        return;
    }
    let alpha = (-2.0 * std::f64::consts::PI * from_frequency / sample_rate).exp();
    for i in (1..samples.len()).rev() {
        samples[i] -= alpha * samples[i - 1];
    }
}

fn frame_formants(frame: &Array1<f64>, sample_rate: f64, order: usize) -> [f64; 3] {
    let mut formants = [f64::NAN; 3];
    let Some(coefficients) = burg(&frame.to_vec(), order) else {
        return formants;
    };
    let nyquist = 0.5 * sample_rate;
    let mut candidates: Vec<f64> = polynomial_roots(&coefficients)
        .into_iter()
        .filter(|root| root.im > 0.0)
        .map(|root| root.arg() * sample_rate / (2.0 * std::f64::consts::PI))
        .filter(|f| *f > EDGE_MARGIN_HZ && *f < nyquist - EDGE_MARGIN_HZ)
        .collect();
    candidates.sort_by(f64::total_cmp);
    for (slot, frequency) in formants.iter_mut().zip(candidates) {
        *slot = frequency;
    }
    formants
}

/// Burg's method: prediction coefficients `a` with x[n] ≈ Σ a[k]·x[n-1-k].
fn burg(x: &[f64], order: usize) -> Option<Vec<f64>> {
    let n = x.len();
    if order == 0 || n <= order + 1 || x.iter().all(|v| *v == 0.0) {
        return None;
    }
    let mut a = vec![0.0; order];
    let mut previous = vec![0.0; order];
    let mut forward = x[..n - 1].to_vec();
    let mut backward = x[1..].to_vec();

    for k in 0..order {
        let span = n - k - 1;
        let (mut num, mut denom) = (0.0, 0.0);
        for j in 0..span {
            num += forward[j] * backward[j];
            denom += forward[j] * forward[j] + backward[j] * backward[j];
        }
        if denom <= 0.0 {
            return None;
        }
        a[k] = 2.0 * num / denom;
        for i in 0..k {
            a[i] = previous[i] - a[k] * previous[k - 1 - i];
        }
        if k + 1 == order {
            break;
        }
        previous[..=k].copy_from_slice(&a[..=k]);
        for j in 0..span - 1 {
            forward[j] -= previous[k] * backward[j];
            backward[j] = backward[j + 1] - previous[k] * forward[j + 1];
        }
    }
    a.iter().all(|c| c.is_finite()).then_some(a)
}

/// Roots of z^p − a[0]·z^(p−1) − … − a[p−1], by Durand–Kerner iteration.
/// Roots outside the unit circle are reflected inside; frequency is unchanged.
fn polynomial_roots(a: &[f64]) -> Vec<Complex64> {
    let degree = a.len();
    let coefficients: Vec<Complex64> = std::iter::once(1.0)
        .chain(a.iter().map(|c| -c))
        .map(|c| Complex64::new(c, 0.0))
        .collect();
    let evaluate = |z: Complex64| {
        coefficients
            .iter()
            .fold(Complex64::new(0.0, 0.0), |acc, c| acc * z + c)
    };

    let seed = Complex64::new(0.4, 0.9);
    let mut roots: Vec<Complex64> = (0..degree).map(|k| seed.powu(k as u32)).collect();
    for _ in 0..MAX_ROOT_ITERATIONS {
        let mut largest_step = 0.0_f64;
        for i in 0..degree {
            let denominator = (0..degree)
                .filter(|&j| j != i)
                .fold(Complex64::new(1.0, 0.0), |acc, j| acc * (roots[i] - roots[j]));
            if denominator.norm() < f64::MIN_POSITIVE {
                continue;
            }
            let step = evaluate(roots[i]) / denominator;
            roots[i] -= step;
            largest_step = largest_step.max(step.norm());
        }
        if largest_step < ROOT_TOLERANCE {
            break;
        }
    }
    roots
        .into_iter()
        .map(|z| if z.norm() > 1.0 { 1.0 / z.conj() } else { z })
        .collect()
}
