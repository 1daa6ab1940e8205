use anyhow::{ensure, Result};
use ndarray::Array1;

/// Upper bound on frames per track; about 28 hours at the default 10 ms step.
pub(super) const MAX_FRAMES: usize = 10_000_000;

/// Regular grid of analysis frame centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct FrameGrid {
    pub first: f64,
    pub step: f64,
    pub count: usize,
}

impl FrameGrid {
    /// As many frames as fit a window of `window` seconds, centred on the sound.
    ///
    /// Fails when the grid would exceed [`MAX_FRAMES`].
    pub fn centred(duration: f64, window: f64, step: f64) -> Result<Self> {
        ensure!(
            step.is_finite() && step > 0.0,
            "analysis step must be positive, got {step}"
        );
        if !(duration >= window) {
            return Ok(Self {
                first: 0.0,
                step,
                count: 0,
            });
        }
        let intervals = ((duration - window) / step + 1e-9).floor();
        ensure!(
            intervals.is_finite() && intervals < MAX_FRAMES as f64,
            "a {step}s step over {duration:.3}s would exceed {MAX_FRAMES} frames"
        );
        let count = intervals as usize + 1;
        let first = 0.5 * (duration - (count - 1) as f64 * step);
        Ok(Self { first, step, count })
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(move |i| self.first + i as f64 * self.step)
    }
}

/// Copy `len` samples centred on `centre_time`, zero-padded past either edge.
pub(super) fn segment(samples: &[f64], sample_rate: f64, centre_time: f64, len: usize) -> Array1<f64> {
    let centre = (centre_time * sample_rate).round() as isize;
    let start = centre - (len / 2) as isize;
    Array1::from_iter((0..len).map(|offset| {
        let idx = start + offset as isize;
        if idx >= 0 {
            samples.get(idx as usize).copied().unwrap_or(0.0)
        } else {
            0.0
        }
    }))
}

pub(super) fn hann(len: usize) -> Array1<f64> {
    let denom = (len.max(2) - 1) as f64;
    Array1::from_iter(
        (0..len).map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / denom).cos()),
    )
}

/// Gaussian window reaching zero at both ends.
pub(super) fn gaussian(len: usize) -> Array1<f64> {
    let edge = (-12.0_f64).exp();
    let mid = 0.5 * (len as f64 - 1.0);
    let width = (len.max(2) - 1) as f64;
    Array1::from_iter((0..len).map(|i| {
        let x = (i as f64 - mid) / width;
        ((-48.0 * x * x).exp() - edge) / (1.0 - edge)
    }))
}

pub(super) fn remove_mean(frame: &mut Array1<f64>) {
    if let Some(mean) = frame.mean() {
        frame.mapv_inplace(|v| v - mean);
    }
}
