use std::sync::Arc;

use anyhow::{bail, ensure, Result};
use ndarray::Array1;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use super::window::{hann, remove_mean, segment, FrameGrid};
use super::{ExtractionParams, PitchTrack};

pub(super) const PERIODS_PER_WINDOW: f64 = 3.0;
const VOICING_THRESHOLD: f64 = 0.45;
const SILENCE_THRESHOLD: f64 = 0.03;
const OCTAVE_COST: f64 = 0.01;

/// Autocorrelation pitch tracker.
///
/// Each frame's autocorrelation is divided by the window's own autocorrelation
/// so that long lags are not penalised by the taper. Among the local maxima in
/// the allowed lag range the strongest wins, with a small cost per octave down.
/// Frames below the voicing or silence thresholds report 0 Hz.
pub(super) fn track_pitch(
    samples: &[f64],
    sample_rate: f64,
    params: &ExtractionParams,
) -> Result<PitchTrack> {
    ensure!(sample_rate > 0.0, "pitch tracking needs a positive sample rate");
    let duration = samples.len() as f64 / sample_rate;
    let window_seconds = PERIODS_PER_WINDOW / params.pitch_floor;
    let grid = FrameGrid::centred(duration, window_seconds, params.time_step)?;
    if grid.count == 0 {
        bail!(
            "sound of {duration:.3}s is shorter than the {window_seconds:.3}s pitch analysis window"
        );
    }

    let tracker = Autocorrelator::new(sample_rate, window_seconds, params);
    let global_peak = samples.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));

    let times: Vec<f64> = grid.times().collect();
    let frequencies = times
        .iter()
        .map(|&t| tracker.frame_pitch(samples, t, global_peak))
        .collect();
    Ok(PitchTrack::new(times, frequencies))
}

struct Autocorrelator {
    sample_rate: f64,
    pitch_floor: f64,
    window: Array1<f64>,
    window_acf: Vec<f64>,
    min_lag: usize,
    max_lag: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    fft_size: usize,
}

impl Autocorrelator {
    fn new(sample_rate: f64, window_seconds: f64, params: &ExtractionParams) -> Self {
        let len = ((window_seconds * sample_rate).round() as usize).max(4);
        let fft_size = (2 * len).next_power_of_two();
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);
        let window = hann(len);
        let min_lag = ((sample_rate / params.pitch_ceiling).floor() as usize).max(2);
        let max_lag = ((sample_rate / params.pitch_floor).ceil() as usize).min(len - 2);
        let mut tracker = Self {
            sample_rate,
            pitch_floor: params.pitch_floor,
            window_acf: Vec::new(),
            window,
            min_lag,
            max_lag,
            forward,
            inverse,
            fft_size,
        };
        let window_acf = tracker.normalised_acf(&tracker.window);
        tracker.window_acf = window_acf;
        tracker
    }

    /// Autocorrelation normalised to 1 at lag zero; empty for a silent frame.
    fn normalised_acf(&self, frame: &Array1<f64>) -> Vec<f64> {
        let mut buffer: Vec<Complex<f64>> = frame
            .iter()
            .map(|&v| Complex::new(v, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(self.fft_size)
            .collect();
        self.forward.process(&mut buffer);
        buffer
            .iter_mut()
            .for_each(|c| *c = Complex::new(c.norm_sqr(), 0.0));
        self.inverse.process(&mut buffer);
        let zero = buffer[0].re;
        if zero <= 0.0 {
            return Vec::new();
        }
        buffer[..frame.len()].iter().map(|c| c.re / zero).collect()
    }

    fn frame_pitch(&self, samples: &[f64], t: f64, global_peak: f64) -> f64 {
        let mut frame = segment(samples, self.sample_rate, t, self.window.len());
        remove_mean(&mut frame);
        let local_peak = frame.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));
        if global_peak <= 0.0 || local_peak < SILENCE_THRESHOLD * global_peak {
            return 0.0;
        }
        frame *= &self.window;
        let acf = self.normalised_acf(&frame);
        if acf.is_empty() {
            return 0.0;
        }
        let corrected = |lag: usize| acf[lag] / self.window_acf[lag].max(f64::EPSILON);

        let mut best: Option<(f64, f64)> = None;
        for lag in self.min_lag.max(1)..=self.max_lag {
            let (prev, here, next) = (corrected(lag - 1), corrected(lag), corrected(lag + 1));
            if !(here > prev && here >= next) {
                continue;
            }
            let (offset, peak) = parabolic_peak(prev, here, next);
            let refined_lag = lag as f64 + offset;
            let strength = peak.min(1.0);
            let octaves = (self.pitch_floor * refined_lag / self.sample_rate).log2();
            let score = strength - OCTAVE_COST * octaves;
            if strength > VOICING_THRESHOLD && best.map_or(true, |(s, _)| score > s) {
                best = Some((score, self.sample_rate / refined_lag));
            }
        }
        best.map_or(0.0, |(_, frequency)| frequency)
    }
}

/// Offset (in samples) and height of the parabola through three points.
fn parabolic_peak(prev: f64, here: f64, next: f64) -> (f64, f64) {
    let curvature = prev - 2.0 * here + next;
    if curvature.abs() < f64::EPSILON {
        return (0.0, here);
    }
    let offset = 0.5 * (prev - next) / curvature;
    (offset, here - 0.25 * (prev - next) * offset)
}
