//! Signal-processing layer: turns audio into raw pitch, formant and intensity tracks.
//!
//! Tracks carry the engine's raw readings, sentinels included (0 Hz for an
//! unvoiced pitch frame, NaN for an undetected formant, a non-positive dB value
//! for silence). Interpreting them is left to `analysis::validity`.

mod formant;
mod intensity;
mod native;
mod pitch;
mod window;

use anyhow::Result;

use crate::types::AudioSource;

pub use native::{NativeEngine, NativeSettings};

/// Parameters every engine honours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionParams {
    pub time_step: f64,
    pub pitch_floor: f64,
    pub pitch_ceiling: f64,
}

/// Produces the three raw tracks for one audio source.
///
/// Implementations must be deterministic for a given source and parameters.
pub trait SignalEngine {
    fn measure(&self, source: &AudioSource, params: &ExtractionParams) -> Result<Measurements>;
}

impl<E: SignalEngine + ?Sized> SignalEngine for &E {
    fn measure(&self, source: &AudioSource, params: &ExtractionParams) -> Result<Measurements> {
        (**self).measure(source, params)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurements {
    pub pitch: PitchTrack,
    pub formants: FormantTrack,
    pub intensity: IntensityTrack,
}

/// The analysis time grid and the raw F0 at each instant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PitchTrack {
    pub times: Vec<f64>,
    pub frequencies: Vec<f64>,
}

impl PitchTrack {
    pub fn new(times: Vec<f64>, frequencies: Vec<f64>) -> Self {
        Self { times, frequencies }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Raw reading at grid index `index`; a missing entry reads as unvoiced.
    pub fn frequency(&self, index: usize) -> f64 {
        self.frequencies.get(index).copied().unwrap_or(0.0)
    }
}

/// F1..F3 on the formant analysis's own regular grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormantTrack {
    start_time: f64,
    time_step: f64,
    frames: Vec<[f64; 3]>,
}

impl FormantTrack {
    pub fn new(start_time: f64, time_step: f64, frames: Vec<[f64; 3]>) -> Self {
        Self {
            start_time,
            time_step,
            frames,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Value of formant `number` (1-based) at time `t`, linearly interpolated
    /// between the neighbouring frames. NaN outside the track, for an unknown
    /// formant number, or when either neighbour is undefined.
    pub fn value_at_time(&self, number: usize, t: f64) -> f64 {
        let Some(slot) = number.checked_sub(1).filter(|slot| *slot < 3) else {
            return f64::NAN;
        };
        let count = self.frames.len();
        if count == 0 || self.time_step <= 0.0 {
            return f64::NAN;
        }
        let position = (t - self.start_time) / self.time_step;
        let last = (count - 1) as f64;
        if !(-0.5..=last + 0.5).contains(&position) {
            return f64::NAN;
        }
        if position <= 0.0 {
            return self.frames[0][slot];
        }
        if position >= last {
            return self.frames[count - 1][slot];
        }
        // Grid times computed by repeated addition land a few ulps off a frame.
        let nearest = position.round();
        if (position - nearest).abs() < 1e-9 {
            return self.frames[nearest as usize][slot];
        }
        let left = position.floor() as usize;
        let weight = position - left as f64;
        let (a, b) = (self.frames[left][slot], self.frames[left + 1][slot]);
        a + (b - a) * weight
    }

    /// All three formants at `t`.
    pub fn values_at_time(&self, t: f64) -> [f64; 3] {
        [1, 2, 3].map(|number| self.value_at_time(number, t))
    }
}

/// Raw intensity in dB, one value per pitch-grid index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntensityTrack {
    pub values: Vec<f64>,
}

impl IntensityTrack {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Raw reading at grid index `index`; a missing entry reads as silent.
    pub fn value(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }
}
