//! Core types shared by the decoding and measurement layers

use std::path::{Path, PathBuf};

/// Raw audio data representation (mono, f32 samples)
#[derive(Debug, Clone, PartialEq)]
pub struct AudioData {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 44100)
    pub sample_rate: u32,
}

impl AudioData {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f64 / self.sample_rate as f64
        }
    }
}

/// Where the audio for one analysis comes from.
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Any container/codec symphonia can probe (WAV, FLAC, MP3, OGG, ...).
    File(PathBuf),
    /// Already-decoded mono samples.
    Clip(AudioData),
}

impl AudioSource {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// Human-readable label used in log fields.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Clip(audio) => format!(
                "<clip {} samples @ {} Hz>",
                audio.samples.len(),
                audio.sample_rate
            ),
        }
    }
}

impl From<AudioData> for AudioSource {
    fn from(audio: AudioData) -> Self {
        Self::Clip(audio)
    }
}

impl From<PathBuf> for AudioSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for AudioSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}
