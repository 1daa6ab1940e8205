use anyhow::{ensure, Context, Result};
use tracing::debug;

use super::formant::{track_formants, BurgSettings};
use super::intensity::track_intensity;
use super::pitch::track_pitch;
use super::{ExtractionParams, Measurements, SignalEngine};
use crate::audio::{decoder, resample};
use crate::types::{AudioData, AudioSource};

/// Tunables of the built-in engine. Defaults follow common phonetics practice
/// for adult speech.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeSettings {
    /// Rate the pitch tracker works at.
    pub pitch_sample_rate: u32,
    /// Highest formant frequency searched; the formant analysis runs at twice this.
    pub max_formant: f64,
    pub formant_count: usize,
    pub formant_window: f64,
    pub pre_emphasis_from: f64,
    /// Sets the intensity window length (3.2 periods).
    pub intensity_minimum_pitch: f64,
}

impl Default for NativeSettings {
    fn default() -> Self {
        Self {
            pitch_sample_rate: 16_000,
            max_formant: 5_500.0,
            formant_count: 5,
            formant_window: 0.025,
            pre_emphasis_from: 50.0,
            intensity_minimum_pitch: 100.0,
        }
    }
}

/// Self-contained engine: symphonia decoding plus autocorrelation pitch,
/// Burg formants and windowed intensity. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct NativeEngine {
    settings: NativeSettings,
}

impl NativeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: NativeSettings) -> Self {
        Self { settings }
    }

    fn load(&self, source: &AudioSource) -> Result<AudioData> {
        let audio = match source {
            AudioSource::File(path) => decoder::decode_audio(path)?,
            AudioSource::Clip(audio) => audio.clone(),
        };
        ensure!(audio.sample_rate > 0, "audio has a zero sample rate");
        ensure!(!audio.samples.is_empty(), "audio contains no samples");
        ensure!(
            audio.samples.iter().all(|s| s.is_finite()),
            "audio contains non-finite samples"
        );
        Ok(audio)
    }

    fn measure_audio(&self, audio: &AudioData, params: &ExtractionParams) -> Result<Measurements> {
        let settings = &self.settings;

        let pitch_rate = settings.pitch_sample_rate;
        let for_pitch = resample::linear_resample(&audio.samples, audio.sample_rate, pitch_rate)
            .context("failed to resample for pitch tracking")?;
        let pitch = track_pitch(&for_pitch, pitch_rate as f64, params)?;

        let formant_rate = (2.0 * settings.max_formant).round() as u32;
        let for_formants =
            resample::linear_resample(&audio.samples, audio.sample_rate, formant_rate)
                .context("failed to resample for formant tracking")?;
        let burg = BurgSettings {
            max_formant: settings.max_formant,
            formant_count: settings.formant_count,
            window_length: settings.formant_window,
            pre_emphasis_from: settings.pre_emphasis_from,
        };
        let formants =
            track_formants(&for_formants, formant_rate as f64, params.time_step, &burg)?;

        let full_rate: Vec<f64> = audio.samples.iter().map(|&s| s as f64).collect();
        let intensity = track_intensity(
            &full_rate,
            audio.sample_rate as f64,
            &pitch.times,
            settings.intensity_minimum_pitch,
        );

        debug!(
            duration = audio.duration(),
            pitch_frames = pitch.len(),
            formant_frames = formants.frame_count(),
            max_formant = burg.max_formant,
            "native engine measured tracks"
        );
        Ok(Measurements {
            pitch,
            formants,
            intensity,
        })
    }
}

impl SignalEngine for NativeEngine {
    fn measure(&self, source: &AudioSource, params: &ExtractionParams) -> Result<Measurements> {
        let audio = self
            .load(source)
            .with_context(|| format!("could not read audio from {}", source.describe()))?;
        self.measure_audio(&audio, params)
    }
}
