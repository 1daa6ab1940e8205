use std::path::Path;

use tracing::{debug, info};

use super::classifier::VowelClassifier;
use super::frame::{AnalysisFrame, AnalysisResult, VowelReading};
use super::validity::{audible_intensity, gated_formants, voiced_pitch};
use super::{AnalysisError, Result};
use crate::config::AnalysisConfig;
use crate::engine::{Measurements, NativeEngine, SignalEngine};
use crate::types::AudioSource;

/// Measure `source` with `engine` and reduce it to labelled, time-aligned frames.
///
/// Engine failures surface as [`AnalysisError::Extraction`]; no partial result
/// is ever returned.
pub fn analyze<E: SignalEngine + ?Sized>(
    source: &AudioSource,
    engine: &E,
    config: &AnalysisConfig,
) -> Result<AnalysisResult> {
    config.validate()?;
    let measurements = engine
        .measure(source, &config.extraction_params())
        .map_err(|err| AnalysisError::extraction(&err))?;
    debug!(
        pitch_frames = measurements.pitch.len(),
        formant_frames = measurements.formants.frame_count(),
        intensity_frames = measurements.intensity.values.len(),
        "engine measurements received"
    );
    let aligner = FrameAligner::new(VowelClassifier::with_weights(config.weights));
    let result = aligner.align(&measurements, config.time_step);
    info!(
        source = %source.describe(),
        frames = result.len(),
        voiced = result.voiced_count(),
        classified = result.classified_count(),
        "analysis complete"
    );
    Ok(result)
}

/// [`analyze`] with the built-in engine.
pub fn analyze_file(path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<AnalysisResult> {
    analyze(&AudioSource::file(path), &NativeEngine::new(), config)
}

/// Walks the pitch grid and builds one frame per instant.
#[derive(Debug, Clone, Default)]
pub struct FrameAligner {
    classifier: VowelClassifier,
}

impl FrameAligner {
    pub fn new(classifier: VowelClassifier) -> Self {
        Self { classifier }
    }

    pub fn align(&self, measurements: &Measurements, time_step: f64) -> AnalysisResult {
        let pitch = &measurements.pitch;
        if measurements.intensity.values.len() != pitch.len() {
            debug!(
                pitch_frames = pitch.len(),
                intensity_frames = measurements.intensity.values.len(),
                "intensity track length differs from the pitch grid"
            );
        }
        let frames = pitch
            .times
            .iter()
            .enumerate()
            .map(|(index, &t)| self.frame_at(index, t, measurements))
            .collect();
        AnalysisResult::new(time_step, frames)
    }

    fn frame_at(&self, index: usize, t: f64, measurements: &Measurements) -> AnalysisFrame {
        let pitch = voiced_pitch(measurements.pitch.frequency(index));
        let reading = gated_formants(pitch, || measurements.formants.values_at_time(t)).map(
            |formants| VowelReading {
                formants,
                vowel: self.classifier.classify(&formants),
            },
        );
        let intensity = audible_intensity(measurements.intensity.value(index));
        AnalysisFrame::new(t, pitch, reading, intensity)
    }
}
