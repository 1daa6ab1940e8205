use serde::{Deserialize, Serialize};

use super::distance::FormantTriple;

/// Formants of a frame together with the vowel they classified as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VowelReading {
    pub formants: FormantTriple,
    pub vowel: &'static str,
}

/// One instant on the analysis time grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisFrame {
    pub time: f64,
    pub pitch: Option<f64>,
    pub intensity: Option<f64>,
    reading: Option<VowelReading>,
}

impl AnalysisFrame {
    pub fn new(
        time: f64,
        pitch: Option<f64>,
        reading: Option<VowelReading>,
        intensity: Option<f64>,
    ) -> Self {
        Self {
            time,
            pitch,
            intensity,
            reading,
        }
    }

    pub fn formants(&self) -> Option<FormantTriple> {
        self.reading.map(|r| r.formants)
    }

    pub fn vowel(&self) -> Option<&'static str> {
        self.reading.map(|r| r.vowel)
    }

    pub fn is_voiced(&self) -> bool {
        self.pitch.is_some()
    }
}

/// Time-aligned frames for one recording.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    time_step: f64,
    frames: Vec<AnalysisFrame>,
}

impl AnalysisResult {
    pub(crate) fn new(time_step: f64, frames: Vec<AnalysisFrame>) -> Self {
        Self { time_step, frames }
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn frames(&self) -> &[AnalysisFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn voiced_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_voiced()).count()
    }

    pub fn classified_count(&self) -> usize {
        self.frames.iter().filter(|f| f.reading.is_some()).count()
    }

    /// Column-oriented view, the shape handed to clients.
    pub fn columns(&self) -> AnalysisColumns {
        let frames = &self.frames;
        AnalysisColumns {
            time: frames.iter().map(|f| f.time).collect(),
            pitch: frames.iter().map(|f| f.pitch).collect(),
            formants: frames
                .iter()
                .map(|f| f.formants().map(|t| t.as_array().to_vec()).unwrap_or_default())
                .collect(),
            vowels: frames
                .iter()
                .map(|f| f.vowel().map(str::to_owned))
                .collect(),
            intensity: frames.iter().map(|f| f.intensity).collect(),
        }
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.columns().serialize(serializer)
    }
}

/// Index-aligned sequences; an unclassified frame has `[]` formants and a null vowel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisColumns {
    pub time: Vec<f64>,
    pub pitch: Vec<Option<f64>>,
    pub formants: Vec<Vec<f64>>,
    pub vowels: Vec<Option<String>>,
    pub intensity: Vec<Option<f64>>,
}
