use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::analysis::{AnalysisError, FormantWeights};
use crate::engine::ExtractionParams;

pub const DEFAULT_PITCH_FLOOR: f64 = 75.0;
pub const DEFAULT_PITCH_CEILING: f64 = 500.0;
pub const DEFAULT_TIME_STEP: f64 = 0.01;
/// Finest analysis step accepted, in seconds.
pub const MIN_TIME_STEP: f64 = 1e-4;

/// Parameters for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    #[serde(alias = "pitchFloor")]
    pub pitch_floor: f64,
    #[serde(alias = "pitchCeiling")]
    pub pitch_ceiling: f64,
    #[serde(alias = "timeStep")]
    pub time_step: f64,
    pub weights: FormantWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pitch_floor: DEFAULT_PITCH_FLOOR,
            pitch_ceiling: DEFAULT_PITCH_CEILING,
            time_step: DEFAULT_TIME_STEP,
            weights: FormantWeights::DEFAULT,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).context("Failed to parse analysis config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read analysis config {}", path.display()))?;
        Self::from_json_str(&data).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn validate(&self) -> std::result::Result<(), AnalysisError> {
        let invalid = |msg: String| Err(AnalysisError::InvalidParameters(msg));
        if !(self.time_step.is_finite() && self.time_step >= MIN_TIME_STEP) {
            return invalid(format!(
                "time_step must be at least {MIN_TIME_STEP}s, got {}",
                self.time_step
            ));
        }
        if !(self.pitch_floor.is_finite() && self.pitch_floor > 0.0) {
            return invalid(format!(
                "pitch_floor must be positive, got {}",
                self.pitch_floor
            ));
        }
        if !(self.pitch_ceiling.is_finite() && self.pitch_ceiling > self.pitch_floor) {
            return invalid(format!(
                "pitch_ceiling ({}) must exceed pitch_floor ({})",
                self.pitch_ceiling, self.pitch_floor
            ));
        }
        if !self.weights.is_valid() {
            return invalid(format!(
                "formant weights must be finite and non-negative, got {:?}",
                self.weights
            ));
        }
        Ok(())
    }

    pub fn extraction_params(&self) -> ExtractionParams {
        ExtractionParams {
            time_step: self.time_step,
            pitch_floor: self.pitch_floor,
            pitch_ceiling: self.pitch_ceiling,
        }
    }
}
