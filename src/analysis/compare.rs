use serde::Serialize;

use super::frame::AnalysisResult;
use super::orchestrator::analyze;
use super::Result;
use crate::config::AnalysisConfig;
use crate::engine::SignalEngine;
use crate::types::AudioSource;

/// A reference recording and, optionally, the learner's attempt, analysed with
/// the same settings so their frames line up on the same step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub reference: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AnalysisResult>,
}

/// Analyse both recordings; either failing fails the whole comparison.
pub fn compare<E: SignalEngine + ?Sized>(
    reference: &AudioSource,
    user: Option<&AudioSource>,
    engine: &E,
    config: &AnalysisConfig,
) -> Result<ComparisonReport> {
    let reference = analyze(reference, engine, config)?;
    let user = user
        .map(|source| analyze(source, engine, config))
        .transpose()?;
    Ok(ComparisonReport { reference, user })
}
