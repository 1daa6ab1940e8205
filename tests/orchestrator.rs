use std::cell::Cell;

use anyhow::{anyhow, Context, Result};
use approx::assert_abs_diff_eq;
use vowelyzer::analysis::{
    analyze, classify, compare, AnalysisError, FormantTriple, FormantWeights, VowelInventory,
};
use vowelyzer::config::AnalysisConfig;
use vowelyzer::engine::{
    ExtractionParams, FormantTrack, IntensityTrack, Measurements, PitchTrack, SignalEngine,
};
use vowelyzer::types::{AudioData, AudioSource};

const STEP: f64 = 0.01;
const NAN: f64 = f64::NAN;

/// Replays fixed measurements and records what it was asked for.
struct ScriptedEngine {
    measurements: Measurements,
    calls: Cell<usize>,
    last_params: Cell<Option<ExtractionParams>>,
}

impl ScriptedEngine {
    fn new(measurements: Measurements) -> Self {
        Self {
            measurements,
            calls: Cell::new(0),
            last_params: Cell::new(None),
        }
    }
}

impl SignalEngine for ScriptedEngine {
    fn measure(&self, _source: &AudioSource, params: &ExtractionParams) -> Result<Measurements> {
        self.calls.set(self.calls.get() + 1);
        self.last_params.set(Some(*params));
        Ok(self.measurements.clone())
    }
}

struct FailingEngine;

impl SignalEngine for FailingEngine {
    fn measure(&self, _source: &AudioSource, _params: &ExtractionParams) -> Result<Measurements> {
        Err(anyhow!("unsupported encoding: 0x55")).context("could not read audio from clip.wav")
    }
}

/// Six frames covering each validity case.
fn scripted() -> Measurements {
    let times: Vec<f64> = (0..6).map(|i| 0.02 + i as f64 * STEP).collect();
    let pitch = PitchTrack::new(times, vec![0.0, 120.0, 121.0, 122.0, -1.0, 124.0]);
    // Formant frames sit exactly on the pitch grid.
    let formants = FormantTrack::new(
        0.02,
        STEP,
        vec![
            [270.0, 2290.0, 3010.0], // unvoiced: must be dropped
            [270.0, 2290.0, 3010.0], // voiced, complete: i
            [300.0, NAN, 2240.0],    // voiced, F2 missing
            [300.0, 870.0, 2240.0],  // voiced, complete: u
            [300.0, 870.0, 2240.0],  // negative pitch sentinel
            [NAN, NAN, NAN],         // voiced, nothing detected
        ],
    );
    let intensity = IntensityTrack::new(vec![-300.0, 65.0, 66.0, 0.0, 40.0, 70.0]);
    Measurements {
        pitch,
        formants,
        intensity,
    }
}

fn clip() -> AudioSource {
    AudioSource::from(AudioData::new(vec![0.0; 16], 16_000))
}

#[test]
fn frames_follow_the_validity_policy() {
    let engine = ScriptedEngine::new(scripted());
    let result = analyze(&clip(), &engine, &AnalysisConfig::default()).unwrap();
    let frames = result.frames();
    assert_eq!(frames.len(), 6);

    assert_eq!(frames[0].pitch, None);
    assert_eq!(frames[0].formants(), None);
    assert_eq!(frames[0].vowel(), None);

    assert_eq!(frames[1].pitch, Some(120.0));
    assert_eq!(
        frames[1].formants(),
        Some(FormantTriple::new(270.0, 2290.0, 3010.0))
    );
    assert_eq!(frames[1].vowel(), Some("i"));

    assert_eq!(frames[2].pitch, Some(121.0));
    assert_eq!(frames[2].formants(), None);
    assert_eq!(frames[2].vowel(), None);

    assert_eq!(frames[3].vowel(), Some("u"));

    assert_eq!(frames[4].pitch, None);
    assert_eq!(frames[4].vowel(), None);

    assert_eq!(frames[5].pitch, Some(124.0));
    assert_eq!(frames[5].formants(), None);
}

#[test]
fn intensity_is_read_in_lockstep() {
    let engine = ScriptedEngine::new(scripted());
    let result = analyze(&clip(), &engine, &AnalysisConfig::default()).unwrap();
    let intensity: Vec<Option<f64>> = result.frames().iter().map(|f| f.intensity).collect();
    assert_eq!(
        intensity,
        vec![None, Some(65.0), Some(66.0), None, Some(40.0), Some(70.0)]
    );
}

#[test]
fn short_intensity_track_degrades_to_absent() {
    let mut measurements = scripted();
    measurements.intensity = IntensityTrack::new(vec![60.0, 61.0]);
    let engine = ScriptedEngine::new(measurements);
    let result = analyze(&clip(), &engine, &AnalysisConfig::default()).unwrap();
    assert_eq!(result.len(), 6);
    assert_eq!(result.frames()[1].intensity, Some(61.0));
    assert!(result.frames()[2..].iter().all(|f| f.intensity.is_none()));
}

#[test]
fn columns_stay_index_aligned() {
    let engine = ScriptedEngine::new(scripted());
    let columns = analyze(&clip(), &engine, &AnalysisConfig::default())
        .unwrap()
        .columns();
    let n = columns.time.len();
    assert_eq!(columns.pitch.len(), n);
    assert_eq!(columns.formants.len(), n);
    assert_eq!(columns.vowels.len(), n);
    assert_eq!(columns.intensity.len(), n);

    for i in 0..n {
        if columns.pitch[i].is_none() {
            assert!(columns.formants[i].is_empty());
            assert!(columns.vowels[i].is_none());
        }
        if columns.vowels[i].is_some() {
            assert_eq!(columns.formants[i].len(), 3);
            assert!(columns.formants[i].iter().all(|f| f.is_finite()));
        }
    }
}

#[test]
fn time_grid_is_evenly_spaced() {
    let engine = ScriptedEngine::new(scripted());
    let result = analyze(&clip(), &engine, &AnalysisConfig::default()).unwrap();
    assert_eq!(result.time_step(), STEP);
    for pair in result.frames().windows(2) {
        assert!(pair[1].time > pair[0].time);
        assert_abs_diff_eq!(pair[1].time - pair[0].time, STEP, epsilon = 1e-9);
    }
}

#[test]
fn repeated_analysis_is_identical() {
    let engine = ScriptedEngine::new(scripted());
    let config = AnalysisConfig::default();
    let first = serde_json::to_string(&analyze(&clip(), &engine, &config).unwrap()).unwrap();
    let second = serde_json::to_string(&analyze(&clip(), &engine, &config).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.calls.get(), 2);
}

#[test]
fn config_reaches_the_engine() {
    let engine = ScriptedEngine::new(scripted());
    let config = AnalysisConfig {
        pitch_floor: 60.0,
        pitch_ceiling: 300.0,
        time_step: 0.005,
        ..AnalysisConfig::default()
    };
    analyze(&clip(), &engine, &config).unwrap();
    let params = engine.last_params.get().unwrap();
    assert_eq!(params.pitch_floor, 60.0);
    assert_eq!(params.pitch_ceiling, 300.0);
    assert_eq!(params.time_step, 0.005);
}

#[test]
fn configured_weights_drive_the_labels() {
    let probe = [480.0, 1500.0, 1900.0];
    let mut measurements = scripted();
    measurements.formants = FormantTrack::new(0.02, STEP, vec![probe; 6]);
    let engine = ScriptedEngine::new(measurements);
    let inventory = VowelInventory::builtin();

    for f3 in [0.0, 0.3, 1.0, 4.0] {
        let config = AnalysisConfig {
            weights: FormantWeights::DEFAULT.with_f3(f3),
            ..AnalysisConfig::default()
        };
        let result = analyze(&clip(), &engine, &config).unwrap();
        let expected = classify(&FormantTriple::from(probe), &inventory, &config.weights);
        assert_eq!(result.frames()[1].vowel(), Some(expected));
    }
}

#[test]
fn engine_failure_becomes_extraction_error() {
    let err = analyze(&clip(), &FailingEngine, &AnalysisConfig::default()).unwrap_err();
    assert!(err.is_extraction());
    let message = err.to_string();
    assert!(message.contains("could not read audio from clip.wav"));
    assert!(message.contains("unsupported encoding: 0x55"));
}

#[test]
fn invalid_parameters_never_reach_the_engine() {
    let engine = ScriptedEngine::new(scripted());
    let config = AnalysisConfig {
        time_step: -0.01,
        ..AnalysisConfig::default()
    };
    let err = analyze(&clip(), &engine, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidParameters(_)));
    assert_eq!(engine.calls.get(), 0);
}

#[test]
fn vanishing_time_step_is_rejected_before_measuring() {
    let engine = ScriptedEngine::new(scripted());
    let config = AnalysisConfig {
        time_step: 1e-300,
        ..AnalysisConfig::default()
    };
    let err = analyze(&clip(), &engine, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidParameters(_)));
    assert_eq!(engine.calls.get(), 0);
}

#[test]
fn infinite_readings_never_reach_the_output() {
    let times = vec![0.02, 0.03, 0.04];
    let engine = ScriptedEngine::new(Measurements {
        pitch: PitchTrack::new(times, vec![120.0, f64::INFINITY, 122.0]),
        formants: FormantTrack::new(
            0.02,
            STEP,
            vec![
                [270.0, 2290.0, f64::INFINITY],
                [270.0, 2290.0, 3010.0],
                [270.0, 2290.0, 3010.0],
            ],
        ),
        intensity: IntensityTrack::new(vec![f64::INFINITY, 60.0, f64::NEG_INFINITY]),
    });
    let result = analyze(&clip(), &engine, &AnalysisConfig::default()).unwrap();
    let frames = result.frames();

    assert_eq!(frames[0].pitch, Some(120.0));
    assert_eq!(frames[0].vowel(), None);
    assert_eq!(frames[0].intensity, None);
    assert_eq!(frames[1].pitch, None);
    assert_eq!(frames[1].vowel(), None);
    assert_eq!(frames[2].vowel(), Some("i"));
    assert_eq!(frames[2].intensity, None);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json["formants"],
        serde_json::json!([[], [], [270.0, 2290.0, 3010.0]])
    );
    assert_eq!(json["vowels"], serde_json::json!([null, null, "i"]));
    assert_eq!(json["pitch"], serde_json::json!([120.0, null, 122.0]));
}

#[test]
fn empty_grid_produces_empty_result() {
    let engine = ScriptedEngine::new(Measurements {
        pitch: PitchTrack::default(),
        formants: FormantTrack::default(),
        intensity: IntensityTrack::default(),
    });
    let result = analyze(&clip(), &engine, &AnalysisConfig::default()).unwrap();
    assert!(result.is_empty());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["time"].as_array().map(Vec::len), Some(0));
}

#[test]
fn comparison_pairs_both_recordings() {
    let engine = ScriptedEngine::new(scripted());
    let config = AnalysisConfig::default();
    let report = compare(&clip(), Some(&clip()), &engine, &config).unwrap();
    assert_eq!(report.user.as_ref(), Some(&report.reference));

    let value = serde_json::to_value(&report).unwrap();
    assert!(value.get("reference").is_some());
    assert!(value.get("user").is_some());
}

#[test]
fn comparison_without_user_omits_the_field() {
    let engine = ScriptedEngine::new(scripted());
    let report = compare(&clip(), None, &engine, &AnalysisConfig::default()).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert!(value.get("user").is_none());
    assert_eq!(engine.calls.get(), 1);
}

#[test]
fn comparison_is_all_or_nothing() {
    let err = compare(
        &clip(),
        Some(&clip()),
        &FailingEngine,
        &AnalysisConfig::default(),
    )
    .unwrap_err();
    assert!(err.is_extraction());
}
