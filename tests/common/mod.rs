#![allow(dead_code)]

use std::f64::consts::PI;
use std::path::PathBuf;

use tempfile::TempDir;
use vowelyzer::audio::encoder::encode_wav;
use vowelyzer::types::AudioData;

pub const SAMPLE_RATE: u32 = 22_050;
/// Glottal period in samples; F0 = 22050 / 184 ≈ 119.84 Hz.
pub const PERIOD: usize = 184;
pub const SILENCE_SECONDS: f64 = 0.1;
pub const VOWEL_SECONDS: f64 = 0.5;

pub fn expected_f0() -> f64 {
    SAMPLE_RATE as f64 / PERIOD as f64
}

/// Pulse train through cascaded two-pole resonators, padded with silence.
pub fn synthetic_vowel(formants: [f64; 3]) -> AudioData {
    let rate = SAMPLE_RATE as f64;
    let voiced = (VOWEL_SECONDS * rate) as usize;
    let mut signal: Vec<f64> = (0..voiced)
        .map(|i| if i % PERIOD == 0 { 1.0 } else { 0.0 })
        .collect();
    for frequency in formants {
        resonate(&mut signal, frequency, 80.0, rate);
    }
    let peak = signal.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));

    let pad = vec![0.0_f32; (SILENCE_SECONDS * rate) as usize];
    let mut samples = pad.clone();
    samples.extend(signal.iter().map(|s| (0.5 * s / peak) as f32));
    samples.extend(pad);
    AudioData::new(samples, SAMPLE_RATE)
}

fn resonate(signal: &mut [f64], frequency: f64, bandwidth: f64, rate: f64) {
    let r = (-PI * bandwidth / rate).exp();
    let a1 = 2.0 * r * (2.0 * PI * frequency / rate).cos();
    let a2 = -r * r;
    let (mut y1, mut y2) = (0.0, 0.0);
    for sample in signal.iter_mut() {
        let y = *sample + a1 * y1 + a2 * y2;
        y2 = y1;
        y1 = y;
        *sample = y;
    }
}

/// Write `audio` into a fresh temp dir; keep the dir alive while the path is used.
pub fn write_wav(audio: &AudioData, name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(name);
    encode_wav(audio, &path).expect("write wav");
    (dir, path)
}

/// A file with a WAV extension whose bytes are not audio.
pub fn corrupt_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("broken.wav");
    std::fs::write(&path, b"definitely not a riff header").expect("write bytes");
    (dir, path)
}

pub fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    values[values.len() / 2]
}
