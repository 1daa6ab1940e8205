//! Time-aligned pitch, formant and intensity analysis of short speech
//! recordings, with nearest-prototype vowel labelling.

pub mod analysis;
pub mod audio;
pub mod cli;
pub mod config;
pub mod engine;
pub mod types;

pub use analysis::{analyze, analyze_file, compare, AnalysisError, AnalysisResult};
pub use config::AnalysisConfig;
pub use engine::{NativeEngine, SignalEngine};
pub use types::{AudioData, AudioSource};
