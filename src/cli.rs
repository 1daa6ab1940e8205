use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::AnalysisConfig;

#[derive(Parser, Debug)]
#[command(
    name = "vowelyzer",
    version,
    about = "Pitch, formant, intensity and vowel tracks for short speech recordings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyse one recording and print its tracks as JSON.
    Analyze(AnalyzeArgs),
    /// Analyse a reference recording and optionally a learner's attempt.
    Compare(CompareArgs),
    /// Print the built-in vowel prototypes in classification order.
    Vowels,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Audio file (WAV, FLAC, MP3, OGG, ...).
    #[arg(value_name = "AUDIO")]
    pub audio: PathBuf,
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Reference recording.
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,
    /// Learner recording to analyse alongside the reference.
    #[arg(long, value_name = "AUDIO")]
    pub user: Option<PathBuf>,
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// JSON file with analysis parameters; flags below override it.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Lowest pitch searched, in Hz.
    #[arg(long = "pitch-floor")]
    pub pitch_floor: Option<f64>,
    /// Highest pitch searched, in Hz.
    #[arg(long = "pitch-ceiling")]
    pub pitch_ceiling: Option<f64>,
    /// Analysis step, in seconds.
    #[arg(long = "time-step")]
    pub time_step: Option<f64>,
    /// Weight of F3 in the vowel distance.
    #[arg(long = "f3-weight")]
    pub f3_weight: Option<f64>,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

impl SettingsArgs {
    /// Defaults, then the config file, then individual flags.
    pub fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(floor) = self.pitch_floor {
            config.pitch_floor = floor;
        }
        if let Some(ceiling) = self.pitch_ceiling {
            config.pitch_ceiling = ceiling;
        }
        if let Some(step) = self.time_step {
            config.time_step = step;
        }
        if let Some(weight) = self.f3_weight {
            config.weights = config.weights.with_f3(weight);
        }
        config.validate()?;
        Ok(config)
    }
}
