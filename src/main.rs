use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use vowelyzer::analysis::{analyze, compare, prototypes};
use vowelyzer::cli::{AnalyzeArgs, Cli, Command, CompareArgs};
use vowelyzer::engine::NativeEngine;
use vowelyzer::types::AudioSource;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => handle_analyze(&args),
        Command::Compare(args) => handle_compare(&args),
        Command::Vowels => print_json(&prototypes(), true),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = args.settings.resolve()?;
    debug!(?config, audio = %args.audio.display(), "analyzing");
    let result = analyze(&AudioSource::file(&args.audio), &NativeEngine::new(), &config)
        .with_context(|| format!("Failed to analyze {}", args.audio.display()))?;
    print_json(&result, args.settings.pretty)
}

fn handle_compare(args: &CompareArgs) -> Result<()> {
    let config = args.settings.resolve()?;
    let reference = AudioSource::file(&args.reference);
    let user = args.user.as_deref().map(AudioSource::file);
    let report = compare(&reference, user.as_ref(), &NativeEngine::new(), &config)
        .context("Failed to compare recordings")?;
    print_json(&report, args.settings.pretty)
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)
    } else {
        serde_json::to_writer(&mut out, value)
    }
    .context("Failed to serialize analysis output")?;
    writeln!(out).context("Failed to write output")?;
    Ok(())
}
