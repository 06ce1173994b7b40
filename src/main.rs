//! jazzgen: command-line front end for the progression generator.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{LevelFilter, Metadata, Record};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use jazzgen::derivation::format_progression;
use jazzgen::evaluation::evaluate_progression;
use jazzgen::style::{
    default_style_path, load_style, reset_style, save_style, StyleConfigError, StyleEngine,
    StylePreset, StyleVector,
};
use jazzgen::substitution::AppliedSubstitution;
use jazzgen::theory::{ChordParseError, ChordSymbol, PitchClass};

const BARS_PER_LINE: usize = 4;

/// Jazz chord progressions from a probabilistic grammar
#[derive(Parser)]
#[command(name = "jazzgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a styled progression
    Generate {
        /// Preset name or id (1-9)
        #[arg(short, long, default_value = "bebop")]
        style: String,

        /// Key, e.g. C, Bb, F#
        #[arg(short, long, default_value = "C")]
        key: String,

        /// Number of chords
        #[arg(short, long, default_value_t = 8)]
        length: usize,

        #[arg(long)]
        seed: Option<u64>,

        /// YAML style file; replaces the preset
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the tritone substitution probability
        #[arg(long)]
        tritone: Option<f64>,

        /// Override the extension level
        #[arg(long)]
        extensions: Option<f64>,

        /// Also print evaluation metrics
        #[arg(short, long)]
        evaluate: bool,

        /// Print the derivation tree
        #[arg(long)]
        tree: bool,

        /// Write a JSON export
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score a progression
    Evaluate {
        /// Comma-separated chords, e.g. "Dm7,G7,Cmaj7"
        #[arg(short, long, conflicts_with = "input")]
        chords: Option<String>,

        /// JSON export written by `generate -o`
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Key context; defaults to the first chord's root
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Dominant blues changes
    Blues {
        #[arg(short, long, default_value = "C")]
        key: String,

        #[arg(short, long, default_value_t = 12)]
        bars: usize,

        #[arg(short, long, default_value = "blues")]
        style: String,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// A four-chord turnaround
    Turnaround {
        #[arg(short, long, default_value = "C")]
        key: String,

        #[arg(short, long, default_value = "bebop")]
        style: String,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// List style presets
    Styles,

    /// Save a preset as the user style file
    SaveStyle {
        #[arg(short, long, default_value = "bebop")]
        style: String,

        /// Defaults to ~/.jazzgen/style.yaml
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Delete the user style file
    ResetStyle {
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("unknown style: {0}")]
    UnknownStyle(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("no chords given; use --chords or --input")]
    NoChords,
    #[error(transparent)]
    Chord(#[from] ChordParseError),
    #[error(transparent)]
    Config(#[from] StyleConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON export of a generated progression.
#[derive(Debug, Serialize, Deserialize)]
struct ProgressionExport {
    #[serde(default)]
    style: String,
    #[serde(default)]
    key: String,
    chords: Vec<String>,
    #[serde(default, skip_deserializing)]
    substitutions: Vec<AppliedSubstitution>,
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => return,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
        log::debug!("logging at {level}");
    }
}

fn resolve_preset(name: &str) -> Result<StylePreset, CliError> {
    name.parse::<u8>()
        .ok()
        .and_then(StylePreset::from_id)
        .or_else(|| StylePreset::from_name(name))
        .ok_or_else(|| CliError::UnknownStyle(name.to_string()))
}

fn resolve_key(name: &str) -> Result<PitchClass, CliError> {
    PitchClass::from_name(name).ok_or_else(|| CliError::InvalidKey(name.to_string()))
}

fn parse_chord_list(text: &str) -> Result<Vec<ChordSymbol>, CliError> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<ChordSymbol>().map_err(CliError::from))
        .collect()
}

fn engine_for(style: StyleVector, seed: Option<u64>) -> StyleEngine {
    let mut engine = StyleEngine::new(style);
    if let Some(seed) = seed {
        engine.set_seed(seed);
    }
    engine
}

fn names(chords: &[ChordSymbol]) -> Vec<String> {
    chords.iter().map(ToString::to_string).collect()
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    style_name: &str,
    key_name: &str,
    length: usize,
    seed: Option<u64>,
    config: Option<&Path>,
    tritone: Option<f64>,
    extensions: Option<f64>,
    evaluate: bool,
    tree: bool,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let key = resolve_key(key_name)?;
    let (label, style) = match config {
        Some(path) => (path.display().to_string(), load_style(path)?),
        None => {
            let preset = resolve_preset(style_name)?;
            (preset.name().to_string(), preset.vector())
        }
    };

    let mut engine = engine_for(style, seed);
    if let Some(value) = tritone {
        engine.set_tritone_sub_prob(value);
    }
    if let Some(value) = extensions {
        engine.set_extension_level(value);
    }

    let report = engine.generate_report(length, key);
    println!("{label} in {key}: {}", engine.style().describe());
    println!("{}", format_progression(&report.chords, BARS_PER_LINE));

    if tree {
        print!("\n{}", report.tree);
    }
    if evaluate {
        print!("\n{}", evaluate_progression(&report.chords, Some(key)));
    }
    if let Some(path) = output {
        let export = ProgressionExport {
            style: label,
            key: key.to_string(),
            chords: names(&report.chords),
            substitutions: report.substitutions,
        };
        std::fs::write(path, serde_json::to_string_pretty(&export)?)?;
        log::debug!("wrote {}", path.display());
    }
    Ok(())
}

/// Chords to evaluate plus the key recorded alongside them, if any.
fn load_progression(
    chords: Option<&str>,
    input: Option<&Path>,
) -> Result<(Vec<ChordSymbol>, Option<PitchClass>), CliError> {
    match (chords, input) {
        (Some(text), _) => Ok((parse_chord_list(text)?, None)),
        (None, Some(path)) => {
            let export: ProgressionExport = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            let key = match export.key.trim() {
                "" => None,
                name => Some(resolve_key(name)?),
            };
            Ok((parse_chord_list(&export.chords.join(","))?, key))
        }
        (None, None) => Err(CliError::NoChords),
    }
}

fn run_evaluate(
    chords: Option<&str>,
    input: Option<&Path>,
    key: Option<&str>,
) -> Result<(), CliError> {
    let (progression, recorded_key) = load_progression(chords, input)?;
    // An explicit key wins over the exported one.
    let key = key.map(resolve_key).transpose()?.or(recorded_key);

    println!("{}", format_progression(&progression, BARS_PER_LINE));
    print!("{}", evaluate_progression(&progression, key));
    Ok(())
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            style,
            key,
            length,
            seed,
            config,
            tritone,
            extensions,
            evaluate,
            tree,
            output,
        } => run_generate(
            &style,
            &key,
            length,
            seed,
            config.as_deref(),
            tritone,
            extensions,
            evaluate,
            tree,
            output.as_deref(),
        ),
        Commands::Evaluate { chords, input, key } => {
            run_evaluate(chords.as_deref(), input.as_deref(), key.as_deref())
        }
        Commands::Blues {
            key,
            bars,
            style,
            seed,
        } => {
            let key = resolve_key(&key)?;
            let mut engine = engine_for(resolve_preset(&style)?.vector(), seed);
            let changes = engine.generate_blues_changes(key, bars);
            println!("{}", format_progression(&changes, BARS_PER_LINE));
            Ok(())
        }
        Commands::Turnaround { key, style, seed } => {
            let key = resolve_key(&key)?;
            let mut engine = engine_for(resolve_preset(&style)?.vector(), seed);
            println!("{}", format_progression(&engine.generate_turnaround(key), 0));
            Ok(())
        }
        Commands::Styles => {
            for preset in StylePreset::ALL {
                println!("{:>2}  {:<13} {}", preset.id(), preset.name(), preset.vector().describe());
            }
            Ok(())
        }
        Commands::SaveStyle { style, path } => {
            let path = path.unwrap_or_else(default_style_path);
            save_style(&path, &resolve_preset(&style)?.vector())?;
            println!("saved {} to {}", style, path.display());
            Ok(())
        }
        Commands::ResetStyle { path } => {
            let path = path.unwrap_or_else(default_style_path);
            reset_style(&path)?;
            println!("removed {}", path.display());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_defaults() {
        let cli = Cli::try_parse_from(["jazzgen", "generate"]).unwrap();
        match cli.command {
            Commands::Generate {
                style, key, length, seed, ..
            } => {
                assert_eq!(style, "bebop");
                assert_eq!(key, "C");
                assert_eq!(length, 8);
                assert_eq!(seed, None);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn counts_verbosity() {
        let cli = Cli::try_parse_from(["jazzgen", "-vv", "styles"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn evaluate_rejects_both_sources() {
        assert!(Cli::try_parse_from([
            "jazzgen", "evaluate", "-c", "Dm7,G7", "-i", "p.json"
        ])
        .is_err());
    }

    #[test]
    fn presets_by_id_or_name() {
        assert_eq!(resolve_preset("4").unwrap(), StylePreset::HardBop);
        assert_eq!(resolve_preset("post-bop").unwrap(), StylePreset::PostBop);
        assert!(matches!(resolve_preset("polka"), Err(CliError::UnknownStyle(_))));
    }

    #[test]
    fn chord_lists_tolerate_spaces() {
        let chords = parse_chord_list("Dm7, G7 ,Cmaj7,").unwrap();
        assert_eq!(names(&chords), vec!["Dm7", "G7", "Cmaj7"]);
        assert!(parse_chord_list("Dm7,H7").is_err());
    }

    #[test]
    fn export_reads_back() {
        let export = ProgressionExport {
            style: "Bebop".into(),
            key: "C".into(),
            chords: vec!["Dm7".into(), "G7".into()],
            substitutions: Vec::new(),
        };
        let json = serde_json::to_string(&export).unwrap();
        let back: ProgressionExport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.chords, export.chords);
    }

    #[test]
    fn exported_key_is_used_for_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progression.json");
        std::fs::write(&path, r#"{"style":"Bebop","key":"C","chords":["Fmaj7","Cmaj7"]}"#).unwrap();

        let (chords, key) = load_progression(None, Some(&path)).unwrap();
        assert_eq!(names(&chords), vec!["Fmaj7", "Cmaj7"]);
        assert_eq!(key, Some(PitchClass::C));
        // Plagal only in C; the first root would have been F.
        assert_eq!(evaluate_progression(&chords, key).functional_coherence, 1.0);
    }

    #[test]
    fn export_without_key_falls_back_to_first_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progression.json");
        std::fs::write(&path, r#"{"chords":["Dm7","G7"]}"#).unwrap();
        let (_, key) = load_progression(None, Some(&path)).unwrap();
        assert_eq!(key, None);

        std::fs::write(&path, r#"{"key":"H","chords":["Dm7"]}"#).unwrap();
        assert!(matches!(
            load_progression(None, Some(&path)),
            Err(CliError::InvalidKey(_))
        ));
    }

    #[test]
    fn chord_text_carries_no_key() {
        let (chords, key) = load_progression(Some("Dm7,G7"), None).unwrap();
        assert_eq!(chords.len(), 2);
        assert_eq!(key, None);
        assert!(matches!(load_progression(None, None), Err(CliError::NoChords)));
    }
}
