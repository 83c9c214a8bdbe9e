use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use runway_contracts::catalog::{
    CatalogRow, MatchOptions, MatchResult, OneTotalLook, RelaxationOrder,
};
use runway_contracts::chat::{parse_director_input, DirectorInput, DIRECTOR_HELP_COMMANDS};
use runway_contracts::payload::look_label;
use runway_contracts::scene::{Preset, SceneState};
use runway_engine::{DeltaSource, DirectorSettings, RunwayDirector};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "runway-rs", version, about = "Runway director and catalog styling CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List scene presets.
    Presets,
    /// Generate a look from a brief, match it against a catalog and print the payload.
    Style(StyleArgs),
    /// Interactive director over stdin.
    Director(DirectorArgs),
}

#[derive(Debug, Args)]
struct ModelArgs {
    #[arg(long)]
    text_model: Option<String>,
    #[arg(long)]
    timeout_s: Option<f64>,
}

#[derive(Debug, Parser)]
struct StyleArgs {
    #[arg(long)]
    brief: String,
    #[arg(long)]
    catalog: PathBuf,
    #[arg(long, default_value_t = 0)]
    look_index: usize,
    #[arg(long)]
    strict_gender: bool,
    #[arg(long)]
    gender_first: bool,
    #[arg(long)]
    max_candidates: Option<usize>,
    #[arg(long)]
    preset: Option<String>,
    #[arg(long)]
    events: Option<PathBuf>,
    #[command(flatten)]
    model: ModelArgs,
}

#[derive(Debug, Parser)]
struct DirectorArgs {
    #[arg(long)]
    catalog: PathBuf,
    #[arg(long)]
    look: PathBuf,
    #[arg(long)]
    preset: Option<String>,
    #[arg(long)]
    events: Option<PathBuf>,
    #[command(flatten)]
    model: ModelArgs,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("runway-rs error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Presets => {
            run_presets();
            Ok(0)
        }
        Command::Style(args) => run_style(args),
        Command::Director(args) => {
            run_director(args)?;
            Ok(0)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_presets() {
    for preset in Preset::all() {
        println!("{:<16} {}", preset.id(), preset.description());
    }
}

fn settings_from(args: &ModelArgs) -> DirectorSettings {
    let mut settings = DirectorSettings::from_env().with_text_model(args.text_model.clone());
    if let Some(timeout_s) = args.timeout_s {
        settings = settings.with_timeout_s(timeout_s);
    }
    settings
}

fn build_director(model: &ModelArgs, events: Option<&Path>) -> RunwayDirector {
    let director = RunwayDirector::new(settings_from(model));
    tracing::debug!(session_id = %director.session_id(), "director session created");
    match events {
        Some(path) => director.with_events(path),
        None => director,
    }
}

fn parse_preset_arg(raw: Option<&str>) -> Result<Preset> {
    let Some(raw) = raw else {
        return Ok(Preset::default());
    };
    match Preset::parse(raw) {
        Some(preset) => Ok(preset),
        None => bail!(
            "unknown preset '{raw}' (expected one of: {})",
            preset_ids().join(", ")
        ),
    }
}

fn preset_ids() -> Vec<&'static str> {
    Preset::all().iter().map(|preset| preset.id()).collect()
}

fn load_catalog(path: &Path) -> Result<Vec<CatalogRow>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("catalog {} is not a JSON array of rows", path.display()))
}

fn load_look(path: &Path) -> Result<OneTotalLook> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read look {}", path.display()))?;
    let look: OneTotalLook = serde_json::from_str(&raw)
        .with_context(|| format!("look {} is not a look JSON object", path.display()))?;
    if look.is_empty() {
        bail!("look {} has no outfit items", path.display());
    }
    Ok(look)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_style(args: StyleArgs) -> Result<i32> {
    let preset = parse_preset_arg(args.preset.as_deref())?;
    let catalog = load_catalog(&args.catalog)?;
    let director = build_director(&args.model, args.events.as_deref());

    let generated = director.generate_look(&args.brief);
    if let Some(failure) = &generated.failure {
        eprintln!(
            "Look generation used the {} look after {} attempt(s): {failure}",
            generated.source.as_str(),
            generated.attempts
        );
    }

    let options = MatchOptions {
        order: if args.gender_first {
            RelaxationOrder::GenderFirst
        } else {
            RelaxationOrder::ColorFirst
        },
        allow_unisex: !args.strict_gender,
        max_candidates: args.max_candidates,
    };
    let results = director.match_look(&generated.look, &catalog, &options);
    report_matches(&results);

    let state = SceneState::from_preset(preset);
    let payload = director.build_payload(&results, args.look_index, &state);
    print_json(&payload)?;
    Ok(if payload.items.is_empty() { 2 } else { 0 })
}

fn report_matches(results: &[MatchResult]) {
    for result in results {
        if result.is_unmatched() {
            eprintln!("{}: no item found", result.key());
        } else {
            eprintln!(
                "{}: {} candidate(s) [{}]",
                result.key(),
                result.candidates.len(),
                result.relaxation.tag()
            );
        }
    }
}

fn run_director(args: DirectorArgs) -> Result<()> {
    let preset = parse_preset_arg(args.preset.as_deref())?;
    let catalog = load_catalog(&args.catalog)?;
    let look = load_look(&args.look)?;
    let director = build_director(&args.model, args.events.as_deref());

    let results = director.match_look(&look, &catalog, &MatchOptions::default());
    report_matches(&results);
    let mut look_index = 0usize;
    let mut state = SceneState::from_preset(preset);

    println!("Runway director started. Type /help for commands.");
    print_json(&director.build_payload(&results, look_index, &state))?;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match stdin.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        match parse_director_input(line.trim_end_matches(['\n', '\r'])) {
            DirectorInput::Noop => continue,
            DirectorInput::Help => {
                println!("Commands: {}", DIRECTOR_HELP_COMMANDS.join(" "));
                println!("Anything else is sent to the director as a free-text command.");
            }
            DirectorInput::ListPresets => run_presets(),
            DirectorInput::Quit => break,
            DirectorInput::Show => {
                print_json(&director.build_payload(&results, look_index, &state))?;
            }
            DirectorInput::Reset => {
                state = SceneState::from_preset(preset);
                println!("Scene reset to {}", preset.display_name());
                print_json(&director.build_payload(&results, look_index, &state))?;
            }
            DirectorInput::ApplyPreset(next) => {
                state = director.apply_preset(&state, next);
                println!("Preset set to {}", next.display_name());
                print_json(&director.build_payload(&results, look_index, &state))?;
            }
            DirectorInput::SelectLook(index) => {
                look_index = index;
                println!("Showing {}", look_label(look_index));
                print_json(&director.build_payload(&results, look_index, &state))?;
            }
            DirectorInput::Command(command) => {
                let outcome = director.apply_command(&command, &state);
                match outcome.source {
                    DeltaSource::Model => {
                        println!("Updated: {}", outcome.delta.changed_fields().join(", "));
                    }
                    DeltaSource::KeywordFallback => println!(
                        "Model unavailable ({}); matched preset {}",
                        outcome.fallback_reason.as_deref().unwrap_or("no changes"),
                        outcome.state.scene.preset.display_name()
                    ),
                    DeltaSource::Unchanged => println!(
                        "No changes ({})",
                        outcome.fallback_reason.as_deref().unwrap_or("empty command")
                    ),
                }
                for warning in &outcome.warnings {
                    println!("  note: {warning}");
                }
                state = outcome.state;
                print_json(&director.build_payload(&results, look_index, &state))?;
            }
            DirectorInput::Invalid { command, reason } => {
                println!("/{command}: {reason}");
            }
            DirectorInput::Unknown { command, .. } => {
                println!("Unknown command /{command}. Type /help for commands.");
            }
        }
    }
    Ok(())
}
