use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use forkline_diff::{DiffMode, DiffResult, Line, Ope};
use forkline_engine::{Engine, EngineConfig};
use forkline_text::{StringOp, StringValue};
use forkline_types::{Operation, Owner};
use tracing::debug;

use crate::cli::{Cli, Command, ConfigArgs, DiffArgs, OutputFormat, ReplayArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args, cli.format),
        Command::Replay(args) => cmd_replay(args, cli.format),
        Command::Config(args) => cmd_config(args, cli.format),
    }
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let old = read_text(&args.old)?;
    let new = read_text(&args.new)?;
    let result = forkline_diff::diff(&old, &new, args.mode.into());
    debug!(
        lines = result.lines.len(),
        additions = result.additions(),
        deletions = result.deletions(),
        "computed diff"
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_diff(&result),
    }
    Ok(())
}

fn print_diff(result: &DiffResult) {
    if result.is_unchanged() {
        println!("No changes.");
        return;
    }
    for line in &result.lines {
        println!("{}", render_line(line, result.mode));
    }
    println!(
        "{} {}",
        format!("+{}", result.additions()).green(),
        format!("-{}", result.deletions()).red()
    );
}

fn render_line(line: &Line, mode: DiffMode) -> String {
    let marker = line.ope.marker();
    match (line.ope, mode) {
        (Ope::Keep, _) => format!("{marker}{}", line.text()),
        (Ope::Insert, DiffMode::LineByLine) => format!("{marker}{}", line.text()).green().to_string(),
        (Ope::Delete, DiffMode::LineByLine) => format!("{marker}{}", line.text()).red().to_string(),
        (ope, DiffMode::WordByWord) => {
            let paint = |text: &str| match ope {
                Ope::Insert => text.green(),
                _ => text.red(),
            };
            let mut rendered = paint(marker).to_string();
            for fragment in &line.fragments {
                let piece = paint(fragment.text.as_str());
                if fragment.changed {
                    rendered.push_str(&piece.bold().underline().to_string());
                } else {
                    rendered.push_str(&piece.to_string());
                }
            }
            rendered
        }
    }
}

fn cmd_replay(args: ReplayArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let script = read_text(&args.script)?;
    let ops: Vec<StringOp> = serde_json::from_str(&script)
        .with_context(|| format!("invalid operation script {}", args.script.display()))?;

    let mut engine = replay(&args.initial, ops, config);
    let undone = engine.undo(args.undo);
    if undone < args.undo {
        debug!(requested = args.undo, undone, "history exhausted before undo count");
    }

    match format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "value": engine.value(),
                "version": engine.version(),
                "undone": undone,
                "history": engine.operations(),
                "redo": engine.redo_operations(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("{} {:?}", "Value:".bold(), engine.value().as_str());
            println!("{} {}", "Version:".bold(), engine.version().to_string().cyan());
            if undone > 0 {
                println!("{} {}", "Undone:".bold(), undone);
            }
            println!("{}", "History:".bold());
            for operation in engine.operations() {
                println!("  {} {}", "*".green(), operation);
            }
            for operation in engine.redo_operations() {
                println!("  {} {}", "~".dimmed(), operation.to_string().dimmed());
            }
        }
    }
    Ok(())
}

fn replay(initial: &str, ops: Vec<StringOp>, config: EngineConfig) -> Engine<StringValue> {
    let mut engine =
        Engine::new(Owner::new("forkline"), StringValue::from(initial)).with_config(config);
    for op in ops {
        engine.operate(Operation::new(op), None);
    }
    engine
}

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", toml::to_string(&config)?),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load engine config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
