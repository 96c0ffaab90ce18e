//! Headless replay of recorded drawing gestures.

mod script;

use anyhow::Context;
use clap::Parser;
use promraw_core::{CanvasSession, DEFAULT_EXPORT_FILENAME, EngineConfig};
use std::path::PathBuf;

/// Replay a gesture script through the drawing engine and export the result.
#[derive(Parser, Debug)]
#[command(name = "promraw-replay", version, about)]
struct CliArgs {
    /// Engine configuration (JSON). Defaults apply when omitted.
    #[arg(short, long, env = "PROMRAW_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Gesture script (JSON) to replay.
    #[arg(short, long, value_name = "SCRIPT.json")]
    script: PathBuf,

    /// Where to write the PNG.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_EXPORT_FILENAME)]
    output: PathBuf,

    /// Print the data URI to stdout instead of writing a file.
    #[arg(long)]
    data_uri: bool,

    /// Seed for the spray tool.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print a submission (prompt plus image) as JSON instead of exporting.
    #[arg(long)]
    prompt: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting promraw-replay");

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let mut session = CanvasSession::with_seed(config, args.seed)?;
    let script = script::Script::load(&args.script)?;
    let summary = script::run(&mut session, &script);
    log::info!(
        "Replayed {} ops: {} applied, {} ignored, {} rejected; {} history entries",
        script.ops.len(),
        summary.applied,
        summary.ignored,
        summary.rejected,
        session.history_depth()
    );

    if let Some(prompt) = &args.prompt {
        let submission = session.prepare_submission(prompt)?;
        println!("{}", serde_json::to_string_pretty(&submission)?);
    } else if args.data_uri {
        println!("{}", session.export_image()?);
    } else {
        let png_data = session.export_png()?;
        std::fs::write(&args.output, &png_data)
            .with_context(|| format!("writing {}", args.output.display()))?;
        log::info!("Wrote {} ({} bytes)", args.output.display(), png_data.len());
    }

    Ok(())
}
