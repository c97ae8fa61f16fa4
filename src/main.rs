//! overlay-replay - drive the overlay engine from a scenario script

use anyhow::Result;
use clap::Parser;

use overlay_engine::cli::{CliArgs, OutputFormat};
use overlay_engine::config::EngineConfig;
use overlay_engine::replay::{self, Script};

fn main() -> Result<()> {
    overlay_engine::tracing::init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };

    let path = overlay_engine::config_paths::resolve_script(&args.script);
    let script = Script::load(&path)?;
    tracing::info!(
        "Replaying {} ({} steps)",
        path.display(),
        script.steps.len()
    );

    let trace = replay::run(script, config)?;

    match args.format {
        OutputFormat::Text => print!("{}", trace.to_text()),
        OutputFormat::Json => println!("{}", trace.to_json()?),
    }

    Ok(())
}
