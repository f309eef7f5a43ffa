use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

/// Headless host that runs a choreography script against a scene
/// description, with no renderer attached.
#[derive(Parser, Debug)]
#[command(
    about = "Drives scripted actors across a stage without a renderer",
    version
)]
pub struct Args {
    /// Path to the script JSON (actor id -> ordered action list)
    #[arg(long)]
    pub script: PathBuf,

    /// Path to the scene JSON (actor spawns and obstacle positions)
    #[arg(long)]
    pub scene: PathBuf,

    /// Fixed simulation rate in frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Simulated run cap in seconds before the host gives up
    #[arg(long, default_value_t = 120.0)]
    pub max_seconds: f32,

    /// Path to write the per-frame trajectory log as JSON
    #[arg(long)]
    pub trajectory_json: Option<PathBuf>,

    /// Path to write the final per-actor status report as JSON
    #[arg(long)]
    pub status_json: Option<PathBuf>,

    /// Log per-cue detail while running
    #[arg(long)]
    pub verbose: bool,
}

pub fn parse() -> Result<Args> {
    let args = Args::parse();
    args.validate()?;
    Ok(args)
}

impl Args {
    fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            bail!("--fps must be at least 1");
        }
        if !self.max_seconds.is_finite() || self.max_seconds <= 0.0 {
            bail!("--max-seconds must be a positive number");
        }
        Ok(())
    }
}
