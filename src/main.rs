//! Generar CLI
//!
//! # Usage
//!
//! ```bash
//! generar one-stage --prompt "a storm over the bay" ...
//! generar --config run.toml distilled
//! generar ic-lora --video-conditioning depth.mp4 0.8 ...
//! ```

use clap::Parser;
use std::process::ExitCode;

use generar::config::{load_config, resolve_params, Cli};
use generar::pipelines;
use generar::resolve::{resolve_params_paths, HfHub};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> generar::Result<()> {
    let config = match &cli.config {
        Some(path) => Some(load_config(path)?),
        None => None,
    };
    let mut params = resolve_params(&cli, config.as_ref())?;
    resolve_params_paths(&mut params, &HfHub::new())?;
    pipelines::run(&params)
}
