//! # Generar: Video Generation CLI
//!
//! Command-line front end for the video generation pipelines: it selects a
//! pipeline subcommand, merges parameters from built-in defaults, an
//! optional TOML/YAML config file, and explicit CLI flags, then resolves
//! model/LoRA path specifiers into concrete local paths via the model hub.
//!
//! ## Architecture
//!
//! - **config**: CLI surface, config file loading/flattening, and the
//!   three-tier parameter merge (defaults, config, CLI)
//! - **resolve**: model path classification and the hub transport
//! - **pipelines**: entry points handed the resolved parameter set
//!
//! ## Usage
//!
//! ```bash
//! # Explicit flags only
//! generar one-stage --checkpoint-path org/repo:model.safetensors \
//!     --gemma-root org/gemma --prompt "a storm over the bay" \
//!     --output-path out.mp4
//!
//! # Config file with per-run overrides
//! generar --config run.toml two-stages --seed 7
//! ```

pub mod config;
pub mod error;
pub mod pipelines;
pub mod resolve;

pub use error::{Error, Result};
