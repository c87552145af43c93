//! Parameter resolution: CLI parsing, config files, and the three-tier merge.
//!
//! # Example
//!
//! ```toml
//! # run.toml
//! prompt = "a storm over the bay"
//! seed = 99
//!
//! [guider_params]
//! cfg_scale = 3.0
//! ```
//!
//! ```bash
//! generar --config run.toml one-stage --seed 7   # CLI seed wins
//! ```

mod cli;
mod flatten;
mod loader;
mod merge;
mod schema;


pub use cli::{
    conditioning_entry, lora_entries, parse_args, Cli, Command, CommonArgs, IcLoraArgs,
    TwoStageArgs,
};
pub use flatten::{flatten, normalize_key, FlatConfig};
pub use loader::load_config;
pub use merge::resolve_params;
pub use schema::{
    LoraSpec, PipelineKind, PipelineParams, RemapTable, VideoConditioning, COMFY_REMAP,
    DEFAULT_SEED,
};
