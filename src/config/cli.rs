//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! generar one-stage --checkpoint-path org/repo:model.safetensors \
//!     --gemma-root org/gemma --prompt "a storm over the bay" \
//!     --output-path out.mp4
//! generar --config run.toml two-stages --seed 7
//! generar ic-lora --video-conditioning depth.mp4 0.8 --prompt "..." ...
//! ```
//!
//! Every overridable option is declared sparse (`Option` or a list that is
//! empty when unsupplied), so the parsed result carries provenance: a field
//! is set only when the user actually typed it. The merge in
//! [`super::merge`] relies on that to let explicit CLI values win over
//! config values.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::schema::{LoraSpec, PipelineKind, VideoConditioning, COMFY_REMAP};
use crate::error::{Error, Result};

/// Generar: video generation pipelines
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "generar")]
#[command(version)]
#[command(about = "Video generation CLI. Use subcommands to choose a pipeline.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Optional config file (TOML or YAML). CLI arguments override config.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Model hub cache directory. Defaults to the hub's standard cache.
    #[arg(long, global = true, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,
}

/// Available pipelines
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Single-stage text/image-to-video generation.
    OneStage(CommonArgs),

    /// Two-stage generation with upsampling and distilled LoRA refinement.
    TwoStages(TwoStageArgs),

    /// Fast two-stage distilled pipeline.
    Distilled(TwoStageArgs),

    /// Video-to-video / image-to-video generation with conditioning control.
    IcLora(IcLoraArgs),

    /// Interpolate between keyframe images.
    KeyframeInterp(TwoStageArgs),
}

/// Options shared by every pipeline.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct CommonArgs {
    /// Model checkpoint: local path, `repo:file`, or repository id.
    #[arg(long, value_name = "SPEC")]
    pub checkpoint_path: Option<String>,

    /// Gemma text-encoder root: local path or repository id.
    #[arg(long, value_name = "SPEC")]
    pub gemma_root: Option<String>,

    /// Text prompt describing the video.
    #[arg(long)]
    pub prompt: Option<String>,

    /// What the video should not contain.
    #[arg(long)]
    pub negative_prompt: Option<String>,

    /// Where to write the generated video.
    #[arg(long, value_name = "PATH")]
    pub output_path: Option<String>,

    /// Random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Output width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Number of frames to generate.
    #[arg(long)]
    pub num_frames: Option<u32>,

    /// Playback frame rate.
    #[arg(long)]
    pub frame_rate: Option<u32>,

    /// LoRA to blend in. Strength defaults to 1.0; the optional third value
    /// names the tensor remap table (`comfy` or `none`). Repeatable.
    #[arg(long, num_args = 1..=3, value_names = ["PATH", "STRENGTH", "REMAP"])]
    pub lora: Vec<Vec<String>>,
}

/// Options for the two-stage pipeline family.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct TwoStageArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Distilled refinement LoRA, same shape as --lora. Repeatable.
    #[arg(long, num_args = 1..=3, value_names = ["PATH", "STRENGTH", "REMAP"])]
    pub distilled_lora: Vec<Vec<String>>,

    /// Spatial upsampler checkpoint: local path, `repo:file`, or repository id.
    #[arg(long, value_name = "SPEC")]
    pub spatial_upsampler_path: Option<String>,
}

/// Options for the ic-lora pipeline.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct IcLoraArgs {
    #[command(flatten)]
    pub two_stage: TwoStageArgs,

    /// Conditioning video and its guidance strength.
    #[arg(long, num_args = 2, value_names = ["PATH", "STRENGTH"], required = true)]
    pub video_conditioning: Vec<String>,
}

impl Command {
    #[must_use]
    pub fn kind(&self) -> PipelineKind {
        match self {
            Self::OneStage(_) => PipelineKind::OneStage,
            Self::TwoStages(_) => PipelineKind::TwoStages,
            Self::Distilled(_) => PipelineKind::Distilled,
            Self::IcLora(_) => PipelineKind::IcLora,
            Self::KeyframeInterp(_) => PipelineKind::KeyframeInterp,
        }
    }

    #[must_use]
    pub fn common(&self) -> &CommonArgs {
        match self {
            Self::OneStage(args) => args,
            Self::TwoStages(args) | Self::Distilled(args) | Self::KeyframeInterp(args) => {
                &args.common
            }
            Self::IcLora(args) => &args.two_stage.common,
        }
    }

    #[must_use]
    pub fn two_stage(&self) -> Option<&TwoStageArgs> {
        match self {
            Self::OneStage(_) => None,
            Self::TwoStages(args) | Self::Distilled(args) | Self::KeyframeInterp(args) => {
                Some(args)
            }
            Self::IcLora(args) => Some(&args.two_stage),
        }
    }

    #[must_use]
    pub fn conditioning_tokens(&self) -> Option<&[String]> {
        match self {
            Self::IcLora(args) => Some(&args.video_conditioning),
            _ => None,
        }
    }
}

/// Build LoRA entries from grouped `--lora PATH [STRENGTH] [REMAP]` tokens.
pub fn lora_entries(groups: &[Vec<String>]) -> Result<Vec<LoraSpec>> {
    groups.iter().map(|group| lora_entry(group)).collect()
}

fn lora_entry(group: &[String]) -> Result<LoraSpec> {
    let path = group.first().cloned().ok_or_else(|| Error::InvalidLoraEntry {
        message: "a path is required".into(),
    })?;
    let strength = match group.get(1) {
        Some(raw) => raw.parse::<f64>().map_err(|_| Error::InvalidLoraEntry {
            message: format!("strength `{raw}` is not a number"),
        })?,
        None => 1.0,
    };
    let remap = match group.get(2).map(String::as_str) {
        None | Some("comfy") => Some(&COMFY_REMAP),
        Some("none") => None,
        Some(other) => {
            return Err(Error::InvalidLoraEntry {
                message: format!("unknown remap table `{other}`"),
            })
        }
    };
    Ok(LoraSpec { path, strength, remap })
}

/// Build the conditioning entry from `--video-conditioning PATH STRENGTH`.
pub fn conditioning_entry(tokens: &[String]) -> Result<VideoConditioning> {
    let (path, raw) = match tokens {
        [path, strength] => (path.clone(), strength),
        _ => {
            return Err(Error::InvalidLoraEntry {
                message: "conditioning takes exactly PATH STRENGTH".into(),
            })
        }
    };
    let strength = raw.parse::<f64>().map_err(|_| Error::InvalidLoraEntry {
        message: format!("conditioning strength `{raw}` is not a number"),
    })?;
    Ok(VideoConditioning { path, strength })
}

/// Parse CLI arguments from an iterator (for testing)
pub fn parse_args<I, T>(args: I) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
