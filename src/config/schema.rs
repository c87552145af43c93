//! Pipeline parameter schema: destinations, built-in defaults, LoRA entries.

use std::fmt;
use std::path::PathBuf;

/// Default random seed shared by every pipeline.
pub const DEFAULT_SEED: u64 = 10;

/// Structural tensor-renaming table applied when a LoRA checkpoint's naming
/// does not match the runtime layout. Carried through parameter resolution
/// unchanged; only the loader consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct RemapTable {
    pub name: &'static str,
    pub rules: &'static [(&'static str, &'static str)],
}

/// Renames ComfyUI-exported LoRA tensors to the runtime layout.
pub static COMFY_REMAP: RemapTable = RemapTable {
    name: "comfy",
    rules: &[
        ("lora_unet_", "model.diffusion_model."),
        ("diffusion_model.", "model.diffusion_model."),
    ],
};

/// One LoRA to blend in: where to load it from, how strongly, and which
/// renaming table to apply to its tensors.
#[derive(Debug, Clone, PartialEq)]
pub struct LoraSpec {
    pub path: String,
    pub strength: f64,
    pub remap: Option<&'static RemapTable>,
}

impl LoraSpec {
    #[must_use]
    pub fn new(path: impl Into<String>, strength: f64, remap: Option<&'static RemapTable>) -> Self {
        Self {
            path: path.into(),
            strength,
            remap,
        }
    }
}

/// A conditioning video and its guidance strength.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoConditioning {
    pub path: String,
    pub strength: f64,
}

/// The five generation pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    OneStage,
    TwoStages,
    Distilled,
    IcLora,
    KeyframeInterp,
}

const ONE_STAGE_DESTINATIONS: &[&str] = &[
    "checkpoint_path",
    "gemma_root",
    "prompt",
    "negative_prompt",
    "output_path",
    "seed",
    "height",
    "width",
    "num_frames",
    "frame_rate",
    "lora",
];

const TWO_STAGE_DESTINATIONS: &[&str] = &[
    "checkpoint_path",
    "gemma_root",
    "prompt",
    "negative_prompt",
    "output_path",
    "seed",
    "height",
    "width",
    "num_frames",
    "frame_rate",
    "lora",
    "distilled_lora",
    "spatial_upsampler_path",
];

impl PipelineKind {
    /// Destination names this pipeline's option set recognizes. Config keys
    /// outside this set are ignored for the pipeline.
    #[must_use]
    pub fn destinations(self) -> &'static [&'static str] {
        match self {
            Self::OneStage => ONE_STAGE_DESTINATIONS,
            Self::TwoStages | Self::Distilled | Self::IcLora | Self::KeyframeInterp => {
                TWO_STAGE_DESTINATIONS
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneStage => "one-stage",
            Self::TwoStages => "two-stages",
            Self::Distilled => "distilled",
            Self::IcLora => "ic-lora",
            Self::KeyframeInterp => "keyframe-interp",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved parameters for one pipeline invocation.
///
/// Produced by the three-tier merge and rewritten in place by the path
/// resolution pass; owned by the invocation and handed to the pipeline
/// entry function.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineParams {
    pub pipeline: PipelineKind,
    pub checkpoint_path: Option<String>,
    pub gemma_root: Option<String>,
    pub spatial_upsampler_path: Option<String>,
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub output_path: Option<String>,
    pub seed: u64,
    pub height: u32,
    pub width: u32,
    pub num_frames: u32,
    pub frame_rate: u32,
    pub lora: Vec<LoraSpec>,
    pub distilled_lora: Vec<LoraSpec>,
    pub video_conditioning: Option<VideoConditioning>,
    pub cache_dir: Option<PathBuf>,
}

impl PipelineParams {
    /// Built-in defaults: the lowest merge tier, immutable by construction.
    #[must_use]
    pub fn defaults(pipeline: PipelineKind) -> Self {
        Self {
            pipeline,
            checkpoint_path: None,
            gemma_root: None,
            spatial_upsampler_path: None,
            prompt: None,
            negative_prompt: None,
            output_path: None,
            seed: DEFAULT_SEED,
            height: 512,
            width: 704,
            num_frames: 121,
            frame_rate: 25,
            lora: Vec::new(),
            distilled_lora: Vec::new(),
            video_conditioning: None,
            cache_dir: None,
        }
    }
}
