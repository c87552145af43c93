//! Three-tier parameter resolution.
//!
//! Precedence, lowest to highest:
//!
//! 1. built-in defaults ([`PipelineParams::defaults`]),
//! 2. config file values for destinations the pipeline recognizes,
//! 3. CLI options the user explicitly supplied.
//!
//! The CLI layer is sparse (unsupplied options are `None` or empty), so no
//! reconciliation heuristics are needed: an explicit CLI value always wins,
//! even when it happens to equal a default, and config keys the pipeline
//! does not know are silently ignored so one config file can serve several
//! subcommands.

use serde_json::Value;

use super::cli::{conditioning_entry, lora_entries, Cli, Command};
use super::flatten::FlatConfig;
use super::schema::{LoraSpec, PipelineParams, COMFY_REMAP};
use crate::error::{Error, Result};

/// Resolve the final parameter set for one invocation.
pub fn resolve_params(cli: &Cli, config: Option<&FlatConfig>) -> Result<PipelineParams> {
    let mut params = PipelineParams::defaults(cli.command.kind());
    if let Some(config) = config {
        apply_config(&mut params, config)?;
    }
    apply_cli(&mut params, &cli.command)?;
    params.cache_dir = cli.cache_dir.clone();
    Ok(params)
}

fn apply_config(params: &mut PipelineParams, config: &FlatConfig) -> Result<()> {
    for &dest in params.pipeline.destinations() {
        let Some(value) = config.get(dest) else {
            continue;
        };
        match dest {
            "checkpoint_path" => params.checkpoint_path = Some(as_string(dest, value)?),
            "gemma_root" => params.gemma_root = Some(as_string(dest, value)?),
            "spatial_upsampler_path" => {
                params.spatial_upsampler_path = Some(as_string(dest, value)?)
            }
            "prompt" => params.prompt = Some(as_string(dest, value)?),
            "negative_prompt" => params.negative_prompt = Some(as_string(dest, value)?),
            "output_path" => params.output_path = Some(as_string(dest, value)?),
            "seed" => params.seed = as_u64(dest, value)?,
            "height" => params.height = as_u32(dest, value)?,
            "width" => params.width = as_u32(dest, value)?,
            "num_frames" => params.num_frames = as_u32(dest, value)?,
            "frame_rate" => params.frame_rate = as_u32(dest, value)?,
            "lora" => params.lora = loras_from_config(dest, value)?,
            "distilled_lora" => params.distilled_lora = loras_from_config(dest, value)?,
            _ => {}
        }
    }
    Ok(())
}

fn apply_cli(params: &mut PipelineParams, command: &Command) -> Result<()> {
    let common = command.common();
    if let Some(v) = &common.checkpoint_path {
        params.checkpoint_path = Some(v.clone());
    }
    if let Some(v) = &common.gemma_root {
        params.gemma_root = Some(v.clone());
    }
    if let Some(v) = &common.prompt {
        params.prompt = Some(v.clone());
    }
    if let Some(v) = &common.negative_prompt {
        params.negative_prompt = Some(v.clone());
    }
    if let Some(v) = &common.output_path {
        params.output_path = Some(v.clone());
    }
    if let Some(v) = common.seed {
        params.seed = v;
    }
    if let Some(v) = common.height {
        params.height = v;
    }
    if let Some(v) = common.width {
        params.width = v;
    }
    if let Some(v) = common.num_frames {
        params.num_frames = v;
    }
    if let Some(v) = common.frame_rate {
        params.frame_rate = v;
    }
    if !common.lora.is_empty() {
        params.lora = lora_entries(&common.lora)?;
    }
    if let Some(two_stage) = command.two_stage() {
        if !two_stage.distilled_lora.is_empty() {
            params.distilled_lora = lora_entries(&two_stage.distilled_lora)?;
        }
        if let Some(v) = &two_stage.spatial_upsampler_path {
            params.spatial_upsampler_path = Some(v.clone());
        }
    }
    if let Some(tokens) = command.conditioning_tokens() {
        params.video_conditioning = Some(conditioning_entry(tokens)?);
    }
    Ok(())
}

fn as_string(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| invalid(key, "expected a string", value))
}

fn as_u64(key: &str, value: &Value) -> Result<u64> {
    value
        .as_u64()
        .ok_or_else(|| invalid(key, "expected a non-negative integer", value))
}

fn as_u32(key: &str, value: &Value) -> Result<u32> {
    as_u64(key, value)?
        .try_into()
        .map_err(|_| invalid(key, "value out of range", value))
}

fn as_f64(key: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| invalid(key, "expected a number", value))
}

/// Config LoRA entries are either a bare path string or a `[path, strength]`
/// pair; both get the default remap table.
fn loras_from_config(key: &str, value: &Value) -> Result<Vec<LoraSpec>> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid(key, "expected a list", value))?;
    items
        .iter()
        .map(|item| match item {
            Value::String(path) => Ok(LoraSpec::new(path.clone(), 1.0, Some(&COMFY_REMAP))),
            Value::Array(pair) if pair.len() == 2 => {
                let path = as_string(key, &pair[0])?;
                let strength = as_f64(key, &pair[1])?;
                Ok(LoraSpec::new(path, strength, Some(&COMFY_REMAP)))
            }
            other => Err(invalid(key, "expected a path or [path, strength] pair", other)),
        })
        .collect()
}

fn invalid(key: &str, message: &str, value: &Value) -> Error {
    Error::InvalidConfigValue {
        key: key.to_owned(),
        message: format!("{message}, got {value}"),
    }
}
