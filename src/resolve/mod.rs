//! Model path resolution.
//!
//! A path-like specifier names a model artifact one of three ways:
//!
//! - an existing local file or directory, used as-is,
//! - `repo:file`, a single file inside a hub repository,
//! - a bare repository id, meaning the whole repository snapshot.
//!
//! The resolution pass rewrites every model/LoRA-bearing field of the
//! resolved parameter set to a concrete local path, downloading through the
//! [`HubTransport`] when the specifier is remote.

mod hub;

pub use hub::{HfHub, HubTransport};

use std::path::{Path, PathBuf};

use crate::config::{LoraSpec, PipelineParams};
use crate::error::Result;

/// Expand a leading `~` to the user's home directory.
pub(crate) fn expand_user(spec: &str) -> PathBuf {
    if spec == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = spec.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(spec)
}

/// Absolute path rendered with forward-slash separators.
fn posix_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolve a model specifier to a concrete local path.
///
/// An existing local path short-circuits all remote logic and is returned
/// absolute and normalized. Otherwise a specifier containing a colon is
/// split on the first colon into repository id and filename for a
/// single-file download; anything else is treated as a repository id for a
/// full snapshot download. Whitespace around the colon-separated parts is
/// insignificant.
///
/// # Errors
///
/// Download failures propagate from the hub transport untranslated.
pub fn resolve_model_path(
    spec: &str,
    cache_dir: Option<&Path>,
    hub: &dyn HubTransport,
) -> Result<String> {
    let expanded = expand_user(spec);
    if expanded.exists() {
        return Ok(posix_string(&expanded.canonicalize()?));
    }
    if let Some((repo_id, filename)) = spec.split_once(':') {
        let local = hub.download_file(repo_id.trim(), filename.trim(), cache_dir)?;
        return Ok(posix_string(&local));
    }
    let local_dir = hub.download_snapshot(spec.trim(), cache_dir)?;
    Ok(posix_string(&local_dir))
}

fn resolve_field(
    field: &mut Option<String>,
    cache_dir: Option<&Path>,
    hub: &dyn HubTransport,
) -> Result<()> {
    let Some(value) = field.as_deref() else {
        return Ok(());
    };
    if expand_user(value).exists() {
        return Ok(());
    }
    let resolved = resolve_model_path(value, cache_dir, hub)?;
    *field = Some(resolved);
    Ok(())
}

fn resolve_lora_list(
    entries: &mut Vec<LoraSpec>,
    cache_dir: Option<&Path>,
    hub: &dyn HubTransport,
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let mut resolved = Vec::with_capacity(entries.len());
    for entry in entries.iter() {
        let path = if expand_user(&entry.path).exists() {
            entry.path.clone()
        } else {
            resolve_model_path(&entry.path, cache_dir, hub)?
        };
        resolved.push(LoraSpec {
            path,
            strength: entry.strength,
            remap: entry.remap,
        });
    }
    *entries = resolved;
    Ok(())
}

/// Rewrite every model/LoRA-bearing field of `params` to a local path.
///
/// Scalar fields (`checkpoint_path`, `gemma_root`,
/// `spatial_upsampler_path`) that are unset or already point at an existing
/// local path are left alone. LoRA lists are rebuilt in order with each
/// entry's strength and remap table carried through unchanged; strengths
/// apply positionally downstream, so order is significant.
pub fn resolve_params_paths(params: &mut PipelineParams, hub: &dyn HubTransport) -> Result<()> {
    let cache_dir = params.cache_dir.clone();
    let cache_dir = cache_dir.as_deref();
    resolve_field(&mut params.checkpoint_path, cache_dir, hub)?;
    resolve_field(&mut params.gemma_root, cache_dir, hub)?;
    resolve_field(&mut params.spatial_upsampler_path, cache_dir, hub)?;
    resolve_lora_list(&mut params.lora, cache_dir, hub)?;
    resolve_lora_list(&mut params.distilled_lora, cache_dir, hub)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PipelineKind, COMFY_REMAP};
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq)]
    enum Call {
        File {
            repo_id: String,
            filename: String,
            cache_dir: Option<PathBuf>,
        },
        Snapshot {
            repo_id: String,
            cache_dir: Option<PathBuf>,
        },
    }

    #[derive(Default)]
    struct FakeHub {
        calls: RefCell<Vec<Call>>,
    }

    impl HubTransport for FakeHub {
        fn download_file(
            &self,
            repo_id: &str,
            filename: &str,
            cache_dir: Option<&Path>,
        ) -> Result<PathBuf> {
            self.calls.borrow_mut().push(Call::File {
                repo_id: repo_id.to_owned(),
                filename: filename.to_owned(),
                cache_dir: cache_dir.map(Path::to_path_buf),
            });
            Ok(PathBuf::from(format!("/cache/{repo_id}/{filename}")))
        }

        fn download_snapshot(&self, repo_id: &str, cache_dir: Option<&Path>) -> Result<PathBuf> {
            self.calls.borrow_mut().push(Call::Snapshot {
                repo_id: repo_id.to_owned(),
                cache_dir: cache_dir.map(Path::to_path_buf),
            });
            Ok(PathBuf::from(format!("/cache/{repo_id}")))
        }
    }

    #[test]
    fn test_existing_dir_short_circuits() {
        let dir = TempDir::new().unwrap();
        let hub = FakeHub::default();
        let out = resolve_model_path(dir.path().to_str().unwrap(), None, &hub).unwrap();
        assert_eq!(out, posix_string(&dir.path().canonicalize().unwrap()));
        assert!(hub.calls.borrow().is_empty());
    }

    #[test]
    fn test_existing_file_short_circuits() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("foo.safetensors");
        std::fs::write(&file, "x").unwrap();
        let hub = FakeHub::default();
        let out = resolve_model_path(file.to_str().unwrap(), None, &hub).unwrap();
        assert_eq!(out, posix_string(&file.canonicalize().unwrap()));
        assert!(hub.calls.borrow().is_empty());
    }

    #[test]
    fn test_repo_colon_filename_downloads_file() {
        let hub = FakeHub::default();
        let out = resolve_model_path("org/repo:file.safetensors", None, &hub).unwrap();
        assert_eq!(out, "/cache/org/repo/file.safetensors");
        assert_eq!(
            *hub.calls.borrow(),
            vec![Call::File {
                repo_id: "org/repo".into(),
                filename: "file.safetensors".into(),
                cache_dir: None,
            }]
        );
    }

    #[test]
    fn test_repo_colon_filename_whitespace_stripped() {
        let hub = FakeHub::default();
        resolve_model_path("  org/repo  :  file.safetensors  ", None, &hub).unwrap();
        assert_eq!(
            *hub.calls.borrow(),
            vec![Call::File {
                repo_id: "org/repo".into(),
                filename: "file.safetensors".into(),
                cache_dir: None,
            }]
        );
    }

    #[test]
    fn test_split_on_first_colon_only() {
        let hub = FakeHub::default();
        resolve_model_path("org/repo:sub:file.safetensors", None, &hub).unwrap();
        assert_eq!(
            *hub.calls.borrow(),
            vec![Call::File {
                repo_id: "org/repo".into(),
                filename: "sub:file.safetensors".into(),
                cache_dir: None,
            }]
        );
    }

    #[test]
    fn test_bare_repo_downloads_snapshot() {
        let hub = FakeHub::default();
        let out = resolve_model_path("org/repo", None, &hub).unwrap();
        assert_eq!(out, "/cache/org/repo");
        assert_eq!(
            *hub.calls.borrow(),
            vec![Call::Snapshot {
                repo_id: "org/repo".into(),
                cache_dir: None,
            }]
        );
    }

    #[test]
    fn test_cache_dir_forwarded() {
        let hub = FakeHub::default();
        let cache = PathBuf::from("/custom/cache");
        resolve_model_path("a/b:c.safetensors", Some(&cache), &hub).unwrap();
        resolve_model_path("a/b", Some(&cache), &hub).unwrap();
        let calls = hub.calls.borrow();
        assert!(matches!(&calls[0], Call::File { cache_dir: Some(d), .. } if d == &cache));
        assert!(matches!(&calls[1], Call::Snapshot { cache_dir: Some(d), .. } if d == &cache));
    }

    #[test]
    fn test_resolution_idempotent_on_local_paths() {
        let dir = TempDir::new().unwrap();
        let hub = FakeHub::default();
        let once = resolve_model_path(dir.path().to_str().unwrap(), None, &hub).unwrap();
        let twice = resolve_model_path(&once, None, &hub).unwrap();
        assert_eq!(once, twice);
        assert!(hub.calls.borrow().is_empty());
    }

    #[test]
    fn test_params_pass_skips_existing_and_unset_fields() {
        let dir = TempDir::new().unwrap();
        let hub = FakeHub::default();
        let mut params = PipelineParams::defaults(PipelineKind::OneStage);
        params.checkpoint_path = Some(dir.path().to_string_lossy().into_owned());
        resolve_params_paths(&mut params, &hub).unwrap();
        // Existing local path kept verbatim, no hub traffic, unset fields left unset.
        assert_eq!(
            params.checkpoint_path.as_deref(),
            Some(dir.path().to_string_lossy().as_ref())
        );
        assert!(params.gemma_root.is_none());
        assert!(hub.calls.borrow().is_empty());
    }

    #[test]
    fn test_params_pass_resolves_remote_scalars() {
        let dir = TempDir::new().unwrap();
        let hub = FakeHub::default();
        let mut params = PipelineParams::defaults(PipelineKind::TwoStages);
        params.checkpoint_path = Some("org/repo:ckpt.safetensors".into());
        params.gemma_root = Some(dir.path().to_string_lossy().into_owned());
        params.spatial_upsampler_path = Some("org/upsampler".into());
        resolve_params_paths(&mut params, &hub).unwrap();
        assert_eq!(
            params.checkpoint_path.as_deref(),
            Some("/cache/org/repo/ckpt.safetensors")
        );
        assert_eq!(params.spatial_upsampler_path.as_deref(), Some("/cache/org/upsampler"));
        assert_eq!(hub.calls.borrow().len(), 2);
    }

    #[test]
    fn test_params_pass_preserves_lora_metadata_and_order() {
        let hub = FakeHub::default();
        let mut params = PipelineParams::defaults(PipelineKind::OneStage);
        params.lora = vec![
            LoraSpec::new("org/repo:a.safetensors", 0.8, Some(&COMFY_REMAP)),
            LoraSpec::new("org/repo:b.safetensors", 0.4, None),
        ];
        resolve_params_paths(&mut params, &hub).unwrap();
        assert_eq!(params.lora.len(), 2);
        assert_eq!(params.lora[0].path, "/cache/org/repo/a.safetensors");
        assert_eq!(params.lora[0].strength, 0.8);
        assert_eq!(params.lora[0].remap, Some(&COMFY_REMAP));
        assert_eq!(params.lora[1].path, "/cache/org/repo/b.safetensors");
        assert_eq!(params.lora[1].strength, 0.4);
        assert_eq!(params.lora[1].remap, None);
    }

    #[test]
    fn test_params_pass_uses_params_cache_dir() {
        let hub = FakeHub::default();
        let mut params = PipelineParams::defaults(PipelineKind::OneStage);
        params.cache_dir = Some(PathBuf::from("/hf"));
        params.checkpoint_path = Some("org/repo".into());
        resolve_params_paths(&mut params, &hub).unwrap();
        assert!(matches!(
            &hub.calls.borrow()[0],
            Call::Snapshot { cache_dir: Some(d), .. } if d == &PathBuf::from("/hf")
        ));
    }
}
