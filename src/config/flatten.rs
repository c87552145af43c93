//! Config key normalization and one-level table flattening.
//!
//! Config files address the same destinations the CLI does, so hyphenated
//! keys are rewritten with underscores, and a single level of table nesting
//! is collapsed into `parent_child` keys:
//!
//! ```yaml
//! video-guider-params:
//!   cfg_scale: 3.0
//!   stg_scale: 1.0
//! ```
//!
//! becomes `video_guider_params_cfg_scale` and `video_guider_params_stg_scale`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Flat key -> value mapping produced from a loaded config file.
pub type FlatConfig = BTreeMap<String, Value>;

/// Canonicalize a config key: every hyphen becomes an underscore.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

/// Flatten one level of table nesting.
///
/// A nested table is joined into `parent_child` keys only when every member
/// is a scalar. A table holding any list or table member is kept whole as an
/// opaque leaf value; there is no deeper recursion, and lists are never
/// descended into.
#[must_use]
pub fn flatten(table: Map<String, Value>) -> FlatConfig {
    let mut out = FlatConfig::new();
    for (key, value) in table {
        let key = normalize_key(&key);
        match value {
            Value::Object(inner) if inner.values().all(is_scalar) => {
                for (child, child_value) in inner {
                    out.insert(format!("{key}_{}", normalize_key(&child)), child_value);
                }
            }
            other => {
                out.insert(key, other);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(value: Value) -> Map<String, Value> {
        value.as_object().expect("test value must be a table").clone()
    }

    #[test]
    fn test_normalize_key_hyphens() {
        assert_eq!(normalize_key("a-b-c"), "a_b_c");
        assert_eq!(normalize_key("seed"), "seed");
    }

    #[test]
    fn test_normalize_key_idempotent() {
        assert_eq!(normalize_key(&normalize_key("a-b")), "a_b");
    }

    #[test]
    fn test_flatten_flat_table_is_identity() {
        let out = flatten(table(json!({"prompt": "x", "seed": 42})));
        assert_eq!(out.get("prompt"), Some(&json!("x")));
        assert_eq!(out.get("seed"), Some(&json!(42)));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_flatten_nested_one_level() {
        let out = flatten(table(json!({
            "video_guider_params": {"cfg_scale": 3.0, "stg_scale": 1.0}
        })));
        assert_eq!(out.get("video_guider_params_cfg_scale"), Some(&json!(3.0)));
        assert_eq!(out.get("video_guider_params_stg_scale"), Some(&json!(1.0)));
        assert!(!out.contains_key("video_guider_params"));
    }

    #[test]
    fn test_flatten_list_member_blocks_flattening() {
        let out = flatten(table(json!({"g": {"a": 1, "b": [1, 2]}})));
        assert_eq!(out.get("g"), Some(&json!({"a": 1, "b": [1, 2]})));
        assert!(!out.contains_key("g_a"));
    }

    #[test]
    fn test_flatten_table_member_blocks_flattening() {
        let out = flatten(table(json!({"g": {"a": 1, "b": {"c": 2}}})));
        assert_eq!(out.get("g"), Some(&json!({"a": 1, "b": {"c": 2}})));
    }

    #[test]
    fn test_flatten_normalizes_parent_and_child_keys() {
        let out = flatten(table(json!({"guider-params": {"cfg-scale": 3.0}})));
        assert_eq!(out.get("guider_params_cfg_scale"), Some(&json!(3.0)));
    }

    #[test]
    fn test_flatten_top_level_list_kept() {
        let out = flatten(table(json!({"lora": ["a.safetensors", "b.safetensors"]})));
        assert_eq!(
            out.get("lora"),
            Some(&json!(["a.safetensors", "b.safetensors"]))
        );
    }
}
