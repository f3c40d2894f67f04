//! Key-by-key merge of a loaded JSON document over typed defaults.
//!
//! Each leaf of the loaded document is applied only if the result still
//! deserializes as `T`. Wrong-typed values and unknown keys are skipped; the
//! readable keys of a damaged file still apply.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Merges `overlay` over `defaults`, skipping anything `T` cannot accept.
pub fn merge_over_defaults<T>(defaults: T, overlay: &Value) -> T
where
    T: Serialize + DeserializeOwned,
{
    if !overlay.is_object() {
        tracing::warn!("settings document is not an object; using defaults");
        return defaults;
    }

    let mut merged = match serde_json::to_value(&defaults) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "could not encode default settings");
            return defaults;
        }
    };

    let accepts = |candidate: &Value| serde_json::from_value::<T>(candidate.clone()).is_ok();
    let mut path = Vec::new();
    apply(&mut merged, overlay, &mut path, &accepts);

    serde_json::from_value(merged).unwrap_or(defaults)
}

fn apply(root: &mut Value, overlay: &Value, path: &mut Vec<String>, accepts: &dyn Fn(&Value) -> bool) {
    let Value::Object(entries) = overlay else {
        return;
    };

    for (key, value) in entries {
        path.push(key.clone());
        let pointer = json_pointer(path);

        match root.pointer(&pointer).map(Value::is_object) {
            None => {
                tracing::debug!(key = %path.join("."), "unknown settings key ignored");
            }
            Some(true) if value.is_object() => apply(root, value, path, accepts),
            Some(_) => {
                let mut candidate = root.clone();
                if let Some(slot) = candidate.pointer_mut(&pointer) {
                    *slot = value.clone();
                }
                if accepts(&candidate) {
                    *root = candidate;
                } else {
                    tracing::warn!(
                        key = %path.join("."),
                        value = %value,
                        "settings value has the wrong type; keeping default"
                    );
                }
            }
        }

        path.pop();
    }
}

fn json_pointer(path: &[String]) -> String {
    path.iter()
        .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Inner {
        left: String,
        right: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        size: u32,
        ratio: f64,
        flag: bool,
        inner: Inner,
    }

    fn defaults() -> Sample {
        Sample {
            size: 24,
            ratio: 0.5,
            flag: true,
            inner: Inner {
                left: "a".into(),
                right: "b".into(),
            },
        }
    }

    #[test]
    fn test_partial_document() {
        let merged = merge_over_defaults(defaults(), &json!({"size": 18}));
        assert_eq!(merged, Sample { size: 18, ..defaults() });
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(merge_over_defaults(defaults(), &json!({})), defaults());
    }

    #[test]
    fn test_wrong_type_is_skipped() {
        let merged = merge_over_defaults(defaults(), &json!({"size": "big", "flag": false}));
        assert_eq!(merged.size, 24);
        assert!(!merged.flag);
    }

    #[test]
    fn test_negative_for_unsigned_is_skipped() {
        let merged = merge_over_defaults(defaults(), &json!({"size": -4}));
        assert_eq!(merged.size, 24);
    }

    #[test]
    fn test_integer_accepted_for_float() {
        let merged = merge_over_defaults(defaults(), &json!({"ratio": 1}));
        assert_eq!(merged.ratio, 1.0);
    }

    #[test]
    fn test_nested_partial_merge() {
        let merged = merge_over_defaults(defaults(), &json!({"inner": {"right": "z"}}));
        assert_eq!(merged.inner.left, "a");
        assert_eq!(merged.inner.right, "z");
    }

    #[test]
    fn test_nested_replaced_by_scalar_is_skipped() {
        let merged = merge_over_defaults(defaults(), &json!({"inner": 3}));
        assert_eq!(merged.inner, defaults().inner);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let merged = merge_over_defaults(defaults(), &json!({"other": 1, "a/b": 2}));
        assert_eq!(merged, defaults());
    }

    #[test]
    fn test_non_object_document() {
        assert_eq!(merge_over_defaults(defaults(), &json!([1, 2])), defaults());
    }
}
