//! Serde adapters shared by the provider payload types.

use serde::{Deserialize, Deserializer};

/// Decodes an explicit `null` as the type's default.
///
/// Go producers marshal nil slices and maps as `null`, which plain
/// `Vec`/`BTreeMap` deserialization rejects.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Used with `skip_serializing_if` for flags that are omitted when false.
#[allow(clippy::trivially_copy_pass_by_ref, reason = "signature required by serde")]
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Schema for slots that hold an arbitrary embedded object.
pub(crate) fn preserve_unknown_fields(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
    schemars::json_schema!({
        "type": "object",
        "x-kubernetes-preserve-unknown-fields": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        labels: BTreeMap<String, String>,
    }

    #[test]
    fn test_null_decodes_as_empty() {
        let holder: Holder = serde_json::from_str(r#"{"items": null, "labels": null}"#)
            .expect("null collections should decode");
        assert!(holder.items.is_empty());
        assert!(holder.labels.is_empty());
    }

    #[test]
    fn test_missing_decodes_as_empty() {
        let holder: Holder = serde_json::from_str("{}").expect("missing collections should decode");
        assert!(holder.items.is_empty());
        assert!(holder.labels.is_empty());
    }

    #[test]
    fn test_present_values_are_kept() {
        let holder: Holder = serde_json::from_str(r#"{"items": ["a"], "labels": {"k": "v"}}"#)
            .expect("populated collections should decode");
        assert_eq!(holder.items, vec!["a".to_string()]);
        assert_eq!(holder.labels.get("k").map(String::as_str), Some("v"));
    }
}
