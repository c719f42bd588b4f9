// Recursive TOML overrides for node config files (config.toml, app.toml, ...).
//
// Overrides are described as JSON-shaped nested maps so they can come from
// YAML chain specs as well as from code via `serde_json::json!`. Nested maps
// descend into (or create) tables, every other value replaces the key.

use crate::error::ConfigError;
use serde_json::{Map, Value};
use toml_edit::{Array, DocumentMut, InlineTable, Item, Table};

/// Nested key/value tables applied on top of a TOML file
pub type TomlOverrides = Map<String, Value>;

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "table",
    }
}

/// Checks that a per-file override is a table and returns it
pub fn override_table<'a>(file: &str, value: &'a Value) -> Result<&'a TomlOverrides, ConfigError> {
    value.as_object().ok_or_else(|| ConfigError::OverrideNotTable {
        file: file.to_string(),
        kind: json_kind(value),
    })
}

fn to_toml_value(key: &str, value: &Value) -> Result<toml_edit::Value, ConfigError> {
    match value {
        Value::Bool(b) => Ok((*b).into()),
        Value::String(s) => Ok(s.as_str().into()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.into())
            } else if let Some(f) = n.as_f64() {
                Ok(f.into())
            } else {
                Err(ConfigError::UnsupportedTomlValue {
                    key: key.to_string(),
                    reason: format!("number {} out of range", n),
                })
            }
        }
        Value::Array(items) => {
            let mut array = Array::new();
            for item in items {
                array.push(to_toml_value(key, item)?);
            }
            Ok(array.into())
        }
        Value::Object(map) => {
            let mut table = InlineTable::new();
            for (k, v) in map {
                table.insert(k.as_str(), to_toml_value(k, v)?);
            }
            Ok(table.into())
        }
        Value::Null => Err(ConfigError::UnsupportedTomlValue {
            key: key.to_string(),
            reason: "null has no toml representation".to_string(),
        }),
    }
}

/// Recursively merges `overrides` into `table`
pub fn merge_into(table: &mut Table, overrides: &TomlOverrides) -> Result<(), ConfigError> {
    for (key, value) in overrides {
        match value {
            Value::Object(nested) => {
                let child = table.entry(key.as_str()).or_insert_with(toml_edit::table);
                let child = child
                    .as_table_mut()
                    .ok_or_else(|| ConfigError::NotATable { key: key.clone() })?;
                merge_into(child, nested)?;
            }
            other => {
                table.insert(key.as_str(), Item::Value(to_toml_value(key, other)?));
            }
        }
    }
    Ok(())
}

/// Parses `contents`, applies `overrides` and renders the document back
///
/// Formatting and comments of untouched keys are preserved.
pub fn apply_overrides(
    file: &str,
    contents: &str,
    overrides: &TomlOverrides,
) -> Result<String, ConfigError> {
    let mut doc: DocumentMut = contents.parse().map_err(|e: toml_edit::TomlError| {
        ConfigError::Toml {
            file: file.to_string(),
            reason: e.to_string(),
        }
    })?;
    merge_into(doc.as_table_mut(), overrides)?;
    Ok(doc.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CONFIG_TOML: &str = r#"# comment kept
log_level = "info"

[p2p]
persistent_peers = ""
addr_book_strict = true

[rpc]
laddr = "tcp://127.0.0.1:26657"
"#;

    fn overrides(v: Value) -> TomlOverrides {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_nested_override_replaces_and_creates() {
        let o = overrides(json!({
            "log_level": "debug",
            "p2p": {"addr_book_strict": false, "allow_duplicate_ip": true},
            "consensus": {"timeout_commit": "2s"},
            "rpc": {"allowed_origins": ["*"]}
        }));
        let out = apply_overrides("config/config.toml", CONFIG_TOML, &o).unwrap();
        let doc: DocumentMut = out.parse().unwrap();

        assert!(out.starts_with("# comment kept"));
        assert_eq!(doc["log_level"].as_str(), Some("debug"));
        assert_eq!(doc["p2p"]["addr_book_strict"].as_bool(), Some(false));
        assert_eq!(doc["p2p"]["allow_duplicate_ip"].as_bool(), Some(true));
        assert_eq!(doc["p2p"]["persistent_peers"].as_str(), Some(""));
        assert_eq!(doc["consensus"]["timeout_commit"].as_str(), Some("2s"));
        assert_eq!(doc["rpc"]["laddr"].as_str(), Some("tcp://127.0.0.1:26657"));
        let origins = doc["rpc"]["allowed_origins"].as_array().unwrap();
        assert_eq!(origins.get(0).and_then(|v| v.as_str()), Some("*"));
    }

    #[test]
    fn test_numbers_and_floats() {
        let o = overrides(json!({"mempool": {"size": 5000, "ratio": 0.5}}));
        let out = apply_overrides("config/config.toml", "", &o).unwrap();
        let doc: DocumentMut = out.parse().unwrap();
        assert_eq!(doc["mempool"]["size"].as_integer(), Some(5000));
        assert_eq!(doc["mempool"]["ratio"].as_float(), Some(0.5));
    }

    #[test]
    fn test_nesting_into_scalar_fails() {
        let o = overrides(json!({"log_level": {"nested": 1}}));
        let err = apply_overrides("config/config.toml", CONFIG_TOML, &o).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotATable {
                key: "log_level".to_string()
            }
        );
    }

    #[test]
    fn test_null_is_rejected() {
        let o = overrides(json!({"log_level": null}));
        assert!(matches!(
            apply_overrides("config/config.toml", CONFIG_TOML, &o),
            Err(ConfigError::UnsupportedTomlValue { .. })
        ));
    }

    #[test]
    fn test_override_table_rejects_non_tables() {
        let value = json!("not a table");
        assert_eq!(
            override_table("config/app.toml", &value).unwrap_err(),
            ConfigError::OverrideNotTable {
                file: "config/app.toml".to_string(),
                kind: "string"
            }
        );
        assert!(override_table("config/app.toml", &json!({"a": 1})).is_ok());
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let o = overrides(json!({"a": 1}));
        assert!(matches!(
            apply_overrides("config/app.toml", "this is = = not toml", &o),
            Err(ConfigError::Toml { .. })
        ));
    }
}
