//! Path-based get/set over unstructured objects.
//!
//! Getters distinguish "absent" (`Ok(None)`) from "present with an
//! incompatible type" (`Err`), so callers can treat missing fields as a
//! no-op while still surfacing malformed live state.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("expected object at `{path}`, found {found}")]
    NotAnObject { path: String, found: &'static str },
    #[error("expected {expected} at `{path}`, found {found}")]
    WrongType { path: String, expected: &'static str, found: &'static str },
}

// Error-message path for the container that was expected to be an object;
// the document root renders as "." rather than an empty string.
fn container_path(prefix: &[&str]) -> String {
    if prefix.is_empty() {
        ".".to_string()
    } else {
        prefix.join(".")
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Walk `path` down `root`. Absent steps yield `Ok(None)`; a non-object
/// intermediate yields an error naming the offending prefix.
pub fn nested_value<'a>(root: &'a Value, path: &[&str]) -> Result<Option<&'a Value>, FieldError> {
    let mut cur = root;
    for (i, key) in path.iter().enumerate() {
        match cur {
            Value::Object(map) => match map.get(*key) {
                Some(v) => cur = v,
                None => return Ok(None),
            },
            other => {
                return Err(FieldError::NotAnObject { path: container_path(&path[..i]), found: json_type(other) })
            }
        }
    }
    Ok(Some(cur))
}

pub fn nested_string(root: &Value, path: &[&str]) -> Result<Option<String>, FieldError> {
    match nested_value(root, path)? {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(FieldError::WrongType {
            path: path.join("."),
            expected: "string",
            found: json_type(other),
        }),
    }
}

pub fn nested_i64(root: &Value, path: &[&str]) -> Result<Option<i64>, FieldError> {
    match nested_value(root, path)? {
        None => Ok(None),
        Some(v) => match v.as_i64() {
            Some(n) => Ok(Some(n)),
            None => Err(FieldError::WrongType {
                path: path.join("."),
                expected: "integer",
                found: json_type(v),
            }),
        },
    }
}

pub fn nested_string_map(
    root: &Value,
    path: &[&str],
) -> Result<Option<BTreeMap<String, String>>, FieldError> {
    let map = match nested_value(root, path)? {
        None => return Ok(None),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(FieldError::WrongType {
                path: path.join("."),
                expected: "object",
                found: json_type(other),
            })
        }
    };
    let mut out = BTreeMap::new();
    for (k, v) in map {
        match v {
            Value::String(s) => {
                out.insert(k.clone(), s.clone());
            }
            other => {
                return Err(FieldError::WrongType {
                    path: format!("{}.{}", path.join("."), k),
                    expected: "string",
                    found: json_type(other),
                })
            }
        }
    }
    Ok(Some(out))
}

/// Set `value` at `path`, creating missing intermediate objects. An existing
/// non-object intermediate is an error, never silently replaced.
pub fn set_nested_value(root: &mut Value, path: &[&str], value: Value) -> Result<(), FieldError> {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return Ok(());
    };
    let mut cur = root;
    for (i, key) in parents.iter().enumerate() {
        let map = match cur {
            Value::Object(map) => map,
            other => {
                return Err(FieldError::NotAnObject { path: container_path(&path[..i]), found: json_type(other) })
            }
        };
        cur = map
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    match cur {
        Value::Object(map) => {
            map.insert((*last).to_string(), value);
            Ok(())
        }
        other => Err(FieldError::NotAnObject { path: container_path(parents), found: json_type(other) }),
    }
}

pub fn set_nested_string_map(
    root: &mut Value,
    path: &[&str],
    value: &BTreeMap<String, String>,
) -> Result<(), FieldError> {
    let map: Map<String, Value> = value
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    set_nested_value(root, path, Value::Object(map))
}
