//! Field access and coercion shared by every entity parser.
//!
//! CloudFormation custom resources receive all parameters through a JSON document in which booleans
//! and numbers frequently arrive as strings. The helpers here normalize those values in one place so
//! that every boolean field accepts exactly the same tokens and every integer field applies the same
//! parse-then-range-check sequence.

use serde_json::{Map, Value};
use std::ops::RangeInclusive;

use super::error::{MapResult, MappingError};
use super::ExternalForm;

/// Strings accepted as `true` (compared case-insensitively)
pub const TRUE_TOKENS: [&str; 5] = ["yes", "true", "t", "y", "1"];
/// Strings accepted as `false` (compared case-insensitively)
pub const FALSE_TOKENS: [&str; 5] = ["no", "false", "f", "n", "0"];

/// One year in seconds, the ceiling for every TTL CloudFront accepts
pub const MAX_TTL_SECONDS: i64 = 31_536_000;

/// Range shared by all TTL fields
pub const TTL_RANGE: RangeInclusive<i64> = 0..=MAX_TTL_SECONDS;

/// Interpret a bool-like string. `None` when the token is not recognized.
pub fn str_to_bool(raw: &str) -> Option<bool> {
    let lowered = raw.to_lowercase();
    if TRUE_TOKENS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Native boolean or bool-like string
pub fn parse_bool(path: &str, value: &Value) -> MapResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => str_to_bool(s).ok_or_else(|| {
            MappingError::type_mismatch(path, "a bool or bool-like string", value)
        }),
        other => Err(MappingError::type_mismatch(
            path,
            "a bool or bool-like string",
            other,
        )),
    }
}

/// Native integer or numeric string, range checked after coercion
pub fn parse_int(path: &str, value: &Value, range: RangeInclusive<i64>) -> MapResult<i64> {
    let parsed = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if n.is_u64() {
                // Larger than any range we check.
                return Err(out_of_range(path, &range, &n.to_string()));
            } else {
                return Err(MappingError::type_mismatch(
                    path,
                    "an integer or numeric string",
                    value,
                ));
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            MappingError::type_mismatch(path, "an integer or numeric string", value)
        })?,
        other => {
            return Err(MappingError::type_mismatch(
                path,
                "an integer or numeric string",
                other,
            ))
        }
    };

    if !range.contains(&parsed) {
        return Err(out_of_range(path, &range, &parsed.to_string()));
    }
    Ok(parsed)
}

fn out_of_range(path: &str, range: &RangeInclusive<i64>, got: &str) -> MappingError {
    MappingError::invalid(
        path,
        format!(
            "must be between {} and {}. got: {}",
            range.start(),
            range.end(),
            got
        ),
    )
}

/// Strings are never coerced from other types
pub fn parse_string(path: &str, value: &Value) -> MapResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| MappingError::type_mismatch(path, "a string", value))
}

/// Entries of a list-valued field.
///
/// Accepts a bare list (CloudFormation form) or a `{Quantity, Items}` mapping (API form). In the
/// mapping form `Items` may be absent when the quantity is zero, and a stated `Quantity` has to
/// agree with the number of items.
pub fn list_entries(value: &Value) -> MapResult<&[Value]> {
    match value {
        Value::Array(entries) => Ok(entries.as_slice()),
        Value::Object(map) => {
            let entries: &[Value] = match map.get("Items") {
                None | Some(Value::Null) => &[],
                Some(Value::Array(items)) => items.as_slice(),
                Some(other) => {
                    return Err(MappingError::type_mismatch("Items", "a list", other));
                }
            };
            if let Some(quantity) = map.get("Quantity").filter(|q| !q.is_null()) {
                let quantity = parse_int("Quantity", quantity, 0..=i64::MAX)?;
                if quantity as usize != entries.len() {
                    return Err(MappingError::invalid(
                        "Quantity",
                        format!(
                            "does not match the number of items. got Quantity: {}, items: {}",
                            quantity,
                            entries.len()
                        ),
                    ));
                }
            }
            Ok(entries)
        }
        other => Err(MappingError::type_mismatch(
            "",
            "a list or a {Quantity, Items} mapping",
            other,
        )),
    }
}

/// Read-only view over an input mapping.
///
/// Keys holding JSON `null` are treated as absent.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn of(value: &'a Value) -> MapResult<Self> {
        match value {
            Value::Object(map) => Ok(Self { map }),
            other => Err(MappingError::type_mismatch("", "a mapping", other)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// First present key among alternative spellings of the same field.
    ///
    /// Fails when more than one spelling is present.
    pub fn one_of(&self, keys: &[&'static str]) -> MapResult<Option<(&'static str, &'a Value)>> {
        let mut found: Option<(&'static str, &'a Value)> = None;
        for key in keys {
            if let Some(value) = self.get(key) {
                if let Some((first, _)) = found {
                    return Err(MappingError::invalid(
                        *key,
                        format!("conflicts with '{}'; supply only one of them", first),
                    ));
                }
                found = Some((key, value));
            }
        }
        Ok(found)
    }

    pub fn required(&self, key: &str) -> MapResult<&'a Value> {
        self.get(key).ok_or_else(|| MappingError::missing(key))
    }

    pub fn required_str(&self, key: &str) -> MapResult<String> {
        parse_string(key, self.required(key)?)
    }

    pub fn optional_str(&self, key: &str) -> MapResult<Option<String>> {
        self.get(key).map(|v| parse_string(key, v)).transpose()
    }

    pub fn str_or(&self, key: &str, default: &str) -> MapResult<String> {
        Ok(self
            .optional_str(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    pub fn required_bool(&self, key: &str) -> MapResult<bool> {
        parse_bool(key, self.required(key)?)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> MapResult<bool> {
        match self.get(key) {
            Some(v) => parse_bool(key, v),
            None => Ok(default),
        }
    }

    pub fn optional_int(&self, key: &str, range: RangeInclusive<i64>) -> MapResult<Option<i64>> {
        self.get(key).map(|v| parse_int(key, v, range)).transpose()
    }

    pub fn int_or(&self, key: &str, range: RangeInclusive<i64>, default: i64) -> MapResult<i64> {
        Ok(self.optional_int(key, range)?.unwrap_or(default))
    }

    /// Nested entity under `key`, errors prefixed with the key
    pub fn optional_entity<T: ExternalForm>(&self, key: &str) -> MapResult<Option<T>> {
        self.get(key)
            .map(|v| T::from_external_form(v).map_err(|e| e.at(key)))
            .transpose()
    }

    pub fn required_entity<T: ExternalForm>(&self, key: &str) -> MapResult<T> {
        T::from_external_form(self.required(key)?).map_err(|e| e.at(key))
    }

    pub fn entity_or<T: ExternalForm>(&self, key: &str, default: impl FnOnce() -> T) -> MapResult<T> {
        Ok(self.optional_entity(key)?.unwrap_or_else(default))
    }
}
