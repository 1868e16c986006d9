//! Resource tags for the distribution.

use serde::Serialize;
use serde_json::Value;

use super::error::{MapResult, MappingError};
use super::fields::Fields;
use super::{canonical_entity, ExternalForm};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    key: String,
    value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl ExternalForm for Tag {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            key: fields.required_str("Key")?,
            value: fields.required_str("Value")?,
        })
    }
}

/// A flat tag list. Serialized as `{"Items": [...]}` without a quantity, as `TagResource` and
/// `CreateDistributionWithTags` expect. Duplicate keys are not checked.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tags {
    #[serde(rename = "Items")]
    items: Vec<Tag>,
}

impl Tags {
    pub fn new(items: Vec<Tag>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Tag] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }
}

impl ExternalForm for Tags {
    /// A bare list of `{Key, Value}`, or `{"Items": [...]}`
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let entries = match value {
            Value::Array(entries) => entries.as_slice(),
            Value::Object(map) => match map.get("Items") {
                Some(Value::Array(entries)) => entries.as_slice(),
                Some(other) => return Err(MappingError::type_mismatch("Items", "a list", other)),
                None => return Err(MappingError::missing("Items")),
            },
            other => {
                return Err(MappingError::type_mismatch(
                    "",
                    "a list of {Key, Value} mappings",
                    other,
                ))
            }
        };

        let items = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Tag::from_external_form(entry).map_err(|e| e.at(&format!("[{}]", index)))
            })
            .collect::<MapResult<Vec<Tag>>>()?;
        Ok(Self { items })
    }
}

canonical_entity!(Tag, Tags);
