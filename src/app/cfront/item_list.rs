//! The quantity/items list wrapper used by every list-valued CloudFront field.
//!
//! CloudFront never takes a bare JSON array. Lists travel as `{"Quantity": N, "Items": [...]}`,
//! and `Items` must be left out when `N` is zero. [`ItemList`] stores only the entries; the
//! quantity is derived when serializing, so the two can never disagree.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::error::{MapResult, MappingError};
use super::fields::{list_entries, parse_int};
use super::{canonical_entity, CanonicalForm, ExternalForm};

/// An entry type that can appear inside an [`ItemList`]
pub trait ListItem: Sized {
    /// Whether an empty list is acceptable input
    const ALLOW_EMPTY: bool = true;

    fn from_list_entry(value: &Value) -> MapResult<Self>;
}

/// Entries plus the derived quantity
#[derive(Debug, Clone)]
pub struct ItemList<T> {
    items: Vec<T>,
}

impl<T> ItemList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn quantity(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: ListItem> ItemList<T> {
    /// Parse a bare list or a `{Quantity, Items}` mapping, rejecting an empty one.
    pub fn from_non_empty(value: &Value) -> MapResult<Self> {
        let list = Self::parse_entries(value)?;
        if list.is_empty() {
            return Err(MappingError::invalid("", "cannot be an empty list"));
        }
        Ok(list)
    }

    fn parse_entries(value: &Value) -> MapResult<Self> {
        let items = list_entries(value)?
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                T::from_list_entry(entry).map_err(|e| e.at(&format!("[{}]", index)))
            })
            .collect::<MapResult<Vec<T>>>()?;
        Ok(Self { items })
    }
}

impl<T: ListItem> ExternalForm for ItemList<T> {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        if T::ALLOW_EMPTY {
            Self::parse_entries(value)
        } else {
            Self::from_non_empty(value)
        }
    }
}

impl<T: Serialize> Serialize for ItemList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = if self.items.is_empty() { 1 } else { 2 };
        let mut map = serializer.serialize_map(Some(entries))?;
        map.serialize_entry("Quantity", &self.items.len())?;
        if !self.items.is_empty() {
            map.serialize_entry("Items", &self.items)?;
        }
        map.end()
    }
}

impl<T: Serialize> CanonicalForm for ItemList<T> {}

impl<T: Serialize> PartialEq for ItemList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.to_canonical_form() == other.to_canonical_form()
    }
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T> IntoIterator for &'a ItemList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Strings are taken as-is, integers are rendered as their decimal text.
impl ListItem for String {
    fn from_list_entry(value: &Value) -> MapResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
            other => Err(MappingError::type_mismatch(
                "",
                "a string or integer",
                other,
            )),
        }
    }
}

/// HTTP status codes for origin failover
impl ListItem for i64 {
    fn from_list_entry(value: &Value) -> MapResult<Self> {
        parse_int("", value, 0..=999)
    }
}

/// Aliases, header names, cookie names, query string keys, trusted signers
pub type StringListItems = ItemList<String>;

/// Status codes that trigger origin failover
pub type StatusCodes = ItemList<i64>;

/// TLS protocols CloudFront may use towards a custom origin. Never empty.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(transparent)]
pub struct OriginSslProtocols(StringListItems);

impl OriginSslProtocols {
    pub fn protocols(&self) -> &[String] {
        self.0.items()
    }
}

impl ExternalForm for OriginSslProtocols {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        StringListItems::from_non_empty(value).map(Self)
    }
}

canonical_entity!(OriginSslProtocols);
