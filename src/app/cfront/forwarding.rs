//! What a cache behavior forwards to the origin and which HTTP methods it serves.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use super::error::{MapResult, MappingError};
use super::fields::{list_entries, Fields};
use super::item_list::StringListItems;
use super::{canonical_entity, ExternalForm};

/// Cookie forwarding mode that allows `WhitelistedNames`
pub const WHITELIST_FORWARD: &str = "whitelist";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cookies {
    forward: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    whitelisted_names: Option<StringListItems>,
}

impl Cookies {
    /// Forward no cookies
    pub fn none() -> Self {
        Self {
            forward: "none".to_string(),
            whitelisted_names: None,
        }
    }

    pub fn forward(&self) -> &str {
        &self.forward
    }

    pub fn whitelisted_names(&self) -> Option<&StringListItems> {
        self.whitelisted_names.as_ref()
    }
}

impl ExternalForm for Cookies {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        let forward = fields.required_str("Forward")?;
        let whitelisted_names = fields.optional_entity::<StringListItems>("WhitelistedNames")?;
        if whitelisted_names.is_some() && forward != WHITELIST_FORWARD {
            return Err(MappingError::invalid(
                "WhitelistedNames",
                format!(
                    "only allowed when 'Forward' is '{}'. got Forward: '{}'",
                    WHITELIST_FORWARD, forward
                ),
            ));
        }
        Ok(Self {
            forward,
            whitelisted_names,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForwardedValues {
    query_string: bool,
    cookies: Cookies,
    headers: StringListItems,
    query_string_cache_keys: StringListItems,
}

impl ForwardedValues {
    pub fn query_string(&self) -> bool {
        self.query_string
    }

    pub fn cookies(&self) -> &Cookies {
        &self.cookies
    }

    pub fn headers(&self) -> &StringListItems {
        &self.headers
    }
}

impl ExternalForm for ForwardedValues {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            query_string: fields.required_bool("QueryString")?,
            cookies: fields.entity_or("Cookies", Cookies::none)?,
            headers: fields.entity_or("Headers", StringListItems::empty)?,
            query_string_cache_keys: fields
                .entity_or("QueryStringCacheKeys", StringListItems::empty)?,
        })
    }
}

/// Methods CloudFront processes and forwards, and the subset whose responses it caches.
///
/// In CloudFormation `CachedMethods` is a sibling of `AllowedMethods`; in the API it nests inside
/// it. Both shapes are accepted by [`AllowedMethods::from_behavior_fields`].
#[derive(Debug, Clone, Serialize)]
pub struct AllowedMethods {
    #[serde(flatten)]
    methods: StringListItems,
    #[serde(rename = "CachedMethods", skip_serializing_if = "Option::is_none")]
    cached_methods: Option<StringListItems>,
}

impl AllowedMethods {
    /// `GET` and `HEAD`, both cached
    pub fn get_head() -> Self {
        let methods = StringListItems::new(vec!["GET".to_string(), "HEAD".to_string()]);
        Self {
            methods: methods.clone(),
            cached_methods: Some(methods),
        }
    }

    /// Build from the two sibling inputs. When only the cached list is given it also becomes the
    /// allowed list. Calling this with neither is an error; omit the field instead.
    pub fn from_external_form(allowed: Option<&Value>, cached: Option<&Value>) -> MapResult<Self> {
        let cached_methods = cached
            .map(|value| method_list(value).map_err(|e| e.at("CachedMethods")))
            .transpose()?;
        let methods = allowed
            .map(|value| method_list(value).map_err(|e| e.at("AllowedMethods")))
            .transpose()?;

        let (methods, cached_methods) = match (methods, cached_methods) {
            (Some(methods), cached) => (methods, cached),
            (None, Some(cached)) => (cached.clone(), Some(cached)),
            (None, None) => {
                return Err(MappingError::invalid(
                    "AllowedMethods",
                    "neither 'AllowedMethods' nor 'CachedMethods' given; omit the field instead",
                ))
            }
        };

        let allowed_set: HashSet<&str> = methods.iter().map(String::as_str).collect();
        if let Some(stray) = cached_methods
            .iter()
            .flatten()
            .find(|m| !allowed_set.contains(m.as_str()))
        {
            return Err(MappingError::invalid(
                "CachedMethods",
                format!(
                    "must be a subset of 'AllowedMethods'. '{}' is not in {:?}",
                    stray, methods
                ),
            ));
        }

        Ok(Self {
            methods: StringListItems::new(methods),
            cached_methods: cached_methods.map(StringListItems::new),
        })
    }

    /// Read `AllowedMethods` / `CachedMethods` from a behavior mapping.
    ///
    /// Falls back to [`AllowedMethods::get_head`] when neither key is present. An `AllowedMethods`
    /// mapping may carry its own nested `CachedMethods`.
    pub fn from_behavior_fields(fields: &Fields<'_>) -> MapResult<Self> {
        let allowed = fields.get("AllowedMethods");
        let sibling_cached = fields.get("CachedMethods");
        let nested_cached = match allowed {
            Some(Value::Object(map)) => map.get("CachedMethods").filter(|v| !v.is_null()),
            _ => None,
        };

        let cached = match (sibling_cached, nested_cached) {
            (Some(_), Some(_)) => {
                return Err(MappingError::invalid(
                    "CachedMethods",
                    "given both beside and inside 'AllowedMethods'",
                ))
            }
            (Some(cached), None) => Some(cached),
            (None, Some(cached)) => {
                return Self::from_external_form(allowed, Some(cached))
                    .map_err(nest_cached_path);
            }
            (None, None) => None,
        };

        if allowed.is_none() && cached.is_none() {
            return Ok(Self::get_head());
        }
        Self::from_external_form(allowed, cached)
    }

    pub fn methods(&self) -> &[String] {
        self.methods.items()
    }

    pub fn cached_methods(&self) -> Option<&[String]> {
        self.cached_methods.as_ref().map(StringListItems::items)
    }
}

fn nest_cached_path(err: MappingError) -> MappingError {
    if err.path().starts_with("CachedMethods") {
        err.at("AllowedMethods")
    } else {
        err
    }
}

/// A method list: strings only, non-empty, no duplicates.
fn method_list(value: &Value) -> MapResult<Vec<String>> {
    let entries = list_entries(value)?;
    if entries.is_empty() {
        return Err(MappingError::invalid(
            "",
            "exists but is empty. supply at least one method or omit the key",
        ));
    }

    let mut seen = HashSet::new();
    let mut methods = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let method = entry.as_str().ok_or_else(|| {
            MappingError::type_mismatch(format!("[{}]", index), "a string", entry)
        })?;
        if !seen.insert(method) {
            return Err(MappingError::invalid(
                "",
                format!("contains '{}' more than once", method),
            ));
        }
        methods.push(method.to_string());
    }
    Ok(methods)
}

canonical_entity!(Cookies, ForwardedValues, AllowedMethods);
