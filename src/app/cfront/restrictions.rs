//! Geographic restrictions.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::error::{MapResult, MappingError};
use super::fields::{list_entries, Fields};
use super::item_list::{ListItem, StringListItems};
use super::{canonical_entity, ExternalForm};

/// Restriction type that disables geo restriction
pub const NO_RESTRICTION: &str = "none";

/// A `whitelist` / `blacklist` of ISO 3166-1 alpha-2 country codes, or no restriction.
///
/// CloudFormation names the country list `Locations`; the API calls it `Items`.
#[derive(Debug, Clone)]
pub struct GeoRestrictionItem {
    restriction_type: String,
    locations: StringListItems,
}

impl GeoRestrictionItem {
    pub fn unrestricted() -> Self {
        Self {
            restriction_type: NO_RESTRICTION.to_string(),
            locations: StringListItems::empty(),
        }
    }

    pub fn restriction_type(&self) -> &str {
        &self.restriction_type
    }

    pub fn locations(&self) -> &[String] {
        self.locations.items()
    }
}

impl ExternalForm for GeoRestrictionItem {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        let restriction_type = fields.str_or("RestrictionType", NO_RESTRICTION)?;
        if restriction_type == NO_RESTRICTION {
            // Locations given alongside "none" are dropped.
            return Ok(Self::unrestricted());
        }

        let entries = if let Some(locations) = fields.get("Locations") {
            match locations {
                Value::Array(entries) => entries.as_slice(),
                other => {
                    return Err(MappingError::type_mismatch(
                        "Locations",
                        "a list of country codes",
                        other,
                    ))
                }
            }
        } else if fields.contains("Items") || fields.contains("Quantity") {
            list_entries(value)?
        } else {
            return Err(MappingError::invalid(
                "Locations",
                format!(
                    "required when 'RestrictionType' is '{}'",
                    restriction_type
                ),
            ));
        };

        let locations = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                String::from_list_entry(entry).map_err(|e| e.at(&format!("Locations[{}]", index)))
            })
            .collect::<MapResult<Vec<String>>>()?;

        Ok(Self {
            restriction_type,
            locations: StringListItems::new(locations),
        })
    }
}

impl Serialize for GeoRestrictionItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("RestrictionType", &self.restriction_type)?;
        map.serialize_entry("Quantity", &self.locations.quantity())?;
        if !self.locations.is_empty() {
            map.serialize_entry("Items", self.locations.items())?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Restrictions {
    geo_restriction: GeoRestrictionItem,
}

impl Restrictions {
    pub fn unrestricted() -> Self {
        Self {
            geo_restriction: GeoRestrictionItem::unrestricted(),
        }
    }

    pub fn geo_restriction(&self) -> &GeoRestrictionItem {
        &self.geo_restriction
    }
}

impl ExternalForm for Restrictions {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            geo_restriction: fields.required_entity("GeoRestriction")?,
        })
    }
}

canonical_entity!(GeoRestrictionItem, Restrictions);
