//! Origin groups for origin failover.

use serde::Serialize;
use serde_json::Value;

use super::error::{MapResult, MappingError};
use super::fields::Fields;
use super::item_list::{ItemList, ListItem, StatusCodes};
use super::{canonical_entity, ExternalForm};

/// Status codes from the primary origin that send requests to the secondary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FailoverCriteria {
    status_codes: StatusCodes,
}

impl FailoverCriteria {
    pub fn status_codes(&self) -> &StatusCodes {
        &self.status_codes
    }
}

impl ExternalForm for FailoverCriteria {
    /// `StatusCodes` has to be present, but may be empty.
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            status_codes: fields.required_entity("StatusCodes")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginGroupMember {
    origin_id: String,
}

impl OriginGroupMember {
    pub fn origin_id(&self) -> &str {
        &self.origin_id
    }
}

impl ListItem for OriginGroupMember {
    const ALLOW_EMPTY: bool = false;

    /// A bare origin id, or `{"OriginId": ...}` as the API returns it
    fn from_list_entry(value: &Value) -> MapResult<Self> {
        let origin_id = match value {
            Value::String(id) => id.clone(),
            Value::Object(_) => Fields::of(value)?.required_str("OriginId")?,
            other => {
                return Err(MappingError::type_mismatch(
                    "",
                    "an origin id string",
                    other,
                ))
            }
        };
        Ok(Self { origin_id })
    }
}

pub type OriginGroupMembers = ItemList<OriginGroupMember>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginGroup {
    id: String,
    failover_criteria: FailoverCriteria,
    members: OriginGroupMembers,
}

impl OriginGroup {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn members(&self) -> &OriginGroupMembers {
        &self.members
    }

    pub fn failover_criteria(&self) -> &FailoverCriteria {
        &self.failover_criteria
    }
}

impl ExternalForm for OriginGroup {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            id: fields.required_str("Id")?,
            failover_criteria: fields.required_entity("FailoverCriteria")?,
            members: fields.required_entity("Members")?,
        })
    }
}

impl ListItem for OriginGroup {
    const ALLOW_EMPTY: bool = false;

    fn from_list_entry(value: &Value) -> MapResult<Self> {
        Self::from_external_form(value)
    }
}

/// When given, at least one group
pub type OriginGroups = ItemList<OriginGroup>;

canonical_entity!(FailoverCriteria, OriginGroupMember, OriginGroup);
