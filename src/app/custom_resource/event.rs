//! CloudFormation custom resource request events.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::app::cfront::{CallerReferenceProvider, Distribution, ExternalForm, Tags};

/// Property holding the external-form `DistributionConfig`
pub const DISTRIBUTION_CONFIG_PROPERTY: &str = "DistributionConfig";
/// Optional property holding the tag list
pub const TAGS_PROPERTY: &str = "Tags";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RequestType::Create => "Create",
            RequestType::Update => "Update",
            RequestType::Delete => "Delete",
        };
        write!(f, "{}", name)
    }
}

/// The request document CloudFormation sends to a custom resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: RequestType,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub stack_id: String,
    #[serde(default)]
    pub logical_resource_id: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(rename = "ResponseURL", default)]
    pub response_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Map<String, Value>>,
}

impl CustomResourceEvent {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).context("Failed to parse custom resource event")
    }

    /// The distribution the template asks for
    pub fn desired_distribution(
        &self,
        provider: &dyn CallerReferenceProvider,
    ) -> Result<Distribution> {
        distribution_from_properties(&self.resource_properties, provider)
            .context("Invalid ResourceProperties")
    }

    /// The distribution the template asked for before this update
    pub fn previous_distribution(
        &self,
        provider: &dyn CallerReferenceProvider,
    ) -> Result<Distribution> {
        let properties = self.old_properties()?;
        distribution_from_properties(properties, provider).context("Invalid OldResourceProperties")
    }

    pub fn desired_tags(&self) -> Result<Option<Tags>> {
        tags_from_properties(&self.resource_properties).context("Invalid ResourceProperties")
    }

    pub fn previous_tags(&self) -> Result<Option<Tags>> {
        tags_from_properties(self.old_properties()?).context("Invalid OldResourceProperties")
    }

    /// Whether either side of the request manages tags
    pub fn manages_tags(&self) -> bool {
        self.resource_properties.contains_key(TAGS_PROPERTY)
            || self
                .old_resource_properties
                .as_ref()
                .is_some_and(|old| old.contains_key(TAGS_PROPERTY))
    }

    pub fn require_physical_resource_id(&self) -> Result<&str> {
        self.physical_resource_id.as_deref().ok_or_else(|| {
            anyhow!(
                "{} request for {} carries no PhysicalResourceId",
                self.request_type,
                self.logical_resource_id
            )
        })
    }

    fn old_properties(&self) -> Result<&Map<String, Value>> {
        self.old_resource_properties.as_ref().ok_or_else(|| {
            anyhow!(
                "{} request for {} carries no OldResourceProperties",
                self.request_type,
                self.logical_resource_id
            )
        })
    }
}

fn distribution_from_properties(
    properties: &Map<String, Value>,
    provider: &dyn CallerReferenceProvider,
) -> Result<Distribution> {
    let config = properties
        .get(DISTRIBUTION_CONFIG_PROPERTY)
        .ok_or_else(|| anyhow!("missing '{}' property", DISTRIBUTION_CONFIG_PROPERTY))?;
    let distribution =
        Distribution::from_external_form_with(config, properties.get(TAGS_PROPERTY), provider)?;
    Ok(distribution)
}

fn tags_from_properties(properties: &Map<String, Value>) -> Result<Option<Tags>> {
    let tags = properties
        .get(TAGS_PROPERTY)
        .filter(|tags| !tags.is_null())
        .map(|tags| Tags::from_external_form(tags).map_err(|e| e.at(TAGS_PROPERTY)))
        .transpose()?;
    Ok(tags)
}
