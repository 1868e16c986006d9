//! The `DistributionConfig` root aggregate and the tagged `Distribution` wrapper.
//!
//! Only `Enabled`, `Origins` and `DefaultCacheBehavior` are required. Every other field gets a
//! named default so the canonical form is complete: `UpdateDistribution` replaces the whole
//! configuration and rejects bodies with fields left out, so the same shape serves create and
//! update.

use serde::Serialize;
use serde_json::Value;

use super::access_logging::Logging;
use super::behaviors::{CacheBehaviors, DefaultCacheBehavior};
use super::caller_reference::{CallerReferenceProvider, UuidCallerReference};
use super::error::{MapResult, MappingError};
use super::error_responses::CustomErrorResponses;
use super::fields::Fields;
use super::item_list::StringListItems;
use super::origin_groups::OriginGroups;
use super::origins::Origins;
use super::restrictions::Restrictions;
use super::tags::Tags;
use super::viewer_certificate::ViewerCertificate;
use super::{canonical_entity, ExternalForm};

/// Named defaults for top-level fields left out of the input
pub struct DistributionDefaults;

impl DistributionDefaults {
    pub const DEFAULT_ROOT_OBJECT: &'static str = "";
    pub const COMMENT: &'static str = "";
    pub const PRICE_CLASS: &'static str = "PriceClass_All";
    pub const WEB_ACL_ID: &'static str = "";
    pub const HTTP_VERSION: &'static str = "http2";
    pub const IS_IPV6_ENABLED: bool = true;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionConfig {
    caller_reference: String,
    aliases: StringListItems,
    default_root_object: String,
    origins: Origins,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin_groups: Option<OriginGroups>,
    default_cache_behavior: DefaultCacheBehavior,
    cache_behaviors: CacheBehaviors,
    custom_error_responses: CustomErrorResponses,
    comment: String,
    logging: Logging,
    price_class: String,
    enabled: bool,
    viewer_certificate: ViewerCertificate,
    restrictions: Restrictions,
    #[serde(rename = "WebACLId")]
    web_acl_id: String,
    http_version: String,
    #[serde(rename = "IsIPV6Enabled")]
    is_ipv6_enabled: bool,
}

impl DistributionConfig {
    /// Parse with a caller reference drawn from `provider` when the input has none.
    pub fn from_external_form_with(
        value: &Value,
        provider: &dyn CallerReferenceProvider,
    ) -> MapResult<Self> {
        let fields = Fields::of(value)?;

        let enabled = fields.required_bool("Enabled")?;
        let caller_reference = match fields.get("CallerReference") {
            Some(Value::String(reference)) => reference.clone(),
            Some(other) => {
                return Err(MappingError::type_mismatch(
                    "CallerReference",
                    "a unique string that keeps the request from being replayed",
                    other,
                ))
            }
            None => provider.next_reference(),
        };

        Ok(Self {
            caller_reference,
            aliases: fields.entity_or("Aliases", StringListItems::empty)?,
            default_root_object: fields
                .str_or("DefaultRootObject", DistributionDefaults::DEFAULT_ROOT_OBJECT)?,
            origins: fields.required_entity("Origins")?,
            origin_groups: fields.optional_entity("OriginGroups")?,
            default_cache_behavior: fields.required_entity("DefaultCacheBehavior")?,
            cache_behaviors: fields.entity_or("CacheBehaviors", CacheBehaviors::empty)?,
            custom_error_responses: fields
                .entity_or("CustomErrorResponses", CustomErrorResponses::empty)?,
            comment: fields.str_or("Comment", DistributionDefaults::COMMENT)?,
            logging: fields.entity_or("Logging", Logging::disabled)?,
            price_class: fields.str_or("PriceClass", DistributionDefaults::PRICE_CLASS)?,
            enabled,
            viewer_certificate: fields
                .entity_or("ViewerCertificate", ViewerCertificate::cloudfront_default)?,
            restrictions: fields.entity_or("Restrictions", Restrictions::unrestricted)?,
            web_acl_id: fields.str_or("WebACLId", DistributionDefaults::WEB_ACL_ID)?,
            http_version: fields.str_or("HttpVersion", DistributionDefaults::HTTP_VERSION)?,
            is_ipv6_enabled: fields
                .bool_or("IsIPV6Enabled", DistributionDefaults::IS_IPV6_ENABLED)?,
        })
    }

    /// Same configuration under a different caller reference.
    ///
    /// Updates must carry the reference the distribution was created with.
    pub fn with_caller_reference(&self, reference: impl Into<String>) -> Self {
        Self {
            caller_reference: reference.into(),
            ..self.clone()
        }
    }

    pub fn caller_reference(&self) -> &str {
        &self.caller_reference
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn aliases(&self) -> &StringListItems {
        &self.aliases
    }

    pub fn origins(&self) -> &Origins {
        &self.origins
    }

    pub fn origin_groups(&self) -> Option<&OriginGroups> {
        self.origin_groups.as_ref()
    }

    pub fn default_cache_behavior(&self) -> &DefaultCacheBehavior {
        &self.default_cache_behavior
    }

    pub fn cache_behaviors(&self) -> &CacheBehaviors {
        &self.cache_behaviors
    }

    pub fn custom_error_responses(&self) -> &CustomErrorResponses {
        &self.custom_error_responses
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn logging(&self) -> &Logging {
        &self.logging
    }

    pub fn price_class(&self) -> &str {
        &self.price_class
    }

    pub fn viewer_certificate(&self) -> &ViewerCertificate {
        &self.viewer_certificate
    }

    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    pub fn http_version(&self) -> &str {
        &self.http_version
    }

    pub fn is_ipv6_enabled(&self) -> bool {
        self.is_ipv6_enabled
    }
}

impl ExternalForm for DistributionConfig {
    /// Parse with a random caller reference when the input has none.
    fn from_external_form(value: &Value) -> MapResult<Self> {
        Self::from_external_form_with(value, &UuidCallerReference)
    }
}

/// A distribution configuration plus optional tags
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Distribution {
    distribution_config: DistributionConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Tags>,
}

impl Distribution {
    pub fn new(distribution_config: DistributionConfig, tags: Option<Tags>) -> Self {
        Self {
            distribution_config,
            tags,
        }
    }

    pub fn from_external_form(config: &Value, tags: Option<&Value>) -> MapResult<Self> {
        Self::from_external_form_with(config, tags, &UuidCallerReference)
    }

    pub fn from_external_form_with(
        config: &Value,
        tags: Option<&Value>,
        provider: &dyn CallerReferenceProvider,
    ) -> MapResult<Self> {
        let distribution_config = DistributionConfig::from_external_form_with(config, provider)
            .map_err(|e| e.at("DistributionConfig"))?;
        let tags = tags
            .filter(|t| !t.is_null())
            .map(|t| Tags::from_external_form(t).map_err(|e| e.at("Tags")))
            .transpose()?;
        Ok(Self {
            distribution_config,
            tags,
        })
    }

    /// Same distribution with the configuration under a different caller reference
    pub fn with_caller_reference(&self, reference: impl Into<String>) -> Self {
        Self {
            distribution_config: self.distribution_config.with_caller_reference(reference),
            tags: self.tags.clone(),
        }
    }

    pub fn distribution_config(&self) -> &DistributionConfig {
        &self.distribution_config
    }

    pub fn tags(&self) -> Option<&Tags> {
        self.tags.as_ref()
    }
}

canonical_entity!(DistributionConfig, Distribution);
