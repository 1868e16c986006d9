//! Cache behaviors.
//!
//! A distribution has exactly one [`DefaultCacheBehavior`] and any number of path-specific
//! [`CacheBehavior`]s. The two carry the same settings; they differ only in `PathPattern`, which a
//! path-specific behavior must have (and may not set to the catch-all `*`) while the default
//! behavior may not have it at all. Both wrap a shared [`BehaviorSettings`].

use serde::Serialize;
use serde_json::Value;

use super::error::{MapResult, MappingError};
use super::fields::{Fields, MAX_TTL_SECONDS, TTL_RANGE};
use super::forwarding::{AllowedMethods, ForwardedValues};
use super::item_list::{ItemList, ListItem};
use super::lambda_associations::LambdaFunctionAssociations;
use super::trusted_signers::TrustedSigners;
use super::{canonical_entity, ExternalForm};

/// Named defaults for behavior fields left out of the input
pub struct BehaviorDefaults;

impl BehaviorDefaults {
    pub const MIN_TTL: i64 = 0;
    /// One day
    pub const DEFAULT_TTL: i64 = 86_400;
    /// One year
    pub const MAX_TTL: i64 = MAX_TTL_SECONDS;
    pub const SMOOTH_STREAMING: bool = false;
    pub const COMPRESS: bool = false;
    pub const FIELD_LEVEL_ENCRYPTION_ID: &'static str = "";
}

/// Path pattern reserved for the default behavior
pub const CATCH_ALL_PATH_PATTERN: &str = "*";

/// Everything a cache behavior carries apart from its path pattern
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BehaviorSettings {
    target_origin_id: String,
    forwarded_values: ForwardedValues,
    /// `allow-all`, `https-only`, `redirect-to-https`, passed through unchecked
    viewer_protocol_policy: String,
    trusted_signers: TrustedSigners,
    #[serde(rename = "MinTTL")]
    min_ttl: i64,
    #[serde(rename = "DefaultTTL")]
    default_ttl: i64,
    #[serde(rename = "MaxTTL")]
    max_ttl: i64,
    allowed_methods: AllowedMethods,
    smooth_streaming: bool,
    compress: bool,
    lambda_function_associations: LambdaFunctionAssociations,
    field_level_encryption_id: String,
}

impl BehaviorSettings {
    pub fn from_fields(fields: &Fields<'_>) -> MapResult<Self> {
        let target_origin_id = fields.required_str("TargetOriginId")?;
        let forwarded_values = fields.required_entity::<ForwardedValues>("ForwardedValues")?;
        let viewer_protocol_policy = fields.required_str("ViewerProtocolPolicy")?;
        let trusted_signers = fields.entity_or("TrustedSigners", TrustedSigners::disabled)?;

        let min_ttl = fields.int_or("MinTTL", TTL_RANGE, BehaviorDefaults::MIN_TTL)?;
        let default_ttl = fields.int_or("DefaultTTL", TTL_RANGE, BehaviorDefaults::DEFAULT_TTL)?;
        let max_ttl = fields.int_or("MaxTTL", TTL_RANGE, BehaviorDefaults::MAX_TTL)?;
        // Defaulted values take part in this check like explicit ones.
        if min_ttl > max_ttl {
            return Err(MappingError::invalid(
                "MinTTL",
                format!(
                    "cannot be greater than 'MaxTTL'. got MinTTL: {} > MaxTTL: {}",
                    min_ttl, max_ttl
                ),
            ));
        }

        Ok(Self {
            target_origin_id,
            forwarded_values,
            viewer_protocol_policy,
            trusted_signers,
            min_ttl,
            default_ttl,
            max_ttl,
            allowed_methods: AllowedMethods::from_behavior_fields(fields)?,
            smooth_streaming: fields
                .bool_or("SmoothStreaming", BehaviorDefaults::SMOOTH_STREAMING)?,
            compress: fields.bool_or("Compress", BehaviorDefaults::COMPRESS)?,
            lambda_function_associations: fields
                .entity_or("LambdaFunctionAssociations", LambdaFunctionAssociations::empty)?,
            field_level_encryption_id: fields.str_or(
                "FieldLevelEncryptionId",
                BehaviorDefaults::FIELD_LEVEL_ENCRYPTION_ID,
            )?,
        })
    }

    pub fn target_origin_id(&self) -> &str {
        &self.target_origin_id
    }

    pub fn forwarded_values(&self) -> &ForwardedValues {
        &self.forwarded_values
    }

    pub fn viewer_protocol_policy(&self) -> &str {
        &self.viewer_protocol_policy
    }

    pub fn trusted_signers(&self) -> &TrustedSigners {
        &self.trusted_signers
    }

    pub fn min_ttl(&self) -> i64 {
        self.min_ttl
    }

    pub fn default_ttl(&self) -> i64 {
        self.default_ttl
    }

    pub fn max_ttl(&self) -> i64 {
        self.max_ttl
    }

    pub fn allowed_methods(&self) -> &AllowedMethods {
        &self.allowed_methods
    }

    pub fn compress(&self) -> bool {
        self.compress
    }

    pub fn lambda_function_associations(&self) -> &LambdaFunctionAssociations {
        &self.lambda_function_associations
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheBehavior {
    #[serde(rename = "PathPattern")]
    path_pattern: String,
    #[serde(flatten)]
    settings: BehaviorSettings,
}

impl CacheBehavior {
    pub fn path_pattern(&self) -> &str {
        &self.path_pattern
    }

    pub fn settings(&self) -> &BehaviorSettings {
        &self.settings
    }
}

impl ExternalForm for CacheBehavior {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        let path_pattern = fields.required_str("PathPattern")?;
        if path_pattern == CATCH_ALL_PATH_PATTERN {
            return Err(MappingError::invalid(
                "PathPattern",
                "PathPattern cannot be '*'. it is reserved for 'DefaultCacheBehavior'",
            ));
        }
        Ok(Self {
            path_pattern,
            settings: BehaviorSettings::from_fields(&fields)?,
        })
    }
}

impl ListItem for CacheBehavior {
    fn from_list_entry(value: &Value) -> MapResult<Self> {
        Self::from_external_form(value)
    }
}

pub type CacheBehaviors = ItemList<CacheBehavior>;

/// The behavior applied when no path pattern matches
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct DefaultCacheBehavior {
    settings: BehaviorSettings,
}

impl DefaultCacheBehavior {
    pub fn settings(&self) -> &BehaviorSettings {
        &self.settings
    }
}

impl ExternalForm for DefaultCacheBehavior {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        if fields.contains("PathPattern") {
            return Err(MappingError::invalid(
                "PathPattern",
                "not allowed in 'DefaultCacheBehavior', which always matches '*'",
            ));
        }
        Ok(Self {
            settings: BehaviorSettings::from_fields(&fields)?,
        })
    }
}

canonical_entity!(BehaviorSettings, CacheBehavior, DefaultCacheBehavior);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cfront::error::ErrorKind;
    use crate::app::cfront::CanonicalForm;
    use serde_json::json;

    fn minimal_behavior() -> Value {
        json!({
            "TargetOriginId": "site-bucket",
            "ForwardedValues": {"QueryString": false},
            "ViewerProtocolPolicy": "redirect-to-https"
        })
    }

    fn with(mut base: Value, key: &str, value: Value) -> Value {
        base[key] = value;
        base
    }

    #[test]
    fn test_default_behavior_is_fully_defaulted() {
        let behavior = DefaultCacheBehavior::from_external_form(&minimal_behavior()).unwrap();
        assert_eq!(
            behavior.to_canonical_form(),
            json!({
                "TargetOriginId": "site-bucket",
                "ForwardedValues": {
                    "QueryString": false,
                    "Cookies": {"Forward": "none"},
                    "Headers": {"Quantity": 0},
                    "QueryStringCacheKeys": {"Quantity": 0}
                },
                "ViewerProtocolPolicy": "redirect-to-https",
                "TrustedSigners": {"Enabled": false, "Quantity": 0},
                "MinTTL": 0,
                "DefaultTTL": 86400,
                "MaxTTL": 31536000,
                "AllowedMethods": {
                    "Quantity": 2,
                    "Items": ["GET", "HEAD"],
                    "CachedMethods": {"Quantity": 2, "Items": ["GET", "HEAD"]}
                },
                "SmoothStreaming": false,
                "Compress": false,
                "LambdaFunctionAssociations": {"Quantity": 0},
                "FieldLevelEncryptionId": ""
            })
        );
    }

    #[test]
    fn test_catch_all_path_pattern_is_reserved() {
        let input = with(minimal_behavior(), "PathPattern", json!("*"));
        let err = CacheBehavior::from_external_form(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(err.to_string().contains("PathPattern cannot be '*'"));
    }

    #[test]
    fn test_path_pattern_is_required() {
        let err = CacheBehavior::from_external_form(&minimal_behavior()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.path(), "PathPattern");
    }

    #[test]
    fn test_default_behavior_rejects_explicit_path_pattern() {
        let input = with(minimal_behavior(), "PathPattern", json!("/images/*"));
        let err = DefaultCacheBehavior::from_external_form(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_min_ttl_above_defaulted_max_ttl() {
        let input = with(minimal_behavior(), "MaxTTL", json!("0"));
        let input = with(input, "MinTTL", json!(1));
        let err = DefaultCacheBehavior::from_external_form(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.path(), "MinTTL");
    }

    #[test]
    fn test_equal_min_and_max_ttl_is_accepted() {
        let input = with(minimal_behavior(), "MinTTL", json!(600));
        let input = with(input, "MaxTTL", json!("600"));
        let behavior = DefaultCacheBehavior::from_external_form(&input).unwrap();
        assert_eq!(behavior.settings().min_ttl(), 600);
        assert_eq!(behavior.settings().max_ttl(), 600);
    }

    #[test]
    fn test_required_fields_are_reported_by_name() {
        for key in ["TargetOriginId", "ForwardedValues", "ViewerProtocolPolicy"] {
            let mut input = minimal_behavior();
            input.as_object_mut().unwrap().remove(key);
            let err = DefaultCacheBehavior::from_external_form(&input).unwrap_err();
            assert_eq!(err.path(), key);
            assert_eq!(err.kind(), ErrorKind::Value);
        }
    }

    #[test]
    fn test_bool_like_strings_for_flags() {
        let input = with(minimal_behavior(), "Compress", json!("TRUE"));
        let input = with(input, "SmoothStreaming", json!("n"));
        let behavior = DefaultCacheBehavior::from_external_form(&input).unwrap();
        assert!(behavior.settings().compress());

        let input = with(minimal_behavior(), "Compress", json!(1));
        let err = DefaultCacheBehavior::from_external_form(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}
