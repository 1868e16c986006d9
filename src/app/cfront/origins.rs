//! Origins: where CloudFront fetches content from.

use serde::Serialize;
use serde_json::Value;
use std::ops::RangeInclusive;

use super::error::MapResult;
use super::fields::Fields;
use super::item_list::{ItemList, ListItem, OriginSslProtocols};
use super::{canonical_entity, ExternalForm};

const PORT_RANGE: RangeInclusive<i64> = 1..=65_535;
const ORIGIN_TIMEOUT_RANGE: RangeInclusive<i64> = 1..=180;

pub const DEFAULT_HTTP_PORT: i64 = 80;
pub const DEFAULT_HTTPS_PORT: i64 = 443;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomHeadersItem {
    header_name: String,
    header_value: String,
}

impl ExternalForm for CustomHeadersItem {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            header_name: fields.required_str("HeaderName")?,
            header_value: fields.required_str("HeaderValue")?,
        })
    }
}

impl ListItem for CustomHeadersItem {
    fn from_list_entry(value: &Value) -> MapResult<Self> {
        Self::from_external_form(value)
    }
}

/// Headers CloudFront adds to every request sent to the origin
pub type CustomHeaders = ItemList<CustomHeadersItem>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3OriginConfig {
    /// Empty when the bucket is not restricted to an origin access identity
    origin_access_identity: String,
}

impl ExternalForm for S3OriginConfig {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            origin_access_identity: fields.str_or("OriginAccessIdentity", "")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomOriginConfig {
    #[serde(rename = "HTTPPort")]
    http_port: i64,
    #[serde(rename = "HTTPSPort")]
    https_port: i64,
    #[serde(rename = "OriginProtocolPolicy")]
    origin_protocol_policy: String,
    #[serde(rename = "OriginSslProtocols", skip_serializing_if = "Option::is_none")]
    origin_ssl_protocols: Option<OriginSslProtocols>,
    #[serde(rename = "OriginReadTimeout", skip_serializing_if = "Option::is_none")]
    origin_read_timeout: Option<i64>,
    #[serde(rename = "OriginKeepaliveTimeout", skip_serializing_if = "Option::is_none")]
    origin_keepalive_timeout: Option<i64>,
}

impl CustomOriginConfig {
    pub fn http_port(&self) -> i64 {
        self.http_port
    }

    pub fn https_port(&self) -> i64 {
        self.https_port
    }

    pub fn origin_protocol_policy(&self) -> &str {
        &self.origin_protocol_policy
    }

    pub fn origin_ssl_protocols(&self) -> Option<&OriginSslProtocols> {
        self.origin_ssl_protocols.as_ref()
    }
}

impl ExternalForm for CustomOriginConfig {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        // CloudFormation spells it OriginSSLProtocols.
        let origin_ssl_protocols = match fields.one_of(&["OriginSslProtocols", "OriginSSLProtocols"])? {
            Some((key, protocols)) => {
                Some(OriginSslProtocols::from_external_form(protocols).map_err(|e| e.at(key))?)
            }
            None => None,
        };

        Ok(Self {
            http_port: fields.int_or("HTTPPort", PORT_RANGE, DEFAULT_HTTP_PORT)?,
            https_port: fields.int_or("HTTPSPort", PORT_RANGE, DEFAULT_HTTPS_PORT)?,
            origin_protocol_policy: fields.required_str("OriginProtocolPolicy")?,
            origin_ssl_protocols,
            origin_read_timeout: fields.optional_int("OriginReadTimeout", ORIGIN_TIMEOUT_RANGE)?,
            origin_keepalive_timeout: fields
                .optional_int("OriginKeepaliveTimeout", ORIGIN_TIMEOUT_RANGE)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Origin {
    id: String,
    domain_name: String,
    origin_path: String,
    custom_headers: CustomHeaders,
    #[serde(rename = "S3OriginConfig", skip_serializing_if = "Option::is_none")]
    s3_origin_config: Option<S3OriginConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_origin_config: Option<CustomOriginConfig>,
}

impl Origin {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn custom_headers(&self) -> &CustomHeaders {
        &self.custom_headers
    }

    pub fn s3_origin_config(&self) -> Option<&S3OriginConfig> {
        self.s3_origin_config.as_ref()
    }

    pub fn custom_origin_config(&self) -> Option<&CustomOriginConfig> {
        self.custom_origin_config.as_ref()
    }
}

impl ExternalForm for Origin {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        // OriginCustomHeaders in CloudFormation, CustomHeaders in the API.
        let custom_headers = match fields.one_of(&["OriginCustomHeaders", "CustomHeaders"])? {
            Some((key, headers)) => CustomHeaders::from_external_form(headers).map_err(|e| e.at(key))?,
            None => CustomHeaders::empty(),
        };

        Ok(Self {
            id: fields.required_str("Id")?,
            domain_name: fields.required_str("DomainName")?,
            origin_path: fields.str_or("OriginPath", "")?,
            custom_headers,
            s3_origin_config: fields.optional_entity("S3OriginConfig")?,
            custom_origin_config: fields.optional_entity("CustomOriginConfig")?,
        })
    }
}

impl ListItem for Origin {
    const ALLOW_EMPTY: bool = false;

    fn from_list_entry(value: &Value) -> MapResult<Self> {
        Self::from_external_form(value)
    }
}

/// At least one origin
pub type Origins = ItemList<Origin>;

canonical_entity!(CustomHeadersItem, S3OriginConfig, CustomOriginConfig, Origin);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cfront::error::ErrorKind;
    use crate::app::cfront::CanonicalForm;
    use serde_json::json;

    #[test]
    fn test_s3_origin_defaults() {
        let origin = Origin::from_external_form(&json!({
            "Id": "site-bucket",
            "DomainName": "site.s3.amazonaws.com",
            "S3OriginConfig": {}
        }))
        .unwrap();
        assert_eq!(
            origin.to_canonical_form(),
            json!({
                "Id": "site-bucket",
                "DomainName": "site.s3.amazonaws.com",
                "OriginPath": "",
                "CustomHeaders": {"Quantity": 0},
                "S3OriginConfig": {"OriginAccessIdentity": ""}
            })
        );
    }

    #[test]
    fn test_custom_headers_are_renamed() {
        let origin = Origin::from_external_form(&json!({
            "Id": "api",
            "DomainName": "api.example.com",
            "OriginCustomHeaders": [{"HeaderName": "X-Origin-Token", "HeaderValue": "abc"}],
            "CustomOriginConfig": {"OriginProtocolPolicy": "https-only"}
        }))
        .unwrap();
        let canonical = origin.to_canonical_form();
        assert_eq!(
            canonical["CustomHeaders"],
            json!({"Quantity": 1, "Items": [{"HeaderName": "X-Origin-Token", "HeaderValue": "abc"}]})
        );
        assert!(canonical.get("OriginCustomHeaders").is_none());
        assert_eq!(
            canonical["CustomOriginConfig"],
            json!({"HTTPPort": 80, "HTTPSPort": 443, "OriginProtocolPolicy": "https-only"})
        );
    }

    #[test]
    fn test_custom_origin_ports_and_protocols() {
        let config = CustomOriginConfig::from_external_form(&json!({
            "OriginProtocolPolicy": "match-viewer",
            "HTTPPort": "8080",
            "OriginSSLProtocols": ["TLSv1.2"],
            "OriginReadTimeout": 30
        }))
        .unwrap();
        assert_eq!(config.http_port(), 8080);
        assert_eq!(
            config.to_canonical_form()["OriginSslProtocols"],
            json!({"Quantity": 1, "Items": ["TLSv1.2"]})
        );

        let err = CustomOriginConfig::from_external_form(&json!({
            "OriginProtocolPolicy": "match-viewer",
            "OriginSSLProtocols": []
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.path(), "OriginSSLProtocols");

        let err = CustomOriginConfig::from_external_form(&json!({
            "OriginProtocolPolicy": "match-viewer",
            "HTTPSPort": 70000
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_origins_cannot_be_empty() {
        let err = Origins::from_external_form(&json!([])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);

        let err = Origins::from_external_form(&json!([{"Id": "a"}])).unwrap_err();
        assert_eq!(err.path(), "[0].DomainName");
    }
}
