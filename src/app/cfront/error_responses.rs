//! Custom error pages and error caching.

use serde::Serialize;
use serde_json::Value;

use super::error::{MapResult, MappingError};
use super::fields::{parse_int, Fields, TTL_RANGE};
use super::item_list::{ItemList, ListItem};
use super::{canonical_entity, ExternalForm};

/// Seconds CloudFront caches an error response when nothing else is configured
pub const DEFAULT_ERROR_CACHING_MIN_TTL: i64 = 300;

const HTTP_STATUS_RANGE: std::ops::RangeInclusive<i64> = 100..=599;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomErrorResponse {
    error_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_page_path: Option<String>,
    /// Numeric in CloudFormation, a string in the API
    #[serde(skip_serializing_if = "Option::is_none")]
    response_code: Option<String>,
    #[serde(rename = "ErrorCachingMinTTL")]
    error_caching_min_ttl: i64,
}

impl CustomErrorResponse {
    pub fn error_code(&self) -> i64 {
        self.error_code
    }

    pub fn response_page_path(&self) -> Option<&str> {
        self.response_page_path.as_deref()
    }

    pub fn response_code(&self) -> Option<&str> {
        self.response_code.as_deref()
    }

    pub fn error_caching_min_ttl(&self) -> i64 {
        self.error_caching_min_ttl
    }
}

impl ExternalForm for CustomErrorResponse {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        let error_code = parse_int("ErrorCode", fields.required("ErrorCode")?, HTTP_STATUS_RANGE)?;
        let response_page_path = fields.optional_str("ResponsePagePath")?;
        let response_code = fields
            .get("ResponseCode")
            .map(response_code_text)
            .transpose()?;

        match (&response_page_path, &response_code) {
            (Some(_), None) => {
                return Err(MappingError::invalid(
                    "ResponseCode",
                    "required when 'ResponsePagePath' is given",
                ))
            }
            (None, Some(_)) => {
                return Err(MappingError::invalid(
                    "ResponsePagePath",
                    "required when 'ResponseCode' is given",
                ))
            }
            _ => {}
        }

        Ok(Self {
            error_code,
            response_page_path,
            response_code,
            error_caching_min_ttl: fields.int_or(
                "ErrorCachingMinTTL",
                TTL_RANGE,
                DEFAULT_ERROR_CACHING_MIN_TTL,
            )?,
        })
    }
}

fn response_code_text(value: &Value) -> MapResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(_) => Ok(parse_int("ResponseCode", value, HTTP_STATUS_RANGE)?.to_string()),
        other => Err(MappingError::type_mismatch(
            "ResponseCode",
            "an integer or string",
            other,
        )),
    }
}

impl ListItem for CustomErrorResponse {
    fn from_list_entry(value: &Value) -> MapResult<Self> {
        Self::from_external_form(value)
    }
}

pub type CustomErrorResponses = ItemList<CustomErrorResponse>;

canonical_entity!(CustomErrorResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cfront::error::ErrorKind;
    use crate::app::cfront::CanonicalForm;
    use serde_json::json;

    #[test]
    fn test_page_path_without_response_code() {
        let err = CustomErrorResponse::from_external_form(&json!({
            "ErrorCode": 404,
            "ResponsePagePath": "/404.html"
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.path(), "ResponseCode");
    }

    #[test]
    fn test_response_code_without_page_path() {
        let err = CustomErrorResponse::from_external_form(&json!({
            "ErrorCode": "503",
            "ResponseCode": 200
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.path(), "ResponsePagePath");
    }

    #[test]
    fn test_response_code_is_stored_as_text() {
        let response = CustomErrorResponse::from_external_form(&json!({
            "ErrorCode": "404",
            "ResponsePagePath": "/index.html",
            "ResponseCode": 200,
            "ErrorCachingMinTTL": "10"
        }))
        .unwrap();
        assert_eq!(
            response.to_canonical_form(),
            json!({
                "ErrorCode": 404,
                "ResponsePagePath": "/index.html",
                "ResponseCode": "200",
                "ErrorCachingMinTTL": 10
            })
        );
    }

    #[test]
    fn test_error_caching_defaults_to_five_minutes() {
        let response = CustomErrorResponse::from_external_form(&json!({"ErrorCode": 500})).unwrap();
        assert_eq!(response.error_caching_min_ttl(), 300);
        assert_eq!(response.response_page_path(), None);
    }

    #[test]
    fn test_error_caching_range() {
        let err = CustomErrorResponse::from_external_form(&json!({
            "ErrorCode": 500,
            "ErrorCachingMinTTL": 31536001
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.path(), "ErrorCachingMinTTL");
    }
}
