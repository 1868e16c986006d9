//! Shape checks for CloudFront API responses.

use anyhow::{bail, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub enum ExpectedKey {
    /// A top-level key
    Key(&'static str),
    /// A top-level mapping and the keys it must hold
    Nested(&'static str, &'static [&'static str]),
}

pub const CREATE_RESPONSE_KEYS: &[ExpectedKey] = &[ExpectedKey::Nested(
    "Distribution",
    &["Id", "ARN", "Status", "DomainName", "DistributionConfig"],
)];

pub const GET_RESPONSE_KEYS: &[ExpectedKey] = &[
    ExpectedKey::Key("ETag"),
    ExpectedKey::Nested(
        "Distribution",
        &["Id", "ARN", "Status", "DomainName", "DistributionConfig"],
    ),
];

pub fn validate_response_keys(response: &Value, expected: &[ExpectedKey]) -> Result<()> {
    let Some(top) = response.as_object() else {
        bail!("response must be a mapping. got: {}", response);
    };

    for key in expected {
        match key {
            ExpectedKey::Key(name) => {
                if !top.contains_key(*name) {
                    bail!("did not get '{}' key in response. got: {}", name, response);
                }
            }
            ExpectedKey::Nested(name, children) => {
                let Some(nested) = top.get(*name) else {
                    bail!("did not get '{}' key in response. got: {}", name, response);
                };
                let Some(nested) = nested.as_object() else {
                    bail!("response['{}'] must be a mapping. got: {}", name, nested);
                };
                if let Some(child) = children.iter().find(|child| !nested.contains_key(**child)) {
                    bail!(
                        "did not get '{}' key in response['{}']. got: {}",
                        child,
                        name,
                        response
                    );
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_response() -> Value {
        json!({
            "Location": "https://cloudfront.amazonaws.com/2020-05-31/distribution/E2EXAMPLE",
            "ETag": "E3ETAG",
            "Distribution": {
                "Id": "E2EXAMPLE",
                "ARN": "arn:aws:cloudfront::123456789012:distribution/E2EXAMPLE",
                "Status": "InProgress",
                "DomainName": "d111111abcdef8.cloudfront.net",
                "DistributionConfig": {}
            }
        })
    }

    #[test]
    fn test_complete_response_passes() {
        validate_response_keys(&create_response(), CREATE_RESPONSE_KEYS).unwrap();
        validate_response_keys(&create_response(), GET_RESPONSE_KEYS).unwrap();
    }

    #[test]
    fn test_nested_keys_are_checked_inside_the_mapping() {
        let mut response = create_response();
        response["Distribution"]
            .as_object_mut()
            .unwrap()
            .remove("DomainName");
        let err = validate_response_keys(&response, CREATE_RESPONSE_KEYS).unwrap_err();
        assert!(err
            .to_string()
            .contains("did not get 'DomainName' key in response['Distribution']"));
    }

    #[test]
    fn test_missing_top_level_key() {
        let err = validate_response_keys(&json!({"Distribution": {}}), &[ExpectedKey::Key("ETag")])
            .unwrap_err();
        assert!(err.to_string().contains("'ETag'"));

        assert!(validate_response_keys(&json!({"Distribution": "E1"}), CREATE_RESPONSE_KEYS).is_err());
        assert!(validate_response_keys(&json!([]), CREATE_RESPONSE_KEYS).is_err());
    }
}
