//! The certificate CloudFront presents to viewers over HTTPS.
//!
//! Exactly one certificate source has to be named: the `*.cloudfront.net` default certificate,
//! an ACM certificate or an IAM server certificate. CloudFormation and the API spell the last two
//! (and `SslSupportMethod`) differently; both spellings are accepted and the API one is emitted.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::error::{MapResult, MappingError};
use super::fields::{parse_bool, parse_string, Fields};
use super::{canonical_entity, ExternalForm};

/// Protocol floor when the default certificate is used
pub const DEFAULT_CERTIFICATE_MIN_PROTOCOL: &str = "TLSv1";
/// Protocol floor for ACM and IAM certificates
pub const CUSTOM_CERTIFICATE_MIN_PROTOCOL: &str = "TLSv1.1_2016";

const DEFAULT_CERTIFICATE_KEY: &str = "CloudFrontDefaultCertificate";
const ACM_KEYS: [&str; 2] = ["AcmCertificateArn", "ACMCertificateArn"];
const IAM_KEYS: [&str; 2] = ["IamCertificateId", "IAMCertificateId"];
const SSL_SUPPORT_METHOD_KEYS: [&str; 2] = ["SslSupportMethod", "SSLSupportMethod"];

#[derive(Debug, Clone)]
enum CertificateSource {
    CloudFrontDefault(bool),
    Acm(String),
    Iam(String),
}

#[derive(Debug, Clone)]
pub struct ViewerCertificate {
    source: CertificateSource,
    ssl_support_method: Option<String>,
    minimum_protocol_version: String,
}

impl ViewerCertificate {
    /// The `*.cloudfront.net` certificate, used when a template names none
    pub fn cloudfront_default() -> Self {
        Self {
            source: CertificateSource::CloudFrontDefault(true),
            ssl_support_method: None,
            minimum_protocol_version: DEFAULT_CERTIFICATE_MIN_PROTOCOL.to_string(),
        }
    }

    pub fn uses_default_certificate(&self) -> bool {
        matches!(self.source, CertificateSource::CloudFrontDefault(_))
    }

    pub fn acm_certificate_arn(&self) -> Option<&str> {
        match &self.source {
            CertificateSource::Acm(arn) => Some(arn),
            _ => None,
        }
    }

    pub fn iam_certificate_id(&self) -> Option<&str> {
        match &self.source {
            CertificateSource::Iam(id) => Some(id),
            _ => None,
        }
    }

    pub fn ssl_support_method(&self) -> Option<&str> {
        self.ssl_support_method.as_deref()
    }

    pub fn minimum_protocol_version(&self) -> &str {
        &self.minimum_protocol_version
    }
}

impl ExternalForm for ViewerCertificate {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;

        let named: Vec<&str> = std::iter::once(DEFAULT_CERTIFICATE_KEY)
            .chain(ACM_KEYS)
            .chain(IAM_KEYS)
            .filter(|key| fields.contains(key))
            .collect();
        match named.len() {
            0 => {
                return Err(MappingError::invalid(
                    "",
                    "none specified: supply one of 'AcmCertificateArn', \
                     'CloudFrontDefaultCertificate', 'IamCertificateId'",
                ))
            }
            1 => {}
            _ => {
                return Err(MappingError::invalid(
                    "",
                    format!("ambiguous: only one certificate source allowed. got: {:?}", named),
                ))
            }
        }

        let ssl_support_method = match fields.one_of(&SSL_SUPPORT_METHOD_KEYS)? {
            Some((key, method)) => Some((key, parse_string(key, method)?)),
            None => None,
        };

        let key = named[0];
        let source = if key == DEFAULT_CERTIFICATE_KEY {
            if let Some((ssl_key, _)) = &ssl_support_method {
                return Err(MappingError::invalid(
                    *ssl_key,
                    "must not be given with 'CloudFrontDefaultCertificate'",
                ));
            }
            CertificateSource::CloudFrontDefault(parse_bool(key, fields.required(key)?)?)
        } else {
            let identifier = fields.required_str(key)?;
            if ssl_support_method.is_none() {
                return Err(MappingError::invalid(
                    "SslSupportMethod",
                    format!("required when '{}' is given", key),
                ));
            }
            if ACM_KEYS.contains(&key) {
                CertificateSource::Acm(identifier)
            } else {
                CertificateSource::Iam(identifier)
            }
        };

        let default_protocol = match source {
            CertificateSource::CloudFrontDefault(_) => DEFAULT_CERTIFICATE_MIN_PROTOCOL,
            _ => CUSTOM_CERTIFICATE_MIN_PROTOCOL,
        };

        Ok(Self {
            source,
            ssl_support_method: ssl_support_method.map(|(_, method)| method),
            minimum_protocol_version: fields.str_or("MinimumProtocolVersion", default_protocol)?,
        })
    }
}

impl Serialize for ViewerCertificate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.source {
            CertificateSource::CloudFrontDefault(enabled) => {
                map.serialize_entry("CloudFrontDefaultCertificate", enabled)?
            }
            CertificateSource::Acm(arn) => map.serialize_entry("ACMCertificateArn", arn)?,
            CertificateSource::Iam(id) => map.serialize_entry("IAMCertificateId", id)?,
        }
        if let Some(method) = &self.ssl_support_method {
            map.serialize_entry("SSLSupportMethod", method)?;
        }
        map.serialize_entry("MinimumProtocolVersion", &self.minimum_protocol_version)?;
        map.end()
    }
}

canonical_entity!(ViewerCertificate);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cfront::error::ErrorKind;
    use crate::app::cfront::CanonicalForm;
    use serde_json::json;

    const ACM_ARN: &str =
        "arn:aws:acm:us-east-1:123456789012:certificate/1f2e3d4c-0000-1111-2222-333344445555";

    #[test]
    fn test_no_certificate_source() {
        let err = ViewerCertificate::from_external_form(&json!({"SslSupportMethod": "sni-only"}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(err.to_string().contains("none specified"));
    }

    #[test]
    fn test_two_certificate_sources() {
        let err = ViewerCertificate::from_external_form(&json!({
            "AcmCertificateArn": ACM_ARN,
            "CloudFrontDefaultCertificate": true
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn test_default_certificate_rejects_ssl_support_method() {
        let err = ViewerCertificate::from_external_form(&json!({
            "CloudFrontDefaultCertificate": "true",
            "SslSupportMethod": "sni-only"
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.path(), "SslSupportMethod");
    }

    #[test]
    fn test_acm_certificate_requires_ssl_support_method() {
        let err = ViewerCertificate::from_external_form(&json!({"AcmCertificateArn": ACM_ARN}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.path(), "SslSupportMethod");
    }

    #[test]
    fn test_protocol_defaults_follow_certificate_source() {
        let default_cert =
            ViewerCertificate::from_external_form(&json!({"CloudFrontDefaultCertificate": true}))
                .unwrap();
        assert_eq!(
            default_cert.to_canonical_form(),
            json!({"CloudFrontDefaultCertificate": true, "MinimumProtocolVersion": "TLSv1"})
        );
        assert_eq!(default_cert, ViewerCertificate::cloudfront_default());

        let acm = ViewerCertificate::from_external_form(&json!({
            "AcmCertificateArn": ACM_ARN,
            "SslSupportMethod": "sni-only"
        }))
        .unwrap();
        assert_eq!(
            acm.to_canonical_form(),
            json!({
                "ACMCertificateArn": ACM_ARN,
                "SSLSupportMethod": "sni-only",
                "MinimumProtocolVersion": "TLSv1.1_2016"
            })
        );

        let iam = ViewerCertificate::from_external_form(&json!({
            "IamCertificateId": "ASCAEXAMPLE",
            "SslSupportMethod": "vip",
            "MinimumProtocolVersion": "TLSv1.2_2019"
        }))
        .unwrap();
        assert_eq!(iam.iam_certificate_id(), Some("ASCAEXAMPLE"));
        assert_eq!(iam.minimum_protocol_version(), "TLSv1.2_2019");
    }

    #[test]
    fn test_api_spelling_reparses() {
        let acm = ViewerCertificate::from_external_form(&json!({
            "AcmCertificateArn": ACM_ARN,
            "SslSupportMethod": "sni-only"
        }))
        .unwrap();
        let reparsed = ViewerCertificate::from_external_form(&acm.to_canonical_form()).unwrap();
        assert_eq!(reparsed, acm);
        assert_eq!(reparsed.acm_certificate_arn(), Some(ACM_ARN));
    }
}
