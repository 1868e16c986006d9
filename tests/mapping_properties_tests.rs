//! Mapping Property Tests
//!
//! Laws every entity obeys: reparsing the API form is a fixed point, list wrappers keep
//! `Quantity` in step with `Items`, cached methods stay within allowed methods, TTLs are
//! ordered and exactly one viewer certificate source is named.

use cfront_distro::app::cfront::{
    AllowedMethods, CacheBehavior, CanonicalForm, CustomErrorResponse, DefaultCacheBehavior,
    DistributionConfig, ErrorKind, ExternalForm, GeoRestrictionItem, OriginGroups, Origins,
    StatusCodes, StringListItems, TrustedSigners, ViewerCertificate,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn assert_fixed_point<T: ExternalForm + CanonicalForm>(input: Value) {
    let first = T::from_external_form(&input).unwrap().to_canonical_form();
    let second = T::from_external_form(&first).unwrap().to_canonical_form();
    assert_eq!(first, second, "reparsing changed the API form of {}", input);
}

fn behavior(extra: Value) -> Value {
    let mut behavior = json!({
        "TargetOriginId": "origin",
        "ForwardedValues": {"QueryString": "true"},
        "ViewerProtocolPolicy": "allow-all"
    });
    if let (Some(target), Some(extra)) = (behavior.as_object_mut(), extra.as_object()) {
        target.extend(extra.clone());
    }
    behavior
}

#[test]
fn test_round_trip_fixed_points() {
    assert_fixed_point::<StringListItems>(json!([]));
    assert_fixed_point::<StringListItems>(json!(["a", 7]));
    assert_fixed_point::<StatusCodes>(json!([500, "502"]));
    assert_fixed_point::<TrustedSigners>(json!(["self", "111122223333"]));
    assert_fixed_point::<GeoRestrictionItem>(json!({"RestrictionType": "blacklist", "Locations": ["RU"]}));
    assert_fixed_point::<ViewerCertificate>(json!({"IamCertificateId": "ASCA1", "SslSupportMethod": "vip"}));
    assert_fixed_point::<CustomErrorResponse>(json!({"ErrorCode": 403, "ResponsePagePath": "/", "ResponseCode": 200}));
    assert_fixed_point::<Origins>(json!([{
        "Id": "o",
        "DomainName": "o.example.com",
        "CustomOriginConfig": {"OriginProtocolPolicy": "match-viewer", "OriginSSLProtocols": ["TLSv1.2"]}
    }]));
    assert_fixed_point::<OriginGroups>(json!([{
        "Id": "group",
        "FailoverCriteria": {"StatusCodes": [500, 503]},
        "Members": ["primary", {"OriginId": "secondary"}]
    }]));
    assert_fixed_point::<DefaultCacheBehavior>(behavior(json!({
        "AllowedMethods": ["GET", "HEAD", "OPTIONS"],
        "LambdaFunctionAssociations": [{"LambdaFunctionARN": "arn:aws:lambda:us-east-1:1:function:f:1",
                                        "EventType": "viewer-request"}]
    })));
    assert_fixed_point::<CacheBehavior>(behavior(json!({
        "PathPattern": "/img/*",
        "TrustedSigners": ["self"],
        "CachedMethods": ["GET", "HEAD"]
    })));
    assert_fixed_point::<DistributionConfig>(json!({
        "CallerReference": "ref",
        "Enabled": false,
        "Origins": [{"Id": "origin", "DomainName": "o.example.com", "S3OriginConfig": {}}],
        "DefaultCacheBehavior": behavior(json!({})),
        "Logging": {"Bucket": "logs.example.com", "Enabled": "false"},
        "Restrictions": {"GeoRestriction": {"RestrictionType": "whitelist", "Locations": ["US"]}}
    }));
}

#[test]
fn test_quantity_matches_items() {
    for input in [json!([]), json!(["a"]), json!(["a", "b", "c"])] {
        let canonical = StringListItems::from_external_form(&input).unwrap().to_canonical_form();
        let expected = input.as_array().map(Vec::len).unwrap_or_default();
        assert_eq!(canonical["Quantity"], json!(expected));
        match canonical.get("Items") {
            Some(items) => assert_eq!(items.as_array().map(Vec::len), Some(expected)),
            None => assert_eq!(expected, 0),
        }
    }

    let err = StringListItems::from_external_form(&json!({"Quantity": 3, "Items": ["a"]})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_cached_methods_subset_of_allowed() {
    let methods = AllowedMethods::from_external_form(
        Some(&json!(["GET", "HEAD", "OPTIONS"])),
        Some(&json!(["GET", "HEAD"])),
    )
    .unwrap();
    let cached = methods.cached_methods().unwrap_or_default();
    assert!(cached.iter().all(|m| methods.methods().contains(m)));

    let err = AllowedMethods::from_external_form(Some(&json!(["GET", "HEAD"])), Some(&json!(["GET", "POST"])))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_cached_methods_alone_set_allowed_methods() {
    let methods = AllowedMethods::from_external_form(None, Some(&json!(["GET", "HEAD"]))).unwrap();
    assert_eq!(
        methods.to_canonical_form(),
        json!({
            "Quantity": 2,
            "Items": ["GET", "HEAD"],
            "CachedMethods": {"Quantity": 2, "Items": ["GET", "HEAD"]}
        })
    );
}

#[test]
fn test_ttl_ordering() {
    let cases = [
        (json!({"MinTTL": 100, "MaxTTL": 50}), false),
        (json!({"MinTTL": 31536001}), false),
        (json!({"MaxTTL": 0, "MinTTL": 1}), false),
        (json!({"MinTTL": 60, "MaxTTL": 60}), true),
        (json!({"MinTTL": 31536000}), true),
        (json!({"MaxTTL": 0}), true),
    ];
    for (ttls, valid) in cases {
        let result = DefaultCacheBehavior::from_external_form(&behavior(ttls.clone()));
        assert_eq!(result.is_ok(), valid, "TTLs {}", ttls);
        if let Err(err) = result {
            assert_eq!(err.kind(), ErrorKind::Value, "TTLs {}", ttls);
        }
    }
}

#[test]
fn test_viewer_certificate_union() {
    let none = ViewerCertificate::from_external_form(&json!({"MinimumProtocolVersion": "TLSv1"})).unwrap_err();
    assert_eq!(none.kind(), ErrorKind::Value);
    assert!(none.to_string().contains("none specified"));

    let both = ViewerCertificate::from_external_form(&json!({
        "CloudFrontDefaultCertificate": true,
        "IamCertificateId": "ASCA1",
        "SslSupportMethod": "sni-only"
    }))
    .unwrap_err();
    assert_eq!(both.kind(), ErrorKind::Value);
    assert!(both.to_string().contains("ambiguous"));

    let default = ViewerCertificate::from_external_form(&json!({"CloudFrontDefaultCertificate": "true"})).unwrap();
    assert_eq!(default.minimum_protocol_version(), "TLSv1");
    assert!(default.ssl_support_method().is_none());

    let acm = ViewerCertificate::from_external_form(&json!({
        "AcmCertificateArn": "arn:aws:acm:us-east-1:1:certificate/x",
        "SslSupportMethod": "sni-only"
    }))
    .unwrap();
    assert_eq!(acm.minimum_protocol_version(), "TLSv1.1_2016");

    let missing_method =
        ViewerCertificate::from_external_form(&json!({"IamCertificateId": "ASCA1"})).unwrap_err();
    assert_eq!(missing_method.kind(), ErrorKind::Value);
    assert_eq!(missing_method.path(), "SslSupportMethod");
}

#[test]
fn test_catch_all_path_pattern_is_reserved() {
    let err = CacheBehavior::from_external_form(&behavior(json!({"PathPattern": "*"}))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
    assert!(err.to_string().contains("PathPattern cannot be '*'"));
}

#[test]
fn test_error_page_needs_response_code() {
    let err = CustomErrorResponse::from_external_form(&json!({
        "ErrorCode": 404,
        "ResponsePagePath": "/404.html"
    }))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_wrong_shapes_are_type_errors() {
    let err = StringListItems::from_external_form(&json!("GET")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);

    let err = DefaultCacheBehavior::from_external_form(&behavior(json!({"Compress": "maybe"}))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(err.path(), "Compress");

    let err = DefaultCacheBehavior::from_external_form(&behavior(json!({"DefaultTTL": 1.5}))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
}
