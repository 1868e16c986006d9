//! CloudFront DistributionConfig object graph.
//!
//! This module converts the loosely typed, CloudFormation-shaped `DistributionConfig` mapping that
//! a custom resource receives into a strongly typed tree of value objects, and serializes that tree
//! into the JSON shape the CloudFront `CreateDistribution` / `UpdateDistribution` API expects.
//!
//! # Conversion contract
//!
//! Every entity implements two operations:
//!
//! - [`ExternalForm::from_external_form`] validates and normalizes input. Booleans may arrive as
//!   strings (`"true"`, `"no"`, ...), integers as numeric strings, and every list-valued field may
//!   arrive either as a bare list (CloudFormation) or as a `{Quantity, Items}` mapping (API). All
//!   validation happens here; the first violated rule aborts the whole conversion.
//! - [`CanonicalForm::to_canonical_form`] emits the API shape: the quantity/items idiom for every
//!   list, `Items` omitted when the quantity is zero, absent optionals left out entirely.
//!
//! Feeding a canonical form back through `from_external_form` reproduces the same canonical form,
//! which is what lets the custom resource compare a template against a live distribution.
//!
//! Entities are immutable once built. Equality is defined on the canonical form, so two values that
//! reached the same shape through different defaulting paths compare equal.
//!
//! # Components
//!
//! - [`item_list`] - the generic quantity/items wrapper and its leaf instantiations
//! - [`forwarding`] - cookies, forwarded values and allowed methods
//! - [`behaviors`] - cache behaviors and the default cache behavior
//! - [`origins`] / [`origin_groups`] - origins and failover groups
//! - [`viewer_certificate`] / [`restrictions`] / [`access_logging`] / [`error_responses`]
//! - [`distribution`] - the `DistributionConfig` root aggregate and the tagged `Distribution`

use serde::Serialize;
use serde_json::Value;

pub mod access_logging;
pub mod behaviors;
pub mod caller_reference;
pub mod distribution;
pub mod error;
pub mod error_responses;
pub mod fields;
pub mod forwarding;
pub mod item_list;
pub mod lambda_associations;
pub mod origin_groups;
pub mod origins;
pub mod restrictions;
pub mod tags;
pub mod trusted_signers;
pub mod viewer_certificate;

pub use access_logging::Logging;
pub use behaviors::{BehaviorSettings, CacheBehavior, CacheBehaviors, DefaultCacheBehavior};
pub use caller_reference::{CallerReferenceProvider, FixedCallerReference, UuidCallerReference};
pub use distribution::{Distribution, DistributionConfig};
pub use error::{ErrorKind, MapResult, MappingError};
pub use error_responses::{CustomErrorResponse, CustomErrorResponses};
pub use forwarding::{AllowedMethods, Cookies, ForwardedValues};
pub use item_list::{ItemList, ListItem, OriginSslProtocols, StatusCodes, StringListItems};
pub use lambda_associations::{LambdaFunctionAssociation, LambdaFunctionAssociations};
pub use origin_groups::{
    FailoverCriteria, OriginGroup, OriginGroupMember, OriginGroupMembers, OriginGroups,
};
pub use origins::{
    CustomHeaders, CustomHeadersItem, CustomOriginConfig, Origin, Origins, S3OriginConfig,
};
pub use restrictions::{GeoRestrictionItem, Restrictions};
pub use tags::{Tag, Tags};
pub use trusted_signers::TrustedSigners;
pub use viewer_certificate::ViewerCertificate;

/// Construction from the CloudFormation-shaped (or API-shaped) input mapping
pub trait ExternalForm: Sized {
    fn from_external_form(value: &Value) -> MapResult<Self>;
}

/// Serialization into the CloudFront API shape
pub trait CanonicalForm: Serialize {
    fn to_canonical_form(&self) -> Value {
        // Entities only hold strings, integers, booleans and string-keyed maps.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Implements [`CanonicalForm`] and canonical-form equality for the listed entities.
macro_rules! canonical_entity {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl $crate::app::cfront::CanonicalForm for $entity {}

            impl PartialEq for $entity {
                fn eq(&self, other: &Self) -> bool {
                    use $crate::app::cfront::CanonicalForm;
                    self.to_canonical_form() == other.to_canonical_form()
                }
            }
        )+
    };
}

pub(crate) use canonical_entity;
