//! CloudFormation custom resource backed by a CloudFront distribution.
//!
//! The handler receives Create/Update/Delete events, maps their `ResourceProperties` through
//! [`crate::app::cfront`], and drives the CloudFront API through [`DistributionApi`]. CloudFront
//! only deletes disabled distributions, so deletion is a polled sequence: wait while deploying,
//! disable, wait again, delete.

pub mod api;
pub mod event;
pub mod handler;
pub mod lifecycle;
pub mod response;
pub mod tag_work;

pub use api::{ApiError, ApiResult, DistributionApi, LiveDistribution};
pub use event::{CustomResourceEvent, RequestType};
pub use handler::{request_payload, CustomResourceHandler, HandlerOutcome, PollSchedule};
pub use lifecycle::{disabled_config, DeletionStep, PollOutcome, StatusClass};
pub use response::{validate_response_keys, ExpectedKey, CREATE_RESPONSE_KEYS, GET_RESPONSE_KEYS};
pub use tag_work::{plan_tag_update, TagUpdateWork};
