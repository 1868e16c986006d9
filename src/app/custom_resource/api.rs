//! The CloudFront API as seen by the custom resource handler.
//!
//! Requests and responses are JSON documents in the CloudFront API shape, the same shape the
//! `cfront` module produces, so an implementation only has to move them across the wire.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use super::lifecycle::StatusClass;
use super::response::{validate_response_keys, GET_RESPONSE_KEYS};
use crate::app::cfront::fields::parse_bool;
use crate::app::cfront::Tags;

#[derive(Debug)]
pub enum ApiError {
    /// The distribution does not exist
    NotFound(String),
    /// The submitted configuration equals the live one
    NoUpdates,
    Other(anyhow::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(id) => write!(f, "The specified distribution does not exist: {}", id),
            ApiError::NoUpdates => write!(f, "No updates are to be performed"),
            ApiError::Other(err) => write!(f, "{:#}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Other(err)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// CloudFront operations the handler needs
#[async_trait]
pub trait DistributionApi: Send + Sync {
    /// `CreateDistribution` with a bare `DistributionConfig`
    async fn create_distribution(&self, config: Value) -> ApiResult<Value>;

    /// `CreateDistributionWithTags` with `{DistributionConfig, Tags}`
    async fn create_distribution_with_tags(&self, config_with_tags: Value) -> ApiResult<Value>;

    /// `GetDistribution`; the response carries `Distribution` and `ETag`
    async fn get_distribution(&self, id: &str) -> ApiResult<Value>;

    async fn update_distribution(&self, id: &str, if_match: &str, config: Value)
        -> ApiResult<Value>;

    async fn delete_distribution(&self, id: &str, if_match: &str) -> ApiResult<()>;

    /// `ListTagsForResource`; the response carries `Tags.Items`
    async fn list_tags(&self, arn: &str) -> ApiResult<Value>;

    async fn tag_resource(&self, arn: &str, tags: &Tags) -> ApiResult<()>;

    async fn untag_resource(&self, arn: &str, keys: &[String]) -> ApiResult<()>;
}

/// The parts of a `GetDistribution` response the handler acts on
#[derive(Debug, Clone)]
pub struct LiveDistribution {
    pub id: String,
    pub arn: String,
    pub status: String,
    pub domain_name: String,
    /// Live configuration exactly as returned
    pub config: Value,
    pub etag: Option<String>,
}

impl LiveDistribution {
    pub fn from_response(response: &Value) -> Result<Self> {
        validate_response_keys(response, GET_RESPONSE_KEYS)
            .context("Invalid GetDistribution response")?;
        let distribution = response
            .get("Distribution")
            .context("GetDistribution response has no 'Distribution'")?;
        let text = |key: &str| -> Result<String> {
            distribution
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .with_context(|| format!("GetDistribution response has no 'Distribution.{}'", key))
        };

        Ok(Self {
            id: text("Id")?,
            arn: text("ARN")?,
            status: text("Status")?,
            domain_name: text("DomainName")?,
            config: distribution
                .get("DistributionConfig")
                .cloned()
                .context("GetDistribution response has no 'Distribution.DistributionConfig'")?,
            etag: response
                .get("ETag")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
    }

    /// Live `Enabled`, which may come back as a bool-like string
    pub fn enabled(&self) -> Result<bool> {
        let enabled = self
            .config
            .get("Enabled")
            .with_context(|| format!("live distribution {} has no 'Enabled' state", self.id))?;
        parse_bool("Enabled", enabled).map_err(|e| {
            anyhow!(
                "unable to read 'Enabled' of live distribution {}: {}",
                self.id,
                e
            )
        })
    }

    pub fn caller_reference(&self) -> Result<&str> {
        self.config
            .get("CallerReference")
            .and_then(|v| v.as_str())
            .with_context(|| format!("live distribution {} has no 'CallerReference'", self.id))
    }

    pub fn status_class(&self) -> StatusClass {
        StatusClass::classify(&self.status)
    }

    pub fn require_etag(&self) -> Result<&str> {
        self.etag.as_deref().with_context(|| {
            format!(
                "got no ETag for live distribution {}. cannot change it",
                self.id
            )
        })
    }
}
