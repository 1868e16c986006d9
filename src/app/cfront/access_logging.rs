//! Standard access logging to an S3 bucket.

use serde::Serialize;
use serde_json::Value;

use super::error::MapResult;
use super::fields::Fields;
use super::{canonical_entity, ExternalForm};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Logging {
    enabled: bool,
    include_cookies: bool,
    bucket: String,
    prefix: String,
}

impl Logging {
    /// Shape sent when the template configures no logging
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            include_cookies: false,
            bucket: String::new(),
            prefix: String::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl ExternalForm for Logging {
    /// Configuring a bucket turns logging on unless `Enabled` says otherwise.
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            bucket: fields.required_str("Bucket")?,
            enabled: fields.bool_or("Enabled", true)?,
            include_cookies: fields.bool_or("IncludeCookies", false)?,
            prefix: fields.str_or("Prefix", "")?,
        })
    }
}

canonical_entity!(Logging);
