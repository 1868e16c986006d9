//! Lambda@Edge functions attached to a cache behavior.

use serde::Serialize;
use serde_json::Value;

use super::error::MapResult;
use super::fields::Fields;
use super::item_list::{ItemList, ListItem};
use super::{canonical_entity, ExternalForm};

#[derive(Debug, Clone, Serialize)]
pub struct LambdaFunctionAssociation {
    #[serde(rename = "LambdaFunctionARN")]
    lambda_function_arn: String,
    /// `viewer-request`, `origin-request`, ... passed through unchecked
    #[serde(rename = "EventType")]
    event_type: String,
    #[serde(rename = "IncludeBody")]
    include_body: bool,
}

impl LambdaFunctionAssociation {
    pub fn lambda_function_arn(&self) -> &str {
        &self.lambda_function_arn
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn include_body(&self) -> bool {
        self.include_body
    }
}

impl ExternalForm for LambdaFunctionAssociation {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let fields = Fields::of(value)?;
        Ok(Self {
            lambda_function_arn: fields.required_str("LambdaFunctionARN")?,
            event_type: fields.required_str("EventType")?,
            include_body: fields.bool_or("IncludeBody", false)?,
        })
    }
}

impl ListItem for LambdaFunctionAssociation {
    fn from_list_entry(value: &Value) -> MapResult<Self> {
        Self::from_external_form(value)
    }
}

pub type LambdaFunctionAssociations = ItemList<LambdaFunctionAssociation>;

canonical_entity!(LambdaFunctionAssociation);
