//! cfront-distro: a CloudFront distribution as a CloudFormation custom resource.
//!
//! CloudFormation templates describe distributions loosely: booleans as strings, plain lists
//! where CloudFront wants `{Quantity, Items}`, optional blocks left out. This crate turns that
//! external form into the exact document the CloudFront API accepts and runs the custom resource
//! lifecycle around it.
//!
//! # Modules
//!
//! - [`app::cfront`]: typed distribution model, validation and canonical serialization
//! - [`app::custom_resource`]: Create/Update/Delete handling against a [`app::custom_resource::DistributionApi`]
//! - [`app::settings`]: user settings for the command-line tool
//!
//! # Example
//!
//! ```
//! use cfront_distro::app::cfront::{CanonicalForm, Cookies, ExternalForm};
//! use serde_json::json;
//!
//! let cookies = Cookies::from_external_form(&json!({"Forward": "none"})).unwrap();
//! assert_eq!(cookies.to_canonical_form(), json!({"Forward": "none"}));
//! ```

#![warn(clippy::all, rust_2018_idioms)]

#[macro_use]
pub mod logging_macros;

pub mod app;
