//! Application modules.
//!
//! - [`cfront`] maps CloudFormation-style distribution configs to the CloudFront API form
//! - [`custom_resource`] handles custom resource events on top of that mapping
//! - [`settings`] loads the command-line tool's settings

pub mod cfront;
pub mod custom_resource;
pub mod settings;
