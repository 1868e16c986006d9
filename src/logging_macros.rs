#![warn(clippy::all, rust_2018_idioms)]

//! `tracing` macros that prefix every event with `[file:module:line]`.
//!
//! ```text
//! [src/app/custom_resource/handler.rs:cfront_distro::app::custom_resource::handler:118] create payload: {...}
//! ```
//!
//! The mapping core in `app::cfront` never logs; it reports through `MappingError`.
//!
//! Levels:
//! - TRACE: per-item detail
//! - DEBUG: payloads, live versus desired comparisons, poll attempts
//! - INFO: requests received, API calls made, outcomes
//! - WARN: fallbacks such as ignoring an unreadable settings file
//! - ERROR: failed API calls and malformed responses

#[doc(hidden)]
#[macro_export]
macro_rules! trace_with_context {
    ($level:ident, $($arg:tt)*) => {
        tracing::$level!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! trace_trace {
    ($($arg:tt)*) => { $crate::trace_with_context!(trace, $($arg)*) };
}

#[macro_export]
macro_rules! trace_debug {
    ($($arg:tt)*) => { $crate::trace_with_context!(debug, $($arg)*) };
}

#[macro_export]
macro_rules! trace_info {
    ($($arg:tt)*) => { $crate::trace_with_context!(info, $($arg)*) };
}

#[macro_export]
macro_rules! trace_warn {
    ($($arg:tt)*) => { $crate::trace_with_context!(warn, $($arg)*) };
}

#[macro_export]
macro_rules! trace_error {
    ($($arg:tt)*) => { $crate::trace_with_context!(error, $($arg)*) };
}
