//! Request handlers for API endpoints
//!
//! Handlers extract and validate request input, call a service and shape the
//! response; errors are returned as [`crate::Error`].

pub mod admin;
pub mod dataset;
pub mod import;
pub mod metrics;
pub mod search;
