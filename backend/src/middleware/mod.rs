//! Request middleware.
//!
//! [`Trace`] scopes each request to a fresh [`crate::TraceId`] and echoes it
//! in the response headers.

pub mod trace;

pub use trace::Trace;
