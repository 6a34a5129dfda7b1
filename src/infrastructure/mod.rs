//! Infrastructure layer providing external service integrations.
//!
//! This module contains the durable key-value storage backends, the
//! background writer that makes storage mirroring fire-and-forget, and the
//! HTTP client for the remote storefront API.

pub mod persistence;
pub mod api;

pub use persistence::*;
pub use api::*;
