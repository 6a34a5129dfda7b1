//! Shopfront - Storefront Client Core
//!
//! The headless core of a mobile storefront client: cart, session, catalog,
//! and search state containers backed by a public demo REST API, with
//! device-local persistence.

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
pub use application::*;
