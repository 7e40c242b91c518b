//! Swagger 2.0 -> API Gateway integration tooling.
//!
//! This crate is intended to be used by:
//! - `unrelated-apigw-swagger` (the command-line filter)
//! - any host that already builds a Swagger document and wants to enrich it in-process
//!
//! It intentionally performs **no** network calls and knows nothing about how the base
//! document was generated.

pub mod config;
pub mod document;
pub mod error;
pub mod integration;
pub mod model;
pub mod settings;
pub mod transform;
