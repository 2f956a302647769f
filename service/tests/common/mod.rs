//! Common test utilities for integration tests.
//!
//! - [`app_builder::TestAppBuilder`] - Build test Axum apps that mirror main.rs wiring
//! - [`graphql`] - Execute operations against the schema and read response headers
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_app() {
//!     let app = TestAppBuilder::new().build();
//!     // Use app.oneshot(...) to send requests
//! }
//! ```

#![allow(dead_code)]

pub mod app_builder;
pub mod graphql;
