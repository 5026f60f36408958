//! # qcat API
//!
//! HTTP surface for the categorizer, built on actix-web.
//!
//! | Route              | Purpose                                   |
//! |--------------------|-------------------------------------------|
//! | `POST /categorize` | classify `{"question": "..."}`            |
//! | `GET /categories`  | category id to display name listing       |
//! | `GET /test`        | run the built-in probe questions          |
//! | `GET /health`      | liveness                                  |
//! | `GET /`            | service description                       |
//!
//! Categorization runs on actix's blocking pool because embedding providers
//! are synchronous.

pub mod rest;

pub use rest::{ApiState, RestApi, PROBE_QUESTIONS};
