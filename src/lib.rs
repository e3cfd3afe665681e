//! Mock of an F5 BIG-IP management REST API.
//!
//! Serves client SSL profiles, cipher groups, certificate/key installation
//! and file uploads from an in-memory store so that automation tooling can
//! be exercised without an appliance.

pub mod api;
pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod net;
pub mod observability;
pub mod store;
pub mod validation;
pub mod vfs;

pub use config::schema::MockConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
