//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request-id, trace and body-limit layers)
//!     → request.rs (span per request, metrics)
//!     → api auth middleware
//!     → version.rs (resolve `ver` into an ApiVersion extension)
//!     → api handlers
//!     → JSON response
//! ```

pub mod request;
pub mod server;
pub mod version;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
pub use version::ApiVersion;
