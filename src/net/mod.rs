//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! listener.tls set?
//!     yes → tls.rs (load cert/key into rustls) → axum-server HTTPS listener
//!     no  → tokio TcpListener → plain HTTP
//! ```

pub mod tls;

pub use tls::load_tls_config;
