//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → overrides.rs (CLI flags / F5_* env vars)
//!     → validation.rs (semantic checks)
//!     → MockConfig (validated, immutable)
//!     → shared with the HTTP layer at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use overrides::Overrides;
pub use schema::{ApiConfig, AuthConfig, ListenerConfig, MockConfig, ObservabilityConfig, TlsConfig};
