//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the seed file, when one is configured
//! - Build the store and the shared application state
//!
//! # Design Decisions
//! - Fail fast: any seed error is fatal
//! - Without a seed file the mock starts empty, with no cipher groups

use std::path::Path;

use crate::config::MockConfig;
use crate::http::server::AppState;
use crate::store::{ConfigStore, SeedData, SeedError};

/// Build the application state for `config`.
pub fn bootstrap(config: MockConfig) -> Result<AppState, SeedError> {
    let seed = match config.seed.path.as_deref() {
        Some(path) => {
            tracing::info!(path = %path, "Loading seed file");
            SeedData::load(Path::new(path))?
        }
        None => {
            tracing::info!("No seed file configured, starting empty");
            SeedData::default()
        }
    };

    let store = ConfigStore::from_seed(seed.into_store()?);
    Ok(AppState::new(config, store))
}
