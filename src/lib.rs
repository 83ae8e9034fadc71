// API Key Service
// Main library module

pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod security;

use std::sync::Arc;

// Re-export commonly used items
pub use config::Config;
pub use database::Database;
pub use errors::ApiError;
pub use handlers::{AppState, SharedState};
pub use models::{ApiKey, NewUser, UnusedApiKey, User};
pub use routes::router;
pub use security::{ApiKeyGenerator, PasswordHasher};

/// Opens the database and assembles the shared handler state.
pub fn build_state(config: &Config) -> Result<SharedState, ApiError> {
    let db = Database::new(&config.database_path)?;
    Ok(Arc::new(AppState {
        db,
        keys: ApiKeyGenerator::new(config.key_prefix.clone()),
        hasher: PasswordHasher::new(config.bcrypt_cost),
    }))
}
