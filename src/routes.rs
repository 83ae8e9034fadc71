use axum::{
    routing::{delete, get, post},
    Router,
};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers::{self, SharedState};

/// Builds the application router. Any path without an API route is served
/// from `static_dir`, so `/` resolves to `index.html`.
pub fn router(state: SharedState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/cekapi", post(handlers::check_api_key))
        .route("/create", post(handlers::create_api_key))
        .route("/get-apikeys", get(handlers::list_unused_api_keys))
        .route("/save-user", post(handlers::save_user))
        .route("/admin/register", post(handlers::register_admin))
        .route("/admin/login", post(handlers::login_admin))
        .route("/admin/users", get(handlers::list_users))
        .route("/admin/apikeys", get(handlers::list_api_keys))
        .route("/admin/users/:id", delete(handlers::delete_user))
        .route("/admin/apikeys/:id", delete(handlers::delete_api_key))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
