use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::database::Database;
use crate::errors::ApiError;
use crate::models::{
    AdminCredentials, ApiKey, CheckApiKeyRequest, CreateApiKeyRequest, NewUser, SaveUserRequest,
    UnusedApiKey, User,
};
use crate::security::{ApiKeyGenerator, PasswordHasher};

pub struct AppState {
    pub db: Database,
    pub keys: ApiKeyGenerator,
    pub hasher: PasswordHasher,
}

pub type SharedState = Arc<AppState>;

type JsonResult = Result<Json<Value>, ApiError>;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Runs a database or hashing call on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Absent, null and blank values all count as missing.
fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::InvalidRequest(message.to_string())),
    }
}

pub async fn check_api_key(
    State(state): State<SharedState>,
    payload: Result<Json<CheckApiKeyRequest>, JsonRejection>,
) -> JsonResult {
    let Json(payload) = payload?;
    let api_key = required(payload.api_key, "API key is required")?;

    let db = state.db.clone();
    let found = blocking(move || db.find_api_key(&api_key)).await?;

    Ok(Json(match found {
        Some(key) => json!({
            "valid": true,
            "service_name": key.service_name,
            "created_at": key.created_at,
        }),
        None => json!({
            "valid": false,
            "message": "API key not found",
        }),
    }))
}

pub async fn create_api_key(
    State(state): State<SharedState>,
    payload: Result<Json<CreateApiKeyRequest>, JsonRejection>,
) -> JsonResult {
    let Json(payload) = payload?;
    let service_name = required(payload.service_name, "Service name is required")?;

    let api_key = state.keys.generate();
    let db = state.db.clone();
    let (key, service) = (api_key.clone(), service_name.clone());
    let id = blocking(move || db.create_api_key(&key, &service)).await?;

    tracing::info!(id, service_name = %service_name, "API key created");

    Ok(Json(json!({
        "apiKey": api_key,
        "message": "API key created and saved",
    })))
}

pub async fn list_unused_api_keys(
    State(state): State<SharedState>,
) -> Result<Json<Vec<UnusedApiKey>>, ApiError> {
    let db = state.db.clone();
    let keys = blocking(move || db.list_unused_api_keys()).await?;
    Ok(Json(keys))
}

pub async fn save_user(
    State(state): State<SharedState>,
    payload: Result<Json<SaveUserRequest>, JsonRejection>,
) -> JsonResult {
    let Json(payload) = payload?;
    const MISSING: &str = "All fields are required and an API key must be selected";
    let user = NewUser {
        first_name: required(payload.first_name, MISSING)?,
        last_name: required(payload.last_name, MISSING)?,
        email: required(payload.email, MISSING)?,
        api_key: required(payload.api_key, MISSING)?,
    };

    // Validate the key first, then insert. The two steps are not atomic; the
    // foreign key still catches a key deleted in between.
    let db = state.db.clone();
    let key = user.api_key.clone();
    if !blocking(move || db.api_key_exists(&key)).await? {
        return Err(ApiError::InvalidApiKey);
    }

    let db = state.db.clone();
    let email = user.email.clone();
    let user_id = blocking(move || db.create_user(&user)).await?;

    tracing::info!(user_id, email = %email, "user saved");

    Ok(Json(json!({
        "success": true,
        "message": "User saved",
        "user_id": user_id,
    })))
}

pub async fn register_admin(
    State(state): State<SharedState>,
    payload: Result<Json<AdminCredentials>, JsonRejection>,
) -> JsonResult {
    let Json(payload) = payload?;
    const MISSING: &str = "Email and password are required";
    let email = required(payload.email, MISSING)?;
    let password = required(payload.password, MISSING)?;

    let shared = Arc::clone(&state);
    let admin_email = email.clone();
    blocking(move || {
        let hash = shared.hasher.hash(&password)?;
        shared.db.create_admin(&admin_email, &hash)
    })
    .await?;

    tracing::info!(email = %email, "admin registered");

    Ok(Json(json!({
        "success": true,
        "message": "Admin registered",
    })))
}

pub async fn login_admin(
    State(state): State<SharedState>,
    payload: Result<Json<AdminCredentials>, JsonRejection>,
) -> JsonResult {
    let Json(payload) = payload?;
    const MISSING: &str = "Email and password are required";
    let email = required(payload.email, MISSING)?;
    let password = required(payload.password, MISSING)?;

    let matched = blocking(move || match state.db.find_admin_password(&email)? {
        Some(hash) => state.hasher.verify(&password, &hash),
        None => Ok(false),
    })
    .await?;

    if matched {
        Ok(Json(json!({ "success": true, "message": "Login successful" })))
    } else {
        tracing::warn!("admin login rejected");
        Ok(Json(json!({ "success": false, "message": INVALID_CREDENTIALS })))
    }
}

pub async fn list_users(State(state): State<SharedState>) -> Result<Json<Vec<User>>, ApiError> {
    let db = state.db.clone();
    let users = blocking(move || db.list_users()).await?;
    Ok(Json(users))
}

pub async fn list_api_keys(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ApiKey>>, ApiError> {
    let db = state.db.clone();
    let keys = blocking(move || db.list_api_keys()).await?;
    Ok(Json(keys))
}

pub async fn delete_user(
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> JsonResult {
    let Path(id) = id?;
    let db = state.db.clone();
    blocking(move || db.delete_user(id)).await?;

    tracing::info!(id, "user deleted");
    Ok(Json(json!({ "success": true, "message": "User deleted" })))
}

pub async fn delete_api_key(
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> JsonResult {
    let Path(id) = id?;
    let db = state.db.clone();
    blocking(move || db.delete_api_key(id)).await?;

    tracing::info!(id, "API key deleted");
    Ok(Json(json!({ "success": true, "message": "API key deleted" })))
}
