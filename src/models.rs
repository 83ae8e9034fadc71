use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: i64,
    pub api_key: String,
    pub service_name: String,
    pub created_at: DateTime<Utc>,
    pub out_of_date: bool,
}

/// Key that no user has claimed yet, offered on the registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedApiKey {
    pub api_key: String,
    pub service_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub api_key: String,
}

// Request models. Every field is optional so that a missing field becomes a
// 400 with our own message instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CheckApiKeyRequest {
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateApiKeyRequest {
    pub service_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminCredentials {
    pub email: Option<String>,
    pub password: Option<String>,
}
