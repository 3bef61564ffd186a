//! Admin account DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An admin account as returned by the backend (password never included).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserResponse {
    pub id: i32,
    pub username: String,
    pub role: String,
    pub department: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating an admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdminUserRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    pub department: Option<i32>,
}

/// DTO for updating an admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAdminUserRequest {
    pub username: String,
    pub password: Option<String>,
    pub role: String,
    pub department: Option<i32>,
}

/// DTO for resetting an admin account password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}
