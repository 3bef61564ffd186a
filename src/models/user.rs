//! Attendance user DTOs.

use serde::{Deserialize, Serialize};

/// A tracked user as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i32,
    pub user_id: String,
    pub user_name: Option<String>,
    pub department: i32,
    pub department_name: Option<String>,
    pub passkey: String,
}

/// DTO for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub user_id: String,
    pub user_name: Option<String>,
    pub department: i32,
    pub department_name: Option<String>,
    pub passkey: String,
}

/// DTO for updating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub user_id: String,
    pub user_name: Option<String>,
    pub department: i32,
    pub department_name: Option<String>,
    pub passkey: String,
}

impl UserInfo {
    /// Display name falls back to the user id.
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or(&self.user_id)
    }
}
