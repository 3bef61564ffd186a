//! API payload types.
//!
//! Shapes are dictated by the backend REST API and treated as a fixed
//! contract.

pub mod admin_user;
pub mod checkin;
pub mod point;
pub mod stats;
pub mod user;

use serde::{Deserialize, Serialize};

/// Response envelope used by every backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let json = r#"{"success":true,"data":[1,2,3],"message":"ok"}"#;
        let resp: ApiResponse<Vec<i32>> = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_envelope_failure_without_data() {
        let json = r#"{"success":false,"message":"db error"}"#;
        let resp: ApiResponse<Vec<i32>> = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.message.as_deref(), Some("db error"));
    }
}
