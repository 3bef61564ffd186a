//! Checkin record DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw attendance event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkin {
    pub id: i32,
    pub user_id: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_synced: i32,
}

/// DTO for creating a checkin record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckinRequest {
    pub user_id: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_synced: i32,
}

/// DTO for updating a checkin record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCheckinRequest {
    pub user_id: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_synced: i32,
}

/// Server-side filters for the checkin listing.
#[derive(Debug, Clone, Default)]
pub struct CheckinFilter {
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub limit: Option<u32>,
}

impl CheckinFilter {
    /// Assemble query parameters, omitting unset filters.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(user_id) = &self.user_id {
            params.push(("user_id", user_id.clone()));
        }
        if let Some(action) = &self.action {
            params.push(("action", action.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_params() {
        assert!(CheckinFilter::default().to_params().is_empty());
    }

    #[test]
    fn test_filter_params() {
        let filter = CheckinFilter {
            user_id: Some("u5".to_string()),
            action: Some("checkin".to_string()),
            limit: Some(50),
        };
        assert_eq!(
            filter.to_params(),
            vec![
                ("user_id", "u5".to_string()),
                ("action", "checkin".to_string()),
                ("limit", "50".to_string()),
            ]
        );
    }
}
