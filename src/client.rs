//! Backend REST API client.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::ApiResponse;
use crate::models::admin_user::{
    AdminUserResponse, CreateAdminUserRequest, ResetPasswordRequest, UpdateAdminUserRequest,
};
use crate::models::checkin::{Checkin, CheckinFilter, CreateCheckinRequest, UpdateCheckinRequest};
use crate::models::point::{CreatePointRequest, GeofencePoint, PointKind, UpdatePointRequest};
use crate::models::stats::{DepartmentStat, DepartmentStatsResponse, UserDetailResponse};
use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserInfo};
use crate::stats::{StatsGateway, StatsQuery};

/// HTTP client for the attendance backend's admin API.
///
/// Attaches the stored bearer token to every request. An HTTP 401 maps to
/// [`AppError::SessionExpired`]; an envelope with `success: false` maps to
/// [`AppError::Gateway`] carrying the backend's message.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The backend URL (e.g., "http://localhost:8080")
    /// * `token` - Admin session bearer token
    pub fn new(base_url: &str, token: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{base}/admin{path}", base = self.base_url)
    }

    /// Unwrap the response envelope, mapping the failure modes.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AppError::SessionExpired);
        }

        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.success {
            return Err(AppError::Gateway(
                envelope.message.unwrap_or_else(|| "request failed".to_string()),
            ));
        }

        envelope
            .data
            .ok_or_else(|| AppError::parse("response missing data payload"))
    }

    /// Like [`Self::decode`] but for endpoints whose payload we discard.
    async fn decode_ack(response: reqwest::Response) -> Result<()> {
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AppError::SessionExpired);
        }

        let envelope: ApiResponse<serde_json::Value> = response.json().await?;
        if !envelope.success {
            return Err(AppError::Gateway(
                envelope.message.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&'static str, String)]) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::decode_ack(response).await
    }

    async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let response = self
            .client
            .put(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::decode_ack(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode_ack(response).await
    }

    // --- Users ---

    pub async fn list_users(&self) -> Result<Vec<UserInfo>> {
        self.get("/users", &[]).await
    }

    pub async fn create_user(&self, data: &CreateUserRequest) -> Result<()> {
        self.post("/users", data).await
    }

    pub async fn update_user(&self, id: i32, data: &UpdateUserRequest) -> Result<()> {
        self.put(&format!("/users/{id}"), data).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<()> {
        self.delete(&format!("/users/{id}")).await
    }

    // --- Geofence points ---

    pub async fn list_points(&self, kind: PointKind) -> Result<Vec<GeofencePoint>> {
        self.get(&format!("/points/{}", kind.path_segment()), &[]).await
    }

    pub async fn create_point(&self, kind: PointKind, data: &CreatePointRequest) -> Result<()> {
        self.post(&format!("/points/{}", kind.path_segment()), data).await
    }

    pub async fn update_point(&self, kind: PointKind, id: i32, data: &UpdatePointRequest) -> Result<()> {
        self.put(&format!("/points/{}/{id}", kind.path_segment()), data).await
    }

    pub async fn delete_point(&self, kind: PointKind, id: i32) -> Result<()> {
        self.delete(&format!("/points/{}/{id}", kind.path_segment())).await
    }

    // --- Checkin records ---

    pub async fn list_checkins(&self, filter: &CheckinFilter) -> Result<Vec<Checkin>> {
        self.get("/checkins", &filter.to_params()).await
    }

    pub async fn create_checkin(&self, data: &CreateCheckinRequest) -> Result<()> {
        self.post("/checkins", data).await
    }

    pub async fn update_checkin(&self, id: i32, data: &UpdateCheckinRequest) -> Result<()> {
        self.put(&format!("/checkins/{id}"), data).await
    }

    pub async fn delete_checkin(&self, id: i32) -> Result<()> {
        self.delete(&format!("/checkins/{id}")).await
    }

    // --- Admin accounts ---

    pub async fn list_admin_users(&self) -> Result<Vec<AdminUserResponse>> {
        self.get("/admin-users", &[]).await
    }

    pub async fn create_admin_user(&self, data: &CreateAdminUserRequest) -> Result<()> {
        self.post("/admin-users", data).await
    }

    pub async fn update_admin_user(&self, id: i32, data: &UpdateAdminUserRequest) -> Result<()> {
        self.put(&format!("/admin-users/{id}"), data).await
    }

    pub async fn delete_admin_user(&self, id: i32) -> Result<()> {
        self.delete(&format!("/admin-users/{id}")).await
    }

    pub async fn reset_admin_password(&self, id: i32, data: &ResetPasswordRequest) -> Result<()> {
        self.put(&format!("/admin-users/{id}/password"), data).await
    }

    // --- Statistics ---

    pub async fn get_filtered_department_stats(&self, query: &StatsQuery) -> Result<Vec<DepartmentStat>> {
        let response: DepartmentStatsResponse = self
            .get("/stats/department/filtered", &query.to_params())
            .await?;
        Ok(response.departments)
    }

    pub async fn get_user_detail(&self, user_id: &str, month: u32, year: i32) -> Result<UserDetailResponse> {
        let params = [
            ("user_id", user_id.to_string()),
            ("month", month.to_string()),
            ("year", year.to_string()),
        ];
        self.get("/stats/user-detail", &params).await
    }
}

impl StatsGateway for ApiClient {
    async fn filtered_department_stats(&self, query: &StatsQuery) -> Result<Vec<DepartmentStat>> {
        self.get_filtered_department_stats(query).await
    }

    async fn user_month_detail(&self, user_id: &str, month: u32, year: i32) -> Result<UserDetailResponse> {
        self.get_user_detail(user_id, month, year).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8080/", "tok", 30).unwrap();
        assert_eq!(client.url("/users"), "http://localhost:8080/admin/users");
    }

    #[test]
    fn test_stats_envelope_decodes() {
        let json = r#"{
            "success": true,
            "data": {
                "departments": [{
                    "department": 2,
                    "department_name": "Ops",
                    "user_count": 3,
                    "total_attendance_days": 41,
                    "avg_work_hours": 6.75,
                    "users": [{
                        "user_id": "u9",
                        "user_name": null,
                        "total_days": 14,
                        "total_hours": 98.5,
                        "last_checkin": "2024-06-28T09:02:11Z"
                    }]
                }]
            },
            "message": "Department statistics retrieved"
        }"#;

        let envelope: ApiResponse<DepartmentStatsResponse> = serde_json::from_str(json).unwrap();
        let stats = envelope.data.unwrap();
        assert_eq!(stats.departments.len(), 1);
        assert_eq!(stats.departments[0].department, 2);
        assert_eq!(stats.departments[0].users[0].display_name(), "u9");
    }

    #[test]
    fn test_user_detail_envelope_decodes() {
        let json = r#"{
            "success": true,
            "data": {
                "user_id": "u9",
                "user_name": "Nine",
                "month": 6,
                "year": 2024,
                "total_days": 2,
                "total_hours": 15.5,
                "records": [{
                    "date": "2024-06-03",
                    "first_checkin": "2024-06-03T08:55:00Z",
                    "last_checkout": "2024-06-03T17:40:00Z",
                    "total_work_minutes": 525,
                    "total_sessions": 1,
                    "is_late": false,
                    "is_early_leave": false
                }]
            }
        }"#;

        let envelope: ApiResponse<UserDetailResponse> = serde_json::from_str(json).unwrap();
        let detail = envelope.data.unwrap();
        assert_eq!(detail.month, 6);
        assert_eq!(detail.records.len(), 1);
        assert!((detail.records[0].work_hours() - 8.75).abs() < 1e-9);
    }
}
