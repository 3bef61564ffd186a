//! Statistics DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper around the filtered department stats payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentStatsResponse {
    pub departments: Vec<DepartmentStat>,
}

/// Aggregated attendance figures for one department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentStat {
    pub department: i32,
    pub department_name: Option<String>,
    pub user_count: i64,
    pub total_attendance_days: i64,
    pub avg_work_hours: f64,
    pub users: Vec<UserAttendanceStat>,
}

/// Per-user roll-up within a department table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAttendanceStat {
    pub user_id: String,
    pub user_name: Option<String>,
    pub total_days: i64,
    pub total_hours: f64,
    pub last_checkin: Option<DateTime<Utc>>,
}

impl UserAttendanceStat {
    /// Display name falls back to the user id when no name is recorded.
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or(&self.user_id)
    }
}

/// One user's attendance for a single month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailResponse {
    pub user_id: String,
    pub user_name: Option<String>,
    pub month: u32,
    pub year: i32,
    pub total_days: i64,
    pub total_hours: f64,
    pub records: Vec<UserDetailRecord>,
}

/// One day of attendance within a month detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailRecord {
    pub date: NaiveDate,
    pub first_checkin: Option<DateTime<Utc>>,
    pub last_checkout: Option<DateTime<Utc>>,
    pub total_work_minutes: Option<i32>,
    pub total_sessions: Option<i32>,
    pub is_late: bool,
    pub is_early_leave: bool,
}

impl UserDetailRecord {
    /// Work hours derived from the recorded minutes.
    pub fn work_hours(&self) -> f64 {
        self.total_work_minutes.unwrap_or(0) as f64 / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let mut row = UserAttendanceStat {
            user_id: "u17".to_string(),
            user_name: None,
            total_days: 3,
            total_hours: 21.5,
            last_checkin: None,
        };
        assert_eq!(row.display_name(), "u17");

        row.user_name = Some("Alice".to_string());
        assert_eq!(row.display_name(), "Alice");
    }

    #[test]
    fn test_work_hours_from_minutes() {
        let record = UserDetailRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            first_checkin: None,
            last_checkout: None,
            total_work_minutes: Some(150),
            total_sessions: Some(2),
            is_late: false,
            is_early_leave: false,
        };
        assert!((record.work_hours() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_minutes_count_as_zero() {
        let record = UserDetailRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            first_checkin: None,
            last_checkout: None,
            total_work_minutes: None,
            total_sessions: None,
            is_late: true,
            is_early_leave: true,
        };
        assert_eq!(record.work_hours(), 0.0);
    }
}
