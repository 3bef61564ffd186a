//! Statistics filter state and query derivation.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Whether statistics are aggregated per month or per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Month,
    Year,
}

impl ViewType {
    /// Wire value for the `view_type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Month => "month",
            ViewType::Year => "year",
        }
    }
}

/// Full month name, `month` in 1..=12.
pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES.get(month as usize - 1).copied().unwrap_or("?")
}

/// Current filter selection for the statistics view.
///
/// Owned by one active view instance; created with defaults on view entry
/// and discarded on navigation away.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub view_type: ViewType,
    /// Ignored when `view_type` is [`ViewType::Year`].
    pub month: u32,
    pub year: i32,
    /// Trimmed before use; empty means unset.
    pub user_name_query: String,
    pub department: Option<i32>,
}

impl Default for FilterState {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            view_type: ViewType::Month,
            month: today.month(),
            year: today.year(),
            user_name_query: String::new(),
            department: None,
        }
    }
}

/// Derived request parameters for the filtered stats endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsQuery {
    pub view_type: ViewType,
    pub year: i32,
    /// Present only for the monthly view.
    pub month: Option<u32>,
    pub user_name: Option<String>,
    pub department: Option<i32>,
}

impl FilterState {
    /// Restore defaults (current month/year, no search, no department).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Derive the request query, validating before any network call.
    ///
    /// `month` is included only for the monthly view; an empty trimmed
    /// search is omitted entirely.
    pub fn derive_query(&self) -> Result<StatsQuery> {
        if !(1000..=9999).contains(&self.year) {
            return Err(AppError::invalid_filter(format!(
                "year must be a 4-digit number, got {}",
                self.year
            )));
        }

        let month = match self.view_type {
            ViewType::Month => {
                if !(1..=12).contains(&self.month) {
                    return Err(AppError::invalid_filter(format!(
                        "month must be between 1 and 12, got {}",
                        self.month
                    )));
                }
                Some(self.month)
            }
            ViewType::Year => None,
        };

        let user_name = match self.user_name_query.trim() {
            "" => None,
            name => Some(name.to_string()),
        };

        Ok(StatsQuery {
            view_type: self.view_type,
            year: self.year,
            month,
            user_name,
            department: self.department,
        })
    }
}

impl StatsQuery {
    /// Assemble HTTP query parameters, omitting unset fields.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("view_type", self.view_type.as_str().to_string()),
            ("year", self.year.to_string()),
        ];
        if let Some(month) = self.month {
            params.push(("month", month.to_string()));
        }
        if let Some(user_name) = &self.user_name {
            params.push(("user_name", user_name.clone()));
        }
        if let Some(department) = self.department {
            params.push(("department", department.to_string()));
        }
        params
    }

    /// Human-readable period title, e.g. "June 2024" or "Year 2024".
    pub fn period_title(&self) -> String {
        match self.month {
            Some(month) => format!("{} {}", month_name(month), self.year),
            None => format!("Year {}", self.year),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(view_type: ViewType, month: u32, year: i32) -> FilterState {
        FilterState {
            view_type,
            month,
            year,
            user_name_query: String::new(),
            department: None,
        }
    }

    #[test]
    fn test_month_view_includes_month() {
        let query = filter(ViewType::Month, 6, 2024).derive_query().unwrap();
        assert_eq!(query.month, Some(6));
        assert_eq!(query.year, 2024);
        assert_eq!(query.view_type, ViewType::Month);
    }

    #[test]
    fn test_year_view_omits_month() {
        let query = filter(ViewType::Year, 6, 2024).derive_query().unwrap();
        assert_eq!(query.month, None);
        assert!(!query.to_params().iter().any(|(k, _)| *k == "month"));
    }

    #[test]
    fn test_month_zero_rejected() {
        let err = filter(ViewType::Month, 0, 2024).derive_query().unwrap_err();
        assert!(matches!(err, AppError::InvalidFilter(_)));
    }

    #[test]
    fn test_month_thirteen_rejected() {
        let err = filter(ViewType::Month, 13, 2024).derive_query().unwrap_err();
        assert!(matches!(err, AppError::InvalidFilter(_)));
    }

    #[test]
    fn test_out_of_range_month_ignored_for_year_view() {
        // month is absent from the yearly query, so it is not validated
        assert!(filter(ViewType::Year, 0, 2024).derive_query().is_ok());
    }

    #[test]
    fn test_non_four_digit_year_rejected() {
        for year in [999, 10000, 0, -2024] {
            let err = filter(ViewType::Month, 6, year).derive_query().unwrap_err();
            assert!(matches!(err, AppError::InvalidFilter(_)), "year {year}");
        }
    }

    #[test]
    fn test_empty_search_treated_as_unset() {
        let mut state = filter(ViewType::Month, 6, 2024);
        state.user_name_query = "   ".to_string();

        let query = state.derive_query().unwrap();
        assert_eq!(query.user_name, None);
        assert!(!query.to_params().iter().any(|(k, _)| *k == "user_name"));
    }

    #[test]
    fn test_search_trimmed() {
        let mut state = filter(ViewType::Month, 6, 2024);
        state.user_name_query = "  alice ".to_string();
        assert_eq!(state.derive_query().unwrap().user_name.as_deref(), Some("alice"));
    }

    #[test]
    fn test_department_passed_through() {
        let mut state = filter(ViewType::Month, 6, 2024);
        state.department = Some(3);

        let params = state.derive_query().unwrap().to_params();
        assert!(params.contains(&("department", "3".to_string())));
    }

    #[test]
    fn test_defaults_are_current_month() {
        let state = FilterState::default();
        let today = Local::now().date_naive();
        assert_eq!(state.view_type, ViewType::Month);
        assert_eq!(state.month, today.month());
        assert_eq!(state.year, today.year());
        assert!(state.user_name_query.is_empty());
    }

    #[test]
    fn test_period_titles() {
        let monthly = filter(ViewType::Month, 6, 2024).derive_query().unwrap();
        assert_eq!(monthly.period_title(), "June 2024");

        let yearly = filter(ViewType::Year, 6, 2024).derive_query().unwrap();
        assert_eq!(yearly.period_title(), "Year 2024");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
    }
}
