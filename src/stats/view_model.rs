//! Statistics view model.
//!
//! Owns filter, sort, and detail-selection state for the statistics view
//! and merges gateway responses into a renderable shape. The rendering
//! layer and the HTTP transport are external collaborators: the view model
//! never constructs markup and talks to the backend only through the
//! [`StatsGateway`] seam.
//!
//! Concurrency model: all mutation happens on the single UI thread. Network
//! calls run elsewhere and come back as `apply_*` calls tagged with the
//! request sequence number they were issued under; responses whose sequence
//! number is no longer current are discarded, so only the latest issued
//! query ever reaches displayed state. In-flight requests are never
//! cancelled, merely superseded.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::{AppError, Result};
use crate::models::stats::{DepartmentStat, UserAttendanceStat, UserDetailResponse};

use super::filter::{FilterState, StatsQuery, ViewType};
use super::sort::{SortColumn, SortState, sort_rows};

/// Idle window after the last search edit before a fetch is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Request/response boundary to the statistics backend.
pub trait StatsGateway {
    /// Fetch department summaries matching `query`.
    fn filtered_department_stats(
        &self,
        query: &StatsQuery,
    ) -> impl Future<Output = Result<Vec<DepartmentStat>>> + Send;

    /// Fetch one user's attendance detail for a single month.
    fn user_month_detail(
        &self,
        user_id: &str,
        month: u32,
        year: i32,
    ) -> impl Future<Output = Result<UserDetailResponse>> + Send;
}

/// One month's totals within a yearly aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBreakdown {
    pub month: u32,
    pub total_days: i64,
    pub total_hours: f64,
}

/// Client-side roll-up of one user's year, built from per-month fetches.
///
/// Months whose fetch failed are skipped, not zero-filled; zero successful
/// months is a valid "no records" outcome with empty `months` and zero
/// totals, never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyAggregate {
    pub user_id: String,
    pub year: i32,
    pub total_days: i64,
    pub total_hours: f64,
    pub months: Vec<MonthBreakdown>,
}

/// Fetch department summaries for a derived query.
///
/// Gateway failures propagate unretried; an empty result set is not an
/// error and callers render it as "no statistics available".
pub async fn fetch_filtered_stats<G: StatsGateway>(
    gateway: &G,
    query: &StatsQuery,
) -> Result<Vec<DepartmentStat>> {
    gateway.filtered_department_stats(query).await
}

/// Fetch one user's detail for a single month.
pub async fn fetch_month_detail<G: StatsGateway>(
    gateway: &G,
    user_id: &str,
    month: u32,
    year: i32,
) -> Result<UserDetailResponse> {
    gateway.user_month_detail(user_id, month, year).await
}

/// Build a user's yearly aggregate from twelve independent month fetches.
///
/// A failed month is logged and omitted from both the breakdown and the
/// totals. The breakdown is always in chronological month order. The one
/// exception is [`AppError::SessionExpired`], which aborts the remaining
/// months immediately and propagates.
pub async fn fetch_year_detail<G: StatsGateway>(
    gateway: &G,
    user_id: &str,
    year: i32,
) -> Result<YearlyAggregate> {
    let mut aggregate = YearlyAggregate {
        user_id: user_id.to_string(),
        year,
        total_days: 0,
        total_hours: 0.0,
        months: Vec::new(),
    };

    for month in 1..=12 {
        match gateway.user_month_detail(user_id, month, year).await {
            Ok(detail) => {
                aggregate.total_days += detail.total_days;
                aggregate.total_hours += detail.total_hours;
                aggregate.months.push(MonthBreakdown {
                    month,
                    total_days: detail.total_days,
                    total_hours: detail.total_hours,
                });
            }
            Err(AppError::SessionExpired) => return Err(AppError::SessionExpired),
            Err(e) => {
                tracing::warn!(user_id, month, year, error = %e, "skipping month in yearly aggregate");
            }
        }
    }

    Ok(aggregate)
}

/// Content of a shown detail modal.
#[derive(Debug, Clone)]
pub enum DetailContent {
    Month(UserDetailResponse),
    Year(YearlyAggregate),
}

/// Which period a detail request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPeriod {
    Month { month: u32, year: i32 },
    Year { year: i32 },
}

/// A detail fetch the caller should issue against the gateway.
#[derive(Debug, Clone)]
pub struct DetailRequest {
    pub user_id: String,
    pub user_name: String,
    pub period: DetailPeriod,
    pub seq: u64,
}

/// Detail modal lifecycle: Closed -> Loading -> Shown, with the
/// authentication-expired case dropping back to Closed.
#[derive(Debug, Clone, Default)]
pub enum DetailState {
    #[default]
    Closed,
    Loading {
        user_name: String,
        seq: u64,
    },
    Shown {
        user_name: String,
        content: DetailContent,
    },
}

/// View-model state for the statistics view.
///
/// Constructed per dashboard session and discarded on navigation away;
/// never a process-wide singleton.
pub struct StatsViewModel {
    pub filter: FilterState,
    /// Last applied result set, grouped per department.
    pub departments: Vec<DepartmentStat>,
    /// True once any stats response has been applied (empty != not loaded).
    pub loaded: bool,
    pub loading: bool,
    /// Inline error for the results region; cleared by the next success.
    pub error: Option<String>,
    /// Error from a failed detail fetch, surfaced as a dismissable message.
    pub detail_error: Option<String>,
    /// Set when the gateway reported an expired session; the view must stop
    /// issuing work and hand control to the auth layer.
    pub session_expired: bool,
    pub detail: DetailState,
    sort: HashMap<i32, SortState>,
    next_seq: u64,
    stats_seq: u64,
    debounce_deadline: Option<Instant>,
}

impl StatsViewModel {
    pub fn new() -> Self {
        Self {
            filter: FilterState::default(),
            departments: Vec::new(),
            loaded: false,
            loading: false,
            error: None,
            detail_error: None,
            session_expired: false,
            detail: DetailState::Closed,
            sort: HashMap::new(),
            next_seq: 0,
            stats_seq: 0,
            debounce_deadline: None,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Derive the query and mark a new stats request as current.
    ///
    /// Validation failures never reach the gateway: they surface as the
    /// inline error and `None` is returned.
    pub fn begin_stats_fetch(&mut self) -> Option<(StatsQuery, u64)> {
        if self.session_expired {
            return None;
        }

        match self.filter.derive_query() {
            Ok(query) => {
                let seq = self.next_seq();
                self.stats_seq = seq;
                self.loading = true;
                self.debounce_deadline = None;
                Some((query, seq))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Apply a stats response issued under `seq`.
    ///
    /// Returns false when the response is stale (a newer query has been
    /// issued since) and displayed state was left untouched.
    pub fn apply_stats(&mut self, seq: u64, result: Result<Vec<DepartmentStat>>) -> bool {
        if seq != self.stats_seq {
            tracing::debug!(seq, current = self.stats_seq, "discarding stale stats response");
            return false;
        }
        self.loading = false;

        match result {
            Ok(departments) => {
                self.departments = departments;
                self.loaded = true;
                // A new result set always starts unsorted.
                self.sort.clear();
                self.error = None;
            }
            Err(AppError::SessionExpired) => {
                self.session_expired = true;
                self.detail = DetailState::Closed;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Sort state of one department's table.
    pub fn sort_state(&self, department: i32) -> SortState {
        self.sort.get(&department).copied().unwrap_or_default()
    }

    /// Handle a sort-header click on one department's table.
    ///
    /// Purely reorders in-memory rows; never triggers a fetch.
    pub fn toggle_sort(&mut self, department: i32, column: SortColumn) {
        let current = self.sort_state(department);
        if let Some(dept) = self.departments.iter_mut().find(|d| d.department == department) {
            let (rows, state) = sort_rows(&dept.users, column, &current);
            dept.users = rows;
            self.sort.insert(department, state);
        }
    }

    /// Handle a "Details" action on a user row: Closed -> Loading.
    ///
    /// Returns the fetch the caller must issue, covering the period of the
    /// current filter selection. Ignored while another detail is loading.
    pub fn open_detail(&mut self, row: &UserAttendanceStat) -> Option<DetailRequest> {
        if self.session_expired || matches!(self.detail, DetailState::Loading { .. }) {
            return None;
        }

        let period = match self.filter.view_type {
            ViewType::Month => DetailPeriod::Month {
                month: self.filter.month,
                year: self.filter.year,
            },
            ViewType::Year => DetailPeriod::Year { year: self.filter.year },
        };

        let seq = self.next_seq();
        let user_name = row.display_name().to_string();
        self.detail = DetailState::Loading {
            user_name: user_name.clone(),
            seq,
        };
        Some(DetailRequest {
            user_id: row.user_id.clone(),
            user_name,
            period,
            seq,
        })
    }

    /// Drill down from a shown yearly breakdown into one month's records.
    pub fn drill_down_month(&mut self, month: u32) -> Option<DetailRequest> {
        let DetailState::Shown {
            user_name,
            content: DetailContent::Year(aggregate),
        } = &self.detail
        else {
            return None;
        };

        let user_id = aggregate.user_id.clone();
        let user_name = user_name.clone();
        let year = aggregate.year;
        let seq = self.next_seq();
        let request = DetailRequest {
            user_id,
            user_name,
            period: DetailPeriod::Month { month, year },
            seq,
        };
        self.detail = DetailState::Loading {
            user_name: request.user_name.clone(),
            seq,
        };
        Some(request)
    }

    /// Apply a detail response issued under `seq`.
    ///
    /// Stale responses (the modal was dismissed or superseded) are dropped.
    /// Partial yearly failure arrives here as Ok content with fewer months;
    /// only an expired session fails the modal, dropping it back to Closed.
    pub fn apply_detail(&mut self, seq: u64, result: Result<DetailContent>) -> bool {
        let DetailState::Loading { user_name, seq: current } = &self.detail else {
            return false;
        };
        if *current != seq {
            tracing::debug!(seq, current, "discarding stale detail response");
            return false;
        }
        let user_name = user_name.clone();

        match result {
            Ok(content) => {
                self.detail = DetailState::Shown { user_name, content };
            }
            Err(AppError::SessionExpired) => {
                self.session_expired = true;
                self.detail = DetailState::Closed;
            }
            Err(e) => {
                self.detail_error = Some(e.to_string());
                self.detail = DetailState::Closed;
            }
        }
        true
    }

    /// Explicit dismiss action: Shown (or Loading) -> Closed.
    pub fn close_detail(&mut self) {
        self.detail = DetailState::Closed;
    }

    /// Record a search-input edit and (re)arm the debounce window.
    pub fn on_search_edit(&mut self, text: impl Into<String>, now: Instant) {
        self.filter.user_name_query = text.into();
        self.arm_search_debounce(now);
    }

    /// (Re)arm the debounce window after the search buffer was edited in
    /// place by the input widget.
    pub fn arm_search_debounce(&mut self, now: Instant) {
        self.debounce_deadline = Some(now + SEARCH_DEBOUNCE);
    }

    /// True while a debounced fetch is pending.
    pub fn debounce_armed(&self) -> bool {
        self.debounce_deadline.is_some()
    }

    /// Poll the debounce window; fires at most once per armed edit burst.
    pub fn debounce_fire(&mut self, now: Instant) -> bool {
        match self.debounce_deadline {
            Some(deadline) if now >= deadline => {
                self.debounce_deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Reset filters to view-entry defaults.
    pub fn reset_filters(&mut self) {
        self.filter.reset();
    }
}

impl Default for StatsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted gateway: per-month outcomes plus a call log.
    #[derive(Default)]
    struct MockGateway {
        failed_months: Vec<u32>,
        expired_from_month: Option<u32>,
        calls: Mutex<Vec<u32>>,
    }

    fn month_detail(month: u32, year: i32) -> UserDetailResponse {
        UserDetailResponse {
            user_id: "u1".to_string(),
            user_name: Some("Alice".to_string()),
            month,
            year,
            total_days: month as i64,
            total_hours: month as f64 * 2.0,
            records: Vec::new(),
        }
    }

    impl StatsGateway for MockGateway {
        async fn filtered_department_stats(&self, _query: &StatsQuery) -> Result<Vec<DepartmentStat>> {
            Ok(Vec::new())
        }

        async fn user_month_detail(&self, _user_id: &str, month: u32, year: i32) -> Result<UserDetailResponse> {
            self.calls.lock().unwrap().push(month);
            if self.expired_from_month.is_some_and(|m| month >= m) {
                return Err(AppError::SessionExpired);
            }
            if self.failed_months.contains(&month) {
                return Err(AppError::gateway(format!("month {month} unavailable")));
            }
            Ok(month_detail(month, year))
        }
    }

    fn dept(department: i32, users: Vec<UserAttendanceStat>) -> DepartmentStat {
        DepartmentStat {
            department,
            department_name: Some(format!("Dept {department}")),
            user_count: users.len() as i64,
            total_attendance_days: 0,
            avg_work_hours: 0.0,
            users,
        }
    }

    fn user(user_id: &str, total_days: i64, total_hours: f64) -> UserAttendanceStat {
        UserAttendanceStat {
            user_id: user_id.to_string(),
            user_name: None,
            total_days,
            total_hours,
            last_checkin: None,
        }
    }

    #[tokio::test]
    async fn test_year_detail_skips_failed_months() {
        let gateway = MockGateway {
            failed_months: vec![3, 7],
            ..Default::default()
        };

        let aggregate = fetch_year_detail(&gateway, "u1", 2024).await.unwrap();

        let months: Vec<u32> = aggregate.months.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![1, 2, 4, 5, 6, 8, 9, 10, 11, 12]);

        let expected_days: i64 = months.iter().map(|&m| m as i64).sum();
        let expected_hours: f64 = months.iter().map(|&m| m as f64 * 2.0).sum();
        assert_eq!(aggregate.total_days, expected_days);
        assert!((aggregate.total_hours - expected_hours).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_year_detail_all_months_failed_is_empty_success() {
        let gateway = MockGateway {
            failed_months: (1..=12).collect(),
            ..Default::default()
        };

        let aggregate = fetch_year_detail(&gateway, "u1", 2024).await.unwrap();
        assert!(aggregate.months.is_empty());
        assert_eq!(aggregate.total_days, 0);
        assert_eq!(aggregate.total_hours, 0.0);
    }

    #[tokio::test]
    async fn test_year_detail_session_expiry_short_circuits() {
        let gateway = MockGateway {
            expired_from_month: Some(2),
            ..Default::default()
        };

        let err = fetch_year_detail(&gateway, "u1", 2024).await.unwrap_err();
        assert!(err.is_session_expired());
        // No further months are requested after the expiry signal.
        assert_eq!(*gateway.calls.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_stale_stats_response_discarded() {
        let mut vm = StatsViewModel::new();

        let (_, first) = vm.begin_stats_fetch().unwrap();
        let (_, second) = vm.begin_stats_fetch().unwrap();
        assert_ne!(first, second);

        assert!(!vm.apply_stats(first, Ok(vec![dept(1, vec![])])));
        assert!(vm.departments.is_empty());
        assert!(vm.loading);

        assert!(vm.apply_stats(second, Ok(vec![dept(2, vec![])])));
        assert_eq!(vm.departments[0].department, 2);
        assert!(!vm.loading);
    }

    #[test]
    fn test_gateway_error_surfaces_message() {
        let mut vm = StatsViewModel::new();
        let (_, seq) = vm.begin_stats_fetch().unwrap();

        assert!(vm.apply_stats(seq, Err(AppError::gateway("db error"))));
        assert!(vm.error.as_deref().unwrap().contains("db error"));
        assert!(!vm.session_expired);
    }

    #[test]
    fn test_invalid_filter_never_issues_a_request() {
        let mut vm = StatsViewModel::new();
        vm.filter.year = 99;

        assert!(vm.begin_stats_fetch().is_none());
        assert!(vm.error.as_deref().unwrap().contains("4-digit"));
        assert!(!vm.loading);
    }

    #[test]
    fn test_session_expiry_stops_further_fetches() {
        let mut vm = StatsViewModel::new();
        let (_, seq) = vm.begin_stats_fetch().unwrap();

        vm.apply_stats(seq, Err(AppError::SessionExpired));
        assert!(vm.session_expired);
        assert!(vm.begin_stats_fetch().is_none());
    }

    #[test]
    fn test_new_result_set_resets_sort() {
        let mut vm = StatsViewModel::new();
        let (_, seq) = vm.begin_stats_fetch().unwrap();
        vm.apply_stats(seq, Ok(vec![dept(1, vec![user("A", 2, 1.0), user("B", 1, 2.0)])]));

        vm.toggle_sort(1, SortColumn::TotalDays);
        assert_eq!(vm.departments[0].users[0].user_id, "B");
        assert!(vm.sort_state(1).active.is_some());

        let (_, seq) = vm.begin_stats_fetch().unwrap();
        vm.apply_stats(seq, Ok(vec![dept(1, vec![user("A", 2, 1.0)])]));
        assert_eq!(vm.sort_state(1), SortState::default());
    }

    #[test]
    fn test_detail_lifecycle_month_view() {
        let mut vm = StatsViewModel::new();
        vm.filter.month = 6;
        vm.filter.year = 2024;

        let request = vm.open_detail(&user("u1", 5, 40.0)).unwrap();
        assert_eq!(request.period, DetailPeriod::Month { month: 6, year: 2024 });
        assert!(matches!(vm.detail, DetailState::Loading { .. }));

        // A second Details click while loading is ignored.
        assert!(vm.open_detail(&user("u2", 1, 2.0)).is_none());

        assert!(vm.apply_detail(request.seq, Ok(DetailContent::Month(month_detail(6, 2024)))));
        assert!(matches!(vm.detail, DetailState::Shown { .. }));

        vm.close_detail();
        assert!(matches!(vm.detail, DetailState::Closed));
    }

    #[test]
    fn test_detail_response_after_dismiss_is_dropped() {
        let mut vm = StatsViewModel::new();
        let request = vm.open_detail(&user("u1", 5, 40.0)).unwrap();

        vm.close_detail();
        assert!(!vm.apply_detail(request.seq, Ok(DetailContent::Month(month_detail(6, 2024)))));
        assert!(matches!(vm.detail, DetailState::Closed));
    }

    #[test]
    fn test_detail_gateway_failure_closes_with_message() {
        let mut vm = StatsViewModel::new();
        let request = vm.open_detail(&user("u1", 5, 40.0)).unwrap();

        assert!(vm.apply_detail(request.seq, Err(AppError::gateway("db error"))));
        assert!(matches!(vm.detail, DetailState::Closed));
        assert!(vm.detail_error.as_deref().unwrap().contains("db error"));
    }

    #[test]
    fn test_detail_session_expiry_closes_and_flags() {
        let mut vm = StatsViewModel::new();
        let request = vm.open_detail(&user("u1", 5, 40.0)).unwrap();

        vm.apply_detail(request.seq, Err(AppError::SessionExpired));
        assert!(matches!(vm.detail, DetailState::Closed));
        assert!(vm.session_expired);
    }

    #[test]
    fn test_year_view_detail_requests_year_period() {
        let mut vm = StatsViewModel::new();
        vm.filter.view_type = ViewType::Year;
        vm.filter.year = 2023;

        let request = vm.open_detail(&user("u1", 5, 40.0)).unwrap();
        assert_eq!(request.period, DetailPeriod::Year { year: 2023 });
    }

    #[test]
    fn test_drill_down_from_yearly_breakdown() {
        let mut vm = StatsViewModel::new();
        vm.filter.view_type = ViewType::Year;
        let request = vm.open_detail(&user("u1", 5, 40.0)).unwrap();

        let aggregate = YearlyAggregate {
            user_id: "u1".to_string(),
            year: 2024,
            total_days: 10,
            total_hours: 80.0,
            months: vec![MonthBreakdown {
                month: 4,
                total_days: 10,
                total_hours: 80.0,
            }],
        };
        vm.apply_detail(request.seq, Ok(DetailContent::Year(aggregate)));

        let drill = vm.drill_down_month(4).unwrap();
        assert_eq!(drill.period, DetailPeriod::Month { month: 4, year: 2024 });
        assert_eq!(drill.user_id, "u1");
        assert!(matches!(vm.detail, DetailState::Loading { .. }));
    }

    #[test]
    fn test_debounce_coalesces_rapid_edits() {
        let mut vm = StatsViewModel::new();
        let t0 = Instant::now();

        vm.on_search_edit("al", t0);
        vm.on_search_edit("ali", t0 + Duration::from_millis(100));

        // Window measured from the last edit.
        assert!(!vm.debounce_fire(t0 + Duration::from_millis(550)));
        assert!(vm.debounce_fire(t0 + Duration::from_millis(700)));
        // Exactly one fetch per idle period.
        assert!(!vm.debounce_fire(t0 + Duration::from_millis(800)));

        assert_eq!(vm.filter.user_name_query, "ali");
    }

    #[test]
    fn test_begin_fetch_disarms_debounce() {
        let mut vm = StatsViewModel::new();
        let t0 = Instant::now();

        vm.on_search_edit("al", t0);
        // An explicit filter apply supersedes the pending debounce.
        vm.begin_stats_fetch().unwrap();
        assert!(!vm.debounce_armed());
    }
}
