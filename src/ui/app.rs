//! Main application UI state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout};
use tokio::sync::mpsc;

use crate::client::ApiClient;
use crate::config::{AdminRole, AppConfig};
use crate::error::AppError;
use crate::models::admin_user::{
    AdminUserResponse, CreateAdminUserRequest, ResetPasswordRequest, UpdateAdminUserRequest,
};
use crate::models::checkin::{Checkin, CheckinFilter, CreateCheckinRequest, UpdateCheckinRequest};
use crate::models::point::{CreatePointRequest, GeofencePoint, PointKind, UpdatePointRequest};
use crate::models::stats::DepartmentStat;
use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserInfo};
use crate::stats::{self, DetailContent, DetailRequest, DetailPeriod, DetailState, StatsViewModel};

use super::components::colors;
use super::{
    admin_users_panel, checkins_panel, dashboard, points_panel, stats_panel, users_panel,
};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    Users,
    CheckinPoints,
    CheckoutPoints,
    Checkins,
    Statistics,
    AdminUsers,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::Users => "Users",
            Panel::CheckinPoints => "Checkin Points",
            Panel::CheckoutPoints => "Checkout Points",
            Panel::Checkins => "Attendance Records",
            Panel::Statistics => "Statistics",
            Panel::AdminUsers => "Admin Accounts",
        }
    }
}

/// Which cached list an operation should refresh after completion.
#[derive(Debug, Clone, Copy)]
pub enum Reload {
    Users,
    Points(PointKind),
    Checkins,
    AdminUsers,
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Data loading
    UsersLoaded(Vec<UserInfo>),
    PointsLoaded(PointKind, Vec<GeofencePoint>),
    CheckinsLoaded(Vec<Checkin>),
    AdminUsersLoaded(Vec<AdminUserResponse>),
    LoadError(AppError),

    // Statistics (sequence-tagged; the view model drops stale responses)
    StatsLoaded {
        seq: u64,
        result: crate::error::Result<Vec<DepartmentStat>>,
    },
    DetailLoaded {
        seq: u64,
        result: crate::error::Result<DetailContent>,
    },

    // CRUD operations
    OperationCompleted(Reload, String),
    OperationFailed(AppError),
}

/// Form state for user CRUD.
#[derive(Default, Clone)]
pub struct UserForm {
    pub id: Option<i32>,
    pub user_id: String,
    pub user_name: String,
    pub department: String,
    pub department_name: String,
    pub passkey: String,
    pub is_open: bool,
    pub is_editing: bool,
}

impl UserForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Create a form pre-filled for editing an existing user.
    pub fn edit(user: &UserInfo) -> Self {
        Self {
            id: Some(user.id),
            user_id: user.user_id.clone(),
            user_name: user.user_name.clone().unwrap_or_default(),
            department: user.department.to_string(),
            department_name: user.department_name.clone().unwrap_or_default(),
            passkey: user.passkey.clone(),
            is_open: true,
            is_editing: true,
        }
    }
}

/// Form state for geofence point CRUD.
#[derive(Default, Clone)]
pub struct PointForm {
    pub id: Option<i32>,
    pub latitude: String,
    pub longitude: String,
    pub radius: String,
    pub location_name: String,
    /// Comma-separated department codes.
    pub allowed_departments: String,
    pub is_open: bool,
    pub is_editing: bool,
}

impl PointForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Create a form pre-filled for editing an existing point.
    pub fn edit(point: &GeofencePoint) -> Self {
        Self {
            id: Some(point.id),
            latitude: point.latitude.to_string(),
            longitude: point.longitude.to_string(),
            radius: point.radius.to_string(),
            location_name: point.location_name.clone(),
            allowed_departments: point
                .allowed_department
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            is_open: true,
            is_editing: true,
        }
    }
}

/// Form state for checkin record CRUD.
#[derive(Default, Clone)]
pub struct CheckinForm {
    pub id: Option<i32>,
    pub user_id: String,
    pub action: String,
    /// Local time, "YYYY-MM-DD HH:MM:SS".
    pub timestamp_input: String,
    pub latitude: String,
    pub longitude: String,
    pub is_synced: bool,
    pub is_open: bool,
    pub is_editing: bool,
}

impl CheckinForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Create a form pre-filled for editing an existing checkin.
    pub fn edit(checkin: &Checkin) -> Self {
        Self {
            id: Some(checkin.id),
            user_id: checkin.user_id.clone(),
            action: checkin.action.clone(),
            timestamp_input: checkin
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            latitude: checkin.latitude.map(|v| v.to_string()).unwrap_or_default(),
            longitude: checkin.longitude.map(|v| v.to_string()).unwrap_or_default(),
            is_synced: checkin.is_synced != 0,
            is_open: true,
            is_editing: true,
        }
    }
}

/// Form state for admin account CRUD.
#[derive(Default, Clone)]
pub struct AdminUserForm {
    pub id: Option<i32>,
    pub username: String,
    pub password: String,
    pub role: String,
    pub department: String,
    pub is_open: bool,
    pub is_editing: bool,
}

impl AdminUserForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Create a form pre-filled for editing an existing admin account.
    pub fn edit(admin: &AdminUserResponse) -> Self {
        Self {
            id: Some(admin.id),
            username: admin.username.clone(),
            password: String::new(),
            role: admin.role.clone(),
            department: admin.department.map(|d| d.to_string()).unwrap_or_default(),
            is_open: true,
            is_editing: true,
        }
    }
}

/// Form state for the admin password reset dialog.
#[derive(Default, Clone)]
pub struct ResetPasswordForm {
    pub id: Option<i32>,
    pub username: String,
    pub new_password: String,
    pub is_open: bool,
}

/// Filter inputs for the attendance records listing.
#[derive(Default, Clone)]
pub struct CheckinFilterInput {
    pub user_id: String,
    pub action: String,
    pub limit: String,
}

impl CheckinFilterInput {
    /// Assemble the server-side filter; blank fields are unset.
    pub fn to_filter(&self) -> CheckinFilter {
        CheckinFilter {
            user_id: match self.user_id.trim() {
                "" => None,
                id => Some(id.to_string()),
            },
            action: match self.action.trim() {
                "" => None,
                action => Some(action.to_string()),
            },
            limit: self.limit.trim().parse().ok(),
        }
    }
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Target for delete confirmation dialog.
#[derive(Clone)]
pub enum DeleteTarget {
    User(i32, String),
    Point(PointKind, i32, String),
    Checkin(i32, String),
    AdminUser(i32, String),
}

/// Main application state.
pub struct App {
    // Runtime and backend client
    pub rt: tokio::runtime::Runtime,
    client: Arc<ApiClient>,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub current_panel: Panel,

    // Cached data
    pub users: Vec<UserInfo>,
    pub checkin_points: Vec<GeofencePoint>,
    pub checkout_points: Vec<GeofencePoint>,
    pub checkins: Vec<Checkin>,
    pub admin_users: Vec<AdminUserResponse>,

    // Statistics view model (recreated on each view entry)
    pub stats: StatsViewModel,
    /// Role-gated at view entry: department users never see this field.
    pub stats_department_filter_enabled: bool,
    pub stats_department_input: String,

    // Forms
    pub user_form: UserForm,
    pub point_form: PointForm,
    pub checkin_form: CheckinForm,
    pub admin_user_form: AdminUserForm,
    pub reset_password_form: ResetPasswordForm,

    // Search/filter state
    pub user_search: String,
    pub checkin_filter_input: CheckinFilterInput,

    // Loading state
    pub is_loading: bool,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Dialogs
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    // Settings dialog
    pub settings_dialog_open: bool,
    pub settings_url_input: String,
    pub settings_token_input: String,

    // Session
    pub session_expired: bool,

    // Configuration
    pub config: AppConfig,
    config_path: PathBuf,
}

impl App {
    pub fn new(
        client: ApiClient,
        config: AppConfig,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let settings_url_input = config.server.url.clone();
        let settings_token_input = config.session.token.clone();

        let mut app = Self {
            rt,
            client: Arc::new(client),
            tx,
            rx,
            current_panel: Panel::default(),
            users: Vec::new(),
            checkin_points: Vec::new(),
            checkout_points: Vec::new(),
            checkins: Vec::new(),
            admin_users: Vec::new(),
            stats: StatsViewModel::new(),
            stats_department_filter_enabled: false,
            stats_department_input: String::new(),
            user_form: UserForm::default(),
            point_form: PointForm::default(),
            checkin_form: CheckinForm::default(),
            admin_user_form: AdminUserForm::default(),
            reset_password_form: ResetPasswordForm::default(),
            user_search: String::new(),
            checkin_filter_input: CheckinFilterInput::default(),
            is_loading: false,
            log_messages: Vec::new(),
            show_delete_confirm: false,
            delete_target: None,
            error_message: None,
            success_message: None,
            settings_dialog_open: false,
            settings_url_input,
            settings_token_input,
            session_expired: false,
            config,
            config_path,
        };

        // Load initial data
        app.load_users();

        app
    }

    /// Admin role stored with the session.
    pub fn role(&self) -> AdminRole {
        self.config.session.role
    }

    /// Read-only access to a point list by kind.
    pub fn points(&self, kind: PointKind) -> &[GeofencePoint] {
        match kind {
            PointKind::Checkin => &self.checkin_points,
            PointKind::Checkout => &self.checkout_points,
        }
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    /// Log an info message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Log a success message.
    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Log an error message.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    // --- Navigation ---

    /// Enter a panel, (re)loading what it displays.
    pub fn open_panel(&mut self, panel: Panel) {
        self.current_panel = panel;
        match panel {
            Panel::Dashboard => {}
            Panel::Users => self.load_users(),
            Panel::CheckinPoints => self.load_points(PointKind::Checkin),
            Panel::CheckoutPoints => self.load_points(PointKind::Checkout),
            Panel::Checkins => self.load_checkins(),
            Panel::Statistics => self.open_stats_view(),
            Panel::AdminUsers => self.load_admin_users(),
        }
    }

    /// Enter the statistics view with a fresh view model.
    ///
    /// The role flag is read once here; it gates the department filter for
    /// the lifetime of this view instance.
    fn open_stats_view(&mut self) {
        self.stats = StatsViewModel::new();
        self.stats_department_filter_enabled = self.role() == AdminRole::Admin;
        self.stats_department_input.clear();
        self.fetch_stats();
    }

    // --- Data loading ---

    /// Load users from the backend.
    pub fn load_users(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.is_loading = true;

        self.rt.spawn(async move {
            match client.list_users().await {
                Ok(users) => {
                    let _ = tx.send(UiMessage::UsersLoaded(users));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(e));
                }
            }
        });
    }

    /// Load geofence points of one kind from the backend.
    pub fn load_points(&mut self, kind: PointKind) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.is_loading = true;

        self.rt.spawn(async move {
            match client.list_points(kind).await {
                Ok(points) => {
                    let _ = tx.send(UiMessage::PointsLoaded(kind, points));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(e));
                }
            }
        });
    }

    /// Load checkin records using the current filter inputs.
    pub fn load_checkins(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let mut filter = self.checkin_filter_input.to_filter();
        if filter.limit.is_none() {
            filter.limit = Some(self.config.ui.checkin_limit);
        }
        self.is_loading = true;

        self.rt.spawn(async move {
            match client.list_checkins(&filter).await {
                Ok(checkins) => {
                    let _ = tx.send(UiMessage::CheckinsLoaded(checkins));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(e));
                }
            }
        });
    }

    /// Load admin accounts from the backend.
    pub fn load_admin_users(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.is_loading = true;

        self.rt.spawn(async move {
            match client.list_admin_users().await {
                Ok(admins) => {
                    let _ = tx.send(UiMessage::AdminUsersLoaded(admins));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(e));
                }
            }
        });
    }

    // --- Statistics ---

    /// Issue a filtered stats fetch for the current filter selection.
    ///
    /// Validation failures surface in the view model without any request.
    pub fn fetch_stats(&mut self) {
        let Some((query, seq)) = self.stats.begin_stats_fetch() else {
            return;
        };

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = stats::fetch_filtered_stats(client.as_ref(), &query).await;
            let _ = tx.send(UiMessage::StatsLoaded { seq, result });
        });
    }

    /// Issue a detail fetch produced by the view model.
    pub fn fetch_detail(&mut self, request: DetailRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = match request.period {
                DetailPeriod::Month { month, year } => {
                    stats::fetch_month_detail(client.as_ref(), &request.user_id, month, year)
                        .await
                        .map(DetailContent::Month)
                }
                DetailPeriod::Year { year } => {
                    stats::fetch_year_detail(client.as_ref(), &request.user_id, year)
                        .await
                        .map(DetailContent::Year)
                }
            };
            let _ = tx.send(UiMessage::DetailLoaded { seq: request.seq, result });
        });
    }

    // --- CRUD operations ---

    /// Create a new user.
    pub fn create_user(&mut self, data: CreateUserRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.create_user(&data).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::Users,
                        format!("User '{}' created", data.user_id),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Update an existing user.
    pub fn update_user(&mut self, id: i32, data: UpdateUserRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.update_user(id, &data).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::Users,
                        format!("User '{}' saved", data.user_id),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Delete a user.
    pub fn delete_user(&mut self, id: i32) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.delete_user(id).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::Users,
                        "User deleted".to_string(),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Create a new geofence point.
    pub fn create_point(&mut self, kind: PointKind, data: CreatePointRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.create_point(kind, &data).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::Points(kind),
                        format!("Point '{}' created", data.location_name),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Update an existing geofence point.
    pub fn update_point(&mut self, kind: PointKind, id: i32, data: UpdatePointRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.update_point(kind, id, &data).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::Points(kind),
                        format!("Point '{}' saved", data.location_name),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Delete a geofence point.
    pub fn delete_point(&mut self, kind: PointKind, id: i32) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.delete_point(kind, id).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::Points(kind),
                        "Point deleted".to_string(),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Create a new checkin record.
    pub fn create_checkin(&mut self, data: CreateCheckinRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.create_checkin(&data).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::Checkins,
                        "Checkin created".to_string(),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Update an existing checkin record.
    pub fn update_checkin(&mut self, id: i32, data: UpdateCheckinRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.update_checkin(id, &data).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::Checkins,
                        "Checkin saved".to_string(),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Delete a checkin record.
    pub fn delete_checkin(&mut self, id: i32) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.delete_checkin(id).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::Checkins,
                        "Checkin deleted".to_string(),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Create a new admin account.
    pub fn create_admin_user(&mut self, data: CreateAdminUserRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.create_admin_user(&data).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::AdminUsers,
                        format!("Admin '{}' created", data.username),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Update an existing admin account.
    pub fn update_admin_user(&mut self, id: i32, data: UpdateAdminUserRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.update_admin_user(id, &data).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::AdminUsers,
                        format!("Admin '{}' saved", data.username),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Delete an admin account.
    pub fn delete_admin_user(&mut self, id: i32) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.delete_admin_user(id).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::AdminUsers,
                        "Admin account deleted".to_string(),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    /// Reset an admin account password.
    pub fn reset_admin_password(&mut self, id: i32, data: ResetPasswordRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match client.reset_admin_password(id, &data).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::OperationCompleted(
                        Reload::AdminUsers,
                        "Password reset".to_string(),
                    ));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e));
                }
            }
        });
    }

    // --- Session handling ---

    /// Handle the gateway's unauthorized signal: stop all view work and
    /// hand control back to the operator for a new token.
    fn expire_session(&mut self) {
        if self.session_expired {
            return;
        }
        self.session_expired = true;
        self.config.session.token.clear();
        if let Err(e) = self.config.save(&self.config_path) {
            tracing::error!("Failed to save config: {}", e);
        }
        self.log_error("Admin session expired");
    }

    fn handle_error(&mut self, e: AppError) {
        if e.is_session_expired() {
            self.expire_session();
        } else {
            self.error_message = Some(e.to_string());
            self.log_error(e.to_string());
        }
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::UsersLoaded(users) => {
                    self.users = users;
                    self.is_loading = false;
                }
                UiMessage::PointsLoaded(kind, points) => {
                    match kind {
                        PointKind::Checkin => self.checkin_points = points,
                        PointKind::Checkout => self.checkout_points = points,
                    }
                    self.is_loading = false;
                }
                UiMessage::CheckinsLoaded(checkins) => {
                    self.checkins = checkins;
                    self.is_loading = false;
                }
                UiMessage::AdminUsersLoaded(admins) => {
                    self.admin_users = admins;
                    self.is_loading = false;
                }
                UiMessage::LoadError(e) => {
                    self.is_loading = false;
                    self.handle_error(e);
                }
                UiMessage::StatsLoaded { seq, result } => {
                    self.stats.apply_stats(seq, result);
                    if self.stats.session_expired {
                        self.expire_session();
                    }
                }
                UiMessage::DetailLoaded { seq, result } => {
                    self.stats.apply_detail(seq, result);
                    if self.stats.session_expired {
                        self.expire_session();
                    }
                }
                UiMessage::OperationCompleted(reload, message) => {
                    self.success_message = Some(message.clone());
                    self.log_success(message);
                    match reload {
                        Reload::Users => {
                            self.user_form.reset();
                            self.load_users();
                        }
                        Reload::Points(kind) => {
                            self.point_form.reset();
                            self.load_points(kind);
                        }
                        Reload::Checkins => {
                            self.checkin_form.reset();
                            self.load_checkins();
                        }
                        Reload::AdminUsers => {
                            self.admin_user_form.reset();
                            self.reset_password_form = ResetPasswordForm::default();
                            self.load_admin_users();
                        }
                    }
                }
                UiMessage::OperationFailed(e) => {
                    self.handle_error(e);
                }
            }
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("Settings", |ui| {
                    if ui.button("Server & Session").clicked() {
                        self.settings_dialog_open = true;
                        self.settings_url_input = self.config.server.url.clone();
                        self.settings_token_input = self.config.session.token.clone();
                        ui.close();
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    let (color, text) = if self.session_expired {
                        (colors::ERROR, "Session expired")
                    } else {
                        (colors::SUCCESS, "Connected")
                    };
                    ui.colored_label(color, format!("Server: {} ({})", self.config.server.url, text));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let role = match self.role() {
                            AdminRole::Admin => "admin".to_string(),
                            AdminRole::Department => format!(
                                "department {}",
                                self.config.session.department.unwrap_or(0)
                            ),
                        };
                        ui.label(format!("Role: {role}"));
                        if self.is_loading {
                            ui.spinner();
                        }
                    });
                });
            });
    }

    /// Render the settings dialog.
    fn show_settings_dialog(&mut self, ctx: &egui::Context) {
        if !self.settings_dialog_open {
            return;
        }

        let mut open = true;
        let mut save_clicked = false;
        egui::Window::new("Server & Session")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_space(10.0);

                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([20.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Server URL:");
                        ui.add(egui::TextEdit::singleline(&mut self.settings_url_input).desired_width(280.0));
                        ui.end_row();

                        ui.label("Bearer token:");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.settings_token_input)
                                .desired_width(280.0)
                                .password(true),
                        );
                        ui.end_row();
                    });

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.settings_dialog_open = false;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Save").clicked() {
                            save_clicked = true;
                        }
                    });
                });
            });

        if save_clicked {
            self.save_settings();
            self.settings_dialog_open = false;
        }
        if !open {
            self.settings_dialog_open = false;
        }
    }

    /// Apply and persist the settings dialog, rebuilding the API client.
    fn save_settings(&mut self) {
        self.config.server.url = self.settings_url_input.trim().to_string();
        self.config.session.token = self.settings_token_input.trim().to_string();

        if let Err(e) = self.config.validate() {
            self.error_message = Some(e.to_string());
            return;
        }
        if let Err(e) = self.config.save(&self.config_path) {
            tracing::error!("Failed to save config: {}", e);
            self.error_message = Some(e.to_string());
            return;
        }

        match ApiClient::new(
            &self.config.server.url,
            &self.config.session.token,
            self.config.server.timeout_secs,
        ) {
            Ok(client) => {
                self.client = Arc::new(client);
                if !self.config.session.token.is_empty() {
                    self.session_expired = false;
                }
                self.log_success("Settings saved");
            }
            Err(e) => self.handle_error(e),
        }
    }

    /// Render modal dialogs (error, success, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Delete confirmation dialog
        if self.show_delete_confirm
            && let Some(ref target) = self.delete_target.clone()
        {
            let (title, message) = match target {
                DeleteTarget::User(_, name) => ("Delete User", format!("Delete user '{}'?", name)),
                DeleteTarget::Point(kind, _, name) => match kind {
                    PointKind::Checkin => ("Delete Point", format!("Delete checkin point '{}'?", name)),
                    PointKind::Checkout => ("Delete Point", format!("Delete checkout point '{}'?", name)),
                },
                DeleteTarget::Checkin(_, desc) => ("Delete Checkin", format!("Delete checkin {}?", desc)),
                DeleteTarget::AdminUser(_, name) => ("Delete Admin", format!("Delete admin account '{}'?", name)),
            };

            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                        if ui.button("Delete").clicked() {
                            self.confirm_delete();
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                    });
                });
        }
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        if let Some(target) = self.delete_target.take() {
            match target {
                DeleteTarget::User(id, name) => {
                    self.log_info(format!("Deleting user: {}", name));
                    self.delete_user(id);
                }
                DeleteTarget::Point(kind, id, name) => {
                    self.log_info(format!("Deleting point: {}", name));
                    self.delete_point(kind, id);
                }
                DeleteTarget::Checkin(id, _) => {
                    self.log_info(format!("Deleting checkin {id}"));
                    self.delete_checkin(id);
                }
                DeleteTarget::AdminUser(id, name) => {
                    self.log_info(format!("Deleting admin account: {}", name));
                    self.delete_admin_user(id);
                }
            }
        }
    }

    /// Request a delete, respecting the confirm-deletes preference.
    pub fn request_delete(&mut self, target: DeleteTarget) {
        if self.config.ui.confirm_deletes {
            self.delete_target = Some(target);
            self.show_delete_confirm = true;
        } else {
            self.delete_target = Some(target);
            self.confirm_delete();
        }
    }

    /// Render the blocking session-expired notice.
    fn show_session_expired(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading("Session expired");
                ui.add_space(10.0);
                ui.label("The backend rejected the stored admin token.");
                ui.label("Obtain a fresh token and enter it in Settings.");
                ui.add_space(20.0);
                if ui.button("Open Settings").clicked() {
                    self.settings_dialog_open = true;
                    self.settings_url_input = self.config.server.url.clone();
                    self.settings_token_input.clear();
                }
            });
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Debounced search fetch for the statistics view
        if self.current_panel == Panel::Statistics
            && !self.session_expired
            && self.stats.debounce_fire(Instant::now())
        {
            self.fetch_stats();
        }

        // Request repaint during async operations
        if self.is_loading
            || self.stats.loading
            || self.stats.debounce_armed()
            || matches!(self.stats.detail, DetailState::Loading { .. })
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // Menu bar
        self.show_menu_bar(ctx);

        // Status bar
        self.show_status_bar(ctx);

        // Settings dialog
        self.show_settings_dialog(ctx);

        // Modal dialogs (error, success, delete confirmation)
        self.show_dialogs(ctx);

        if self.session_expired {
            self.show_session_expired(ctx);
            return;
        }

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| match self.current_panel {
            Panel::Dashboard => {
                if let Some(next) = dashboard::show(self, ui) {
                    self.open_panel(next);
                }
            }
            Panel::Users => {
                if users_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::CheckinPoints => {
                if points_panel::show(self, ui, PointKind::Checkin) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::CheckoutPoints => {
                if points_panel::show(self, ui, PointKind::Checkout) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Checkins => {
                if checkins_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Statistics => {
                if stats_panel::show(self, ui) {
                    // Discard the view instance on navigation away.
                    self.stats = StatsViewModel::new();
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::AdminUsers => {
                if admin_users_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
        });
    }
}
