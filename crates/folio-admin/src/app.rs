//! Application state management for the folio admin dashboard.
//!
//! This module contains the core `App` struct: UI state, the loaded
//! certificate page, the session-backed API client, and the channel that
//! background requests report back on.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use folio_core::models::{Certificate, CertificateFilter, CurrentUser};
use folio_core::presentation::{Debouncer, Throttle, Toast};
use folio_core::{AdminClient, ApiError, Config};

use crate::form::{CertificateForm, FormMode};
use crate::showcase::Showcase;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a file path typed into the replace-file prompt.
const MAX_PATH_LENGTH: usize = 1024;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Quiet period after the last filter keystroke before the list reloads.
const FILTER_DEBOUNCE: Duration = Duration::from_millis(400);

/// Minimum spacing between manual reloads.
const RELOAD_INTERVAL: Duration = Duration::from_secs(1);

/// Env vars that prefill the login form
const USERNAME_ENV: &str = "FOLIO_USERNAME";
const PASSWORD_ENV: &str = "FOLIO_PASSWORD";

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Certificates,
    Showcase,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Certificates => "Certificates",
            Tab::Showcase => "Showcase",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Certificates => Tab::Showcase,
            Tab::Showcase => Tab::Certificates,
        }
    }

    pub fn prev(&self) -> Self {
        self.next()
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Filtering,
    EditingForm,
    ReplacingFile,
    ConfirmingDelete,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

/// Which filter input receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Query,
    Issuer,
    Tag,
}

impl FilterField {
    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Query => "Search",
            FilterField::Issuer => "Issuer",
            FilterField::Tag => "Tag",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            FilterField::Query => FilterField::Issuer,
            FilterField::Issuer => FilterField::Tag,
            FilterField::Tag => FilterField::Query,
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned API calls. Calls run independently, so
/// results arrive in completion order.
enum TaskResult {
    /// A page of certificates for the current filter
    Certificates(Vec<Certificate>),
    /// The account behind the current token
    User(CurrentUser),
    Created(Certificate),
    Updated(Certificate),
    FileReplaced(Certificate),
    Deleted(i64),
    /// Any failed call. Expired sessions are already cleared by the client.
    Failed(ApiError),
}

fn task_result<T>(result: Result<T, ApiError>, ok: impl FnOnce(T) -> TaskResult) -> TaskResult {
    match result {
        Ok(value) => ok(value),
        Err(e) => TaskResult::Failed(e),
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub client: AdminClient,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Certificates tab
    pub certificates: Vec<Certificate>,
    pub selection: usize,
    pub filter: CertificateFilter,
    pub filter_field: FilterField,
    pub loading: bool,
    pub form: Option<CertificateForm>,
    pub file_input: String,

    // Showcase tab
    pub showcase: Showcase,

    pub user: Option<CurrentUser>,
    pub toast: Option<Toast>,

    filter_debounce: Debouncer,
    reload_throttle: Throttle,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
}

impl App {
    /// Create the app from configuration, resuming any stored session
    pub fn new(config: Config) -> Result<Self> {
        let client = config.connect()?;
        debug!(api_base = %client.base_url(), authenticated = client.is_authenticated(), "Client ready");
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Config, client: AdminClient) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = std::env::var(USERNAME_ENV)
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var(PASSWORD_ENV).unwrap_or_default();
        let showcase = Showcase::new(&config.profile);

        Self {
            config,
            client,

            state: AppState::Normal,
            current_tab: Tab::Certificates,
            focus: Focus::List,

            login_username,
            login_password,
            login_focus: LoginFocus::Username,
            login_error: None,

            certificates: Vec::new(),
            selection: 0,
            filter: CertificateFilter::default(),
            filter_field: FilterField::Query,
            loading: false,
            form: None,
            file_input: String::new(),

            showcase,

            user: None,
            toast: None,

            filter_debounce: Debouncer::new(FILTER_DEBOUNCE),
            reload_throttle: Throttle::new(RELOAD_INTERVAL),

            task_rx: rx,
            task_tx: tx,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    /// Show the login overlay
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.form = None;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.login_username.trim().to_string();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        self.login_error = None;

        match self.client.login(&username, &password).await {
            Ok(_) => {
                self.config.last_username = Some(username.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                self.toast = Some(Toast::success(format!("Logged in as {}", username), Instant::now()));
                self.fetch_current_user();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.client.logout() {
            warn!(error = %e, "Failed to clear stored token");
        }
        self.user = None;
        self.start_login();
    }

    /// Handle a call the service rejected because the token is no longer valid
    fn session_expired(&mut self, err: &ApiError) {
        info!("Session expired, returning to login");
        self.user = None;
        self.start_login();
        self.login_error = Some(err.to_string());
    }

    // =========================================================================
    // Background Requests
    // =========================================================================

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send task result - channel closed");
        }
    }

    fn spawn_task<F>(&self, task: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            Self::send_result(&tx, task.await).await;
        });
    }

    /// Reload the certificate list for the current filter
    pub fn reload_certificates(&mut self) {
        self.filter_debounce.cancel();
        self.loading = true;
        let client = self.client.clone();
        let filter = self.filter.clone();
        debug!(?filter, "Reloading certificates");
        self.spawn_task(async move {
            task_result(client.list_certificates(&filter).await, TaskResult::Certificates)
        });
    }

    /// Manual reload, ignored when pressed repeatedly
    pub fn request_reload(&mut self, now: Instant) {
        if self.reload_throttle.allow(now) {
            self.reload_certificates();
        }
    }

    pub fn fetch_current_user(&mut self) {
        let client = self.client.clone();
        self.spawn_task(async move { task_result(client.current_user().await, TaskResult::User) });
    }

    /// Collect results from completed background requests
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.task_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        let now = Instant::now();
        match result {
            TaskResult::Certificates(certificates) => {
                debug!(count = certificates.len(), "Certificates received");
                self.loading = false;
                self.certificates = certificates;
                self.clamp_selection();
                self.rebuild_showcase();
            }
            TaskResult::User(user) => {
                self.user = Some(user);
            }
            TaskResult::Created(cert) => {
                self.close_form();
                self.toast = Some(Toast::success(
                    format!("Created \"{}\"", cert.display_title()),
                    now,
                ));
                self.reload_certificates();
            }
            TaskResult::Updated(cert) => {
                self.close_form();
                self.toast = Some(Toast::success(
                    format!("Updated \"{}\"", cert.display_title()),
                    now,
                ));
                self.replace_certificate(cert);
            }
            TaskResult::FileReplaced(cert) => {
                self.toast = Some(Toast::success("File replaced", now));
                self.replace_certificate(cert);
            }
            TaskResult::Deleted(id) => {
                self.certificates.retain(|c| c.id != id);
                self.clamp_selection();
                self.rebuild_showcase();
                self.toast = Some(Toast::success("Certificate deleted", now));
            }
            TaskResult::Failed(err) => {
                self.loading = false;
                if err.is_session_expired() {
                    self.session_expired(&err);
                }
                self.toast = Some(Toast::error(err.to_string(), now));
            }
        }
    }

    fn replace_certificate(&mut self, cert: Certificate) {
        if let Some(existing) = self.certificates.iter_mut().find(|c| c.id == cert.id) {
            *existing = cert;
        }
        self.rebuild_showcase();
    }

    fn rebuild_showcase(&mut self) {
        self.showcase
            .rebuild(&self.config.profile, &self.certificates, self.client.base_url());
    }

    fn clamp_selection(&mut self) {
        self.selection = self.selection.min(self.certificates.len().saturating_sub(1));
    }

    /// Advance timers: the typewriter, fade-ins, the debounced filter
    /// reload and toast expiry.
    pub fn tick(&mut self, now: Instant) {
        self.showcase.tick(now);
        if self.filter_debounce.poll(now) {
            self.reload_certificates();
        }
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    // =========================================================================
    // Certificate List
    // =========================================================================

    pub fn selected_certificate(&self) -> Option<&Certificate> {
        self.certificates.get(self.selection)
    }

    pub fn select_next(&mut self, step: usize) {
        let max_index = self.certificates.len().saturating_sub(1);
        self.selection = (self.selection + step).min(max_index);
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    fn filter_value_mut(&mut self) -> &mut String {
        match self.filter_field {
            FilterField::Query => &mut self.filter.query,
            FilterField::Issuer => &mut self.filter.issuer,
            FilterField::Tag => &mut self.filter.tag,
        }
    }

    pub fn filter_value(&self, field: FilterField) -> &str {
        match field {
            FilterField::Query => &self.filter.query,
            FilterField::Issuer => &self.filter.issuer,
            FilterField::Tag => &self.filter.tag,
        }
    }

    /// Type into the focused filter field; the reload waits for a pause
    pub fn filter_push(&mut self, c: char, now: Instant) {
        if c.is_control() {
            return;
        }
        self.filter_value_mut().push(c);
        self.filter_changed(now);
    }

    pub fn filter_pop(&mut self, now: Instant) {
        if self.filter_value_mut().pop().is_some() {
            self.filter_changed(now);
        }
    }

    fn filter_changed(&mut self, now: Instant) {
        self.filter.skip = 0;
        self.selection = 0;
        self.filter_debounce.call(now);
    }

    pub fn clear_filter(&mut self) {
        if self.filter.has_search_terms() || self.filter.skip > 0 {
            self.filter = CertificateFilter::default();
            self.selection = 0;
            self.reload_certificates();
        }
    }

    pub fn next_page(&mut self) {
        // A short page is the last one
        if self.certificates.len() < self.filter.page_size() as usize {
            return;
        }
        self.filter = self.filter.next_page();
        self.selection = 0;
        self.reload_certificates();
    }

    pub fn prev_page(&mut self) {
        if self.filter.skip == 0 {
            return;
        }
        self.filter = self.filter.prev_page();
        self.selection = 0;
        self.reload_certificates();
    }

    // =========================================================================
    // Editing
    // =========================================================================

    pub fn open_create_form(&mut self) {
        self.form = Some(CertificateForm::create());
        self.state = AppState::EditingForm;
    }

    pub fn open_edit_form(&mut self) {
        if let Some(cert) = self.selected_certificate() {
            self.form = Some(CertificateForm::edit(cert));
            self.state = AppState::EditingForm;
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
        if self.state == AppState::EditingForm {
            self.state = AppState::Normal;
        }
    }

    /// Validate the form and send it. Validation problems stay in the form.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let client = self.client.clone();

        match form.mode {
            FormMode::Create => match form.to_new() {
                Ok(new) => {
                    form.error = None;
                    self.spawn_task(async move {
                        task_result(client.create_certificate(&new).await, TaskResult::Created)
                    });
                }
                Err(msg) => form.error = Some(msg),
            },
            FormMode::Edit(id) => match form.to_update() {
                Ok(update) if update.is_empty() => {
                    self.close_form();
                    self.toast = Some(Toast::success("No changes", Instant::now()));
                }
                Ok(update) => {
                    form.error = None;
                    self.spawn_task(async move {
                        task_result(client.update_certificate(id, &update).await, TaskResult::Updated)
                    });
                }
                Err(msg) => form.error = Some(msg),
            },
        }
    }

    pub fn start_replace_file(&mut self) {
        if self.selected_certificate().is_some() {
            self.file_input.clear();
            self.state = AppState::ReplacingFile;
        }
    }

    pub fn push_path_char(&mut self, c: char) {
        if !c.is_control() && self.file_input.len() < MAX_PATH_LENGTH {
            self.file_input.push(c);
        }
    }

    pub fn submit_replace_file(&mut self) {
        let path = self.file_input.trim().to_string();
        if path.is_empty() {
            self.toast = Some(Toast::error("Choose a file to upload", Instant::now()));
            return;
        }
        let Some(id) = self.selected_certificate().map(|c| c.id) else {
            return;
        };
        self.state = AppState::Normal;
        let client = self.client.clone();
        self.spawn_task(async move {
            task_result(
                client.replace_certificate_file(id, path.as_ref()).await,
                TaskResult::FileReplaced,
            )
        });
    }

    pub fn confirm_delete(&mut self) {
        if self.selected_certificate().is_some() {
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn delete_selected(&mut self) {
        self.state = AppState::Normal;
        let Some(id) = self.selected_certificate().map(|c| c.id) else {
            return;
        };
        let client = self.client.clone();
        self.spawn_task(async move {
            task_result(client.delete_certificate(id).await, |_| TaskResult::Deleted(id))
        });
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && !c.is_control()
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && !c.is_control()
}

// ============================================================================
// Tests
// ============================================================================
