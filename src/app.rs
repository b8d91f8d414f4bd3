//! Terminal session state around the dashboard controller
//!
//! `App` holds everything that only matters to the terminal front end:
//! which modal is open, list selections, the command bar and the status
//! line. Every change to dashboard data goes through the controller.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::controller::{
    Answer, DashboardController, PoolDraft, DELETE_CONNECTION_PROMPT, LEAVE_POOL_PROMPT,
};
use crate::core::{parse_command, Command};
use crate::domain::{RouterSettings, RoutingTarget, Theme, UsagePeriod, MAX_RETRY_ATTEMPTS};
use crate::error::DashboardError;
use crate::state::ViewId;
use crate::store::PreferenceStore;

pub const PROVIDER_CHOICES: [&str; 3] = ["openai", "openrouter", "anthropic"];
pub const DEFAULT_POOL_TOKEN_LIMIT: &str = "50000";
pub const DEFAULT_POOL_COST_LIMIT: &str = "25";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionField {
    Provider,
    Label,
    Key,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionForm {
    pub provider_index: usize,
    pub label: String,
    pub key: String,
    pub field: ConnectionField,
}

impl Default for ConnectionForm {
    fn default() -> Self {
        Self {
            provider_index: 0,
            label: String::new(),
            key: String::new(),
            field: ConnectionField::Label,
        }
    }
}

impl ConnectionForm {
    pub fn provider(&self) -> &'static str {
        PROVIDER_CHOICES[self.provider_index % PROVIDER_CHOICES.len()]
    }

    fn next_field(&mut self) {
        self.field = match self.field {
            ConnectionField::Provider => ConnectionField::Label,
            ConnectionField::Label => ConnectionField::Key,
            ConnectionField::Key => ConnectionField::Provider,
        };
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            ConnectionField::Provider => None,
            ConnectionField::Label => Some(&mut self.label),
            ConnectionField::Key => Some(&mut self.key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolField {
    Name,
    Description,
    TokenLimit,
    CostLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolForm {
    pub name: String,
    pub description: String,
    pub token_limit: String,
    pub cost_limit: String,
    pub field: PoolField,
}

impl Default for PoolForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            token_limit: DEFAULT_POOL_TOKEN_LIMIT.to_string(),
            cost_limit: DEFAULT_POOL_COST_LIMIT.to_string(),
            field: PoolField::Name,
        }
    }
}

impl PoolForm {
    fn next_field(&mut self) {
        self.field = match self.field {
            PoolField::Name => PoolField::Description,
            PoolField::Description => PoolField::TokenLimit,
            PoolField::TokenLimit => PoolField::CostLimit,
            PoolField::CostLimit => PoolField::Name,
        };
    }

    fn text_mut(&mut self) -> &mut String {
        match self.field {
            PoolField::Name => &mut self.name,
            PoolField::Description => &mut self.description,
            PoolField::TokenLimit => &mut self.token_limit,
            PoolField::CostLimit => &mut self.cost_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteConnection(String),
    LeavePool(String),
}

impl ConfirmAction {
    pub fn prompt(&self) -> &'static str {
        match self {
            ConfirmAction::DeleteConnection(_) => DELETE_CONNECTION_PROMPT,
            ConfirmAction::LeavePool(_) => LEAVE_POOL_PROMPT,
        }
    }
}

/// Blocking overlay; while one is open it receives all keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    AddConnection(ConnectionForm),
    CreatePool(PoolForm),
    Confirm(ConfirmAction),
    /// `resume` is the form reopened once the alert is dismissed.
    Alert {
        message: String,
        resume: Option<Box<Modal>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    Theme,
    Strategy,
    RetryAttempts,
    DailyTokenLimit,
    MonthlyCostLimit,
    UsageAlerts,
    ErrorNotifications,
}

impl SettingField {
    pub const ALL: [SettingField; 7] = [
        SettingField::Theme,
        SettingField::Strategy,
        SettingField::RetryAttempts,
        SettingField::DailyTokenLimit,
        SettingField::MonthlyCostLimit,
        SettingField::UsageAlerts,
        SettingField::ErrorNotifications,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SettingField::Theme => "Theme",
            SettingField::Strategy => "Routing strategy",
            SettingField::RetryAttempts => "Retry attempts",
            SettingField::DailyTokenLimit => "Daily token limit",
            SettingField::MonthlyCostLimit => "Monthly cost limit",
            SettingField::UsageAlerts => "Usage alerts",
            SettingField::ErrorNotifications => "Error notifications",
        }
    }
}

pub struct App {
    pub controller: DashboardController,
    pub input_mode: InputMode,
    pub command: CommandBar,
    pub chat_input: String,
    pub modal: Option<Modal>,
    pub selected_connection: usize,
    pub selected_pool: usize,
    pub selected_setting: usize,
    /// Settings being edited; committed by `save_settings`
    pub settings_draft: RouterSettings,
    pub routing_targets: Vec<String>,
    pub prefs: Option<PreferenceStore>,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: DashboardController) -> Self {
        let settings_draft = controller.state().settings.clone();
        Self {
            controller,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            chat_input: String::new(),
            modal: None,
            selected_connection: 0,
            selected_pool: 0,
            selected_setting: 0,
            settings_draft,
            routing_targets: vec!["auto".to_string()],
            prefs: None,
            status: None,
            help_open: false,
            should_quit: false,
        }
    }

    pub fn with_routing_targets(mut self, targets: Vec<String>) -> Self {
        if !targets.is_empty() {
            self.routing_targets = targets;
        }
        self
    }

    /// Attach the preference store and apply what it holds.
    pub fn attach_prefs(&mut self, store: PreferenceStore) {
        match store.load_theme() {
            Ok(theme) => self.controller.set_theme(theme),
            Err(err) => self.set_status(format!("Theme not loaded: {err}"), StatusLevel::Warn),
        }
        match store.load_settings() {
            Ok(Some(settings)) => {
                if let Err(err) = self.controller.restore_settings(settings.clone()) {
                    warn!(error = %err, "stored settings rejected");
                } else {
                    self.settings_draft = settings;
                }
            }
            Ok(None) => {}
            Err(err) => self.set_status(format!("Settings not loaded: {err}"), StatusLevel::Warn),
        }
        self.prefs = Some(store);
    }

    pub fn current_view(&self) -> ViewId {
        self.controller.current_view()
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    /// Feed elapsed wall time into the controller's scheduler.
    pub fn on_tick(&mut self, elapsed: Duration) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > Duration::from_secs(3) {
                self.status = None;
            }
        }
        self.controller.advance(elapsed);
        self.clamp_selections();
    }

    // === Error reporting ===

    /// Validation failures block in an alert; missing ids are dropped.
    pub fn report(&mut self, err: DashboardError) {
        self.report_over(err, None);
    }

    /// Like `report`, but the alert hands control back to `resume` when closed.
    fn report_over(&mut self, err: DashboardError, resume: Option<Modal>) {
        if err.is_user_visible() {
            self.modal = Some(Modal::Alert {
                message: err.to_string(),
                resume: resume.map(Box::new),
            });
        } else {
            debug!(error = %err, "ignored");
            self.modal = resume;
        }
    }

    /// Close an alert, reopening the form it interrupted.
    pub fn dismiss_alert(&mut self) {
        if let Some(Modal::Alert { resume, .. }) = self.modal.take() {
            self.modal = resume.map(|modal| *modal);
        }
    }

    // === Views ===

    pub fn switch_view(&mut self, view: ViewId) {
        self.controller.switch_to(view);
        self.input_mode = InputMode::Normal;
    }

    pub fn cycle_view(&mut self, forward: bool) {
        let views = ViewId::ALL;
        let idx = views
            .iter()
            .position(|v| *v == self.current_view())
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % views.len()
        } else {
            (idx + views.len() - 1) % views.len()
        };
        self.switch_view(views[next]);
    }

    // === Selection ===

    pub fn selected_connection_id(&self) -> Option<String> {
        self.controller
            .state()
            .connections
            .get(self.selected_connection)
            .map(|c| c.id.clone())
    }

    pub fn selected_pool_id(&self) -> Option<String> {
        self.controller
            .state()
            .pools
            .get(self.selected_pool)
            .map(|p| p.id.clone())
    }

    pub fn move_selection(&mut self, down: bool) {
        let (selection, len) = match self.current_view() {
            ViewId::Connections => (
                &mut self.selected_connection,
                self.controller.state().connections.len(),
            ),
            ViewId::Pools => (&mut self.selected_pool, self.controller.state().pools.len()),
            ViewId::Settings => (&mut self.selected_setting, SettingField::ALL.len()),
            _ => return,
        };
        if len == 0 {
            *selection = 0;
        } else if down {
            *selection = (*selection + 1).min(len - 1);
        } else {
            *selection = selection.saturating_sub(1);
        }
    }

    fn clamp_selections(&mut self) {
        let connections = self.controller.state().connections.len();
        let pools = self.controller.state().pools.len();
        Self::clamp_selection(&mut self.selected_connection, connections);
        Self::clamp_selection(&mut self.selected_pool, pools);
    }

    fn clamp_selection(selection: &mut usize, len: usize) {
        if len == 0 {
            *selection = 0;
        } else if *selection >= len {
            *selection = len - 1;
        }
    }

    // === Connections ===

    pub fn open_add_connection(&mut self) {
        self.modal = Some(Modal::AddConnection(ConnectionForm::default()));
    }

    pub fn test_selected_connection(&mut self) {
        let Some(id) = self.selected_connection_id() else {
            return;
        };
        match self.controller.test_connection(&id) {
            Ok(_) => self.set_status(format!("Testing {id}…"), StatusLevel::Info),
            Err(err) => self.report(err),
        }
    }

    pub fn request_delete_selected(&mut self) {
        let action = match self.current_view() {
            ViewId::Connections => self
                .selected_connection_id()
                .map(ConfirmAction::DeleteConnection),
            ViewId::Pools => self.selected_pool_id().map(ConfirmAction::LeavePool),
            _ => None,
        };
        if let Some(action) = action {
            self.modal = Some(Modal::Confirm(action));
        }
    }

    /// Resolve an open confirmation dialog.
    pub fn answer_confirm(&mut self, yes: bool) {
        if !matches!(self.modal, Some(Modal::Confirm(_))) {
            return;
        }
        let Some(Modal::Confirm(action)) = self.modal.take() else {
            return;
        };
        let mut answer = Answer(yes);
        let result = match &action {
            ConfirmAction::DeleteConnection(id) => {
                self.controller.delete_connection(id, &mut answer)
            }
            ConfirmAction::LeavePool(id) => self.controller.leave_pool(id, &mut answer),
        };
        match result {
            Ok(true) => self.clamp_selections(),
            Ok(false) => {}
            Err(err) => self.report(err),
        }
    }

    fn submit_connection_form(&mut self, form: ConnectionForm) {
        match self
            .controller
            .add_connection(form.provider(), &form.label, &form.key)
        {
            Ok(id) => {
                let last = self.controller.state().connections.len().saturating_sub(1);
                self.selected_connection = last;
                self.set_status(format!("Connection {id} added"), StatusLevel::Info);
            }
            Err(err) => self.report_over(err, Some(Modal::AddConnection(form))),
        }
    }

    // === Pools ===

    pub fn open_create_pool(&mut self) {
        self.modal = Some(Modal::CreatePool(PoolForm::default()));
    }

    fn submit_pool_form(&mut self, form: PoolForm) {
        let limits = (Some(form.token_limit.as_str()), Some(form.cost_limit.as_str()));
        let result = pool_draft(&form.name, limits.0, limits.1)
            .map(|draft| draft.with_description(form.description.clone()))
            .and_then(|draft| self.controller.create_pool(draft));
        match result {
            Ok(id) => {
                self.selected_pool = self.controller.state().pools.len().saturating_sub(1);
                self.set_status(format!("Pool {id} created"), StatusLevel::Info);
            }
            Err(err) => self.report_over(err, Some(Modal::CreatePool(form))),
        }
    }

    // === Chat ===

    pub fn enter_chat_input(&mut self) {
        if self.current_view() != ViewId::Chat {
            self.switch_view(ViewId::Chat);
        }
        self.input_mode = InputMode::Chat;
    }

    pub fn submit_chat(&mut self) {
        let text = std::mem::take(&mut self.chat_input);
        self.controller.send_chat_message(&text);
    }

    pub fn cycle_routing_target(&mut self) {
        if self.routing_targets.is_empty() {
            return;
        }
        let current = self.controller.state().routing_target.to_string();
        let idx = self
            .routing_targets
            .iter()
            .position(|t| *t == current)
            .map_or(0, |i| (i + 1) % self.routing_targets.len());
        let target = RoutingTarget::parse(&self.routing_targets[idx]);
        self.controller.select_routing_target(target);
    }

    // === Theme and settings ===

    pub fn toggle_theme(&mut self) {
        let theme = self.controller.toggle_theme();
        self.persist_theme(theme);
    }

    fn persist_theme(&mut self, theme: Theme) {
        let Some(store) = self.prefs.as_ref() else {
            return;
        };
        if let Err(err) = store.save_theme(theme) {
            self.set_status(format!("Theme not saved: {err}"), StatusLevel::Warn);
        }
    }

    pub fn selected_setting(&self) -> SettingField {
        SettingField::ALL[self.selected_setting.min(SettingField::ALL.len() - 1)]
    }

    /// Adjust the selected settings field; `forward` increases or advances.
    pub fn adjust_setting(&mut self, forward: bool) {
        let field = self.selected_setting();
        if field == SettingField::Theme {
            return self.toggle_theme();
        }
        let draft = &mut self.settings_draft;
        match field {
            SettingField::Theme => {}
            SettingField::Strategy => draft.routing_strategy = draft.routing_strategy.next(),
            SettingField::RetryAttempts => {
                draft.retry_attempts = if forward {
                    (draft.retry_attempts + 1).min(MAX_RETRY_ATTEMPTS)
                } else {
                    draft.retry_attempts.saturating_sub(1)
                };
            }
            SettingField::DailyTokenLimit => {
                draft.daily_token_limit = if forward {
                    draft.daily_token_limit.saturating_add(10_000)
                } else {
                    draft.daily_token_limit.saturating_sub(10_000).max(10_000)
                };
            }
            SettingField::MonthlyCostLimit => {
                draft.monthly_cost_limit = if forward {
                    draft.monthly_cost_limit + 5.0
                } else {
                    (draft.monthly_cost_limit - 5.0).max(5.0)
                };
            }
            SettingField::UsageAlerts => draft.usage_alerts = !draft.usage_alerts,
            SettingField::ErrorNotifications => {
                draft.error_notifications = !draft.error_notifications
            }
        }
    }

    pub fn save_settings(&mut self) {
        let settings = self.settings_draft.clone();
        if let Err(err) = self.controller.save_settings(settings.clone()) {
            return self.report(err);
        }
        if let Some(store) = self.prefs.as_ref() {
            if let Err(err) = store.save_settings(&settings) {
                self.set_status(format!("Settings not saved: {err}"), StatusLevel::Warn);
                return;
            }
        }
        self.set_status("Settings saved successfully!", StatusLevel::Info);
    }

    pub fn cycle_usage_period(&mut self) {
        let next = self.controller.state().usage_period.next();
        self.controller.set_usage_period(next);
    }

    // === Modal input ===

    pub fn modal_char(&mut self, ch: char) {
        match self.modal.as_mut() {
            Some(Modal::AddConnection(form)) => {
                if let Some(text) = form.text_mut() {
                    text.push(ch);
                }
            }
            Some(Modal::CreatePool(form)) => form.text_mut().push(ch),
            _ => {}
        }
    }

    pub fn modal_backspace(&mut self) {
        match self.modal.as_mut() {
            Some(Modal::AddConnection(form)) => {
                if let Some(text) = form.text_mut() {
                    text.pop();
                }
            }
            Some(Modal::CreatePool(form)) => {
                form.text_mut().pop();
            }
            _ => {}
        }
    }

    pub fn modal_next_field(&mut self) {
        match self.modal.as_mut() {
            Some(Modal::AddConnection(form)) => form.next_field(),
            Some(Modal::CreatePool(form)) => form.next_field(),
            _ => {}
        }
    }

    /// Left/right on the provider field cycles providers.
    pub fn modal_cycle_choice(&mut self, forward: bool) {
        if let Some(Modal::AddConnection(form)) = self.modal.as_mut() {
            if form.field == ConnectionField::Provider {
                let len = PROVIDER_CHOICES.len();
                form.provider_index = if forward {
                    (form.provider_index + 1) % len
                } else {
                    (form.provider_index + len - 1) % len
                };
            }
        }
    }

    /// Enter inside a modal: submit a form, accept a confirm, close an alert.
    pub fn modal_submit(&mut self) {
        match self.modal.take() {
            Some(Modal::AddConnection(form)) => self.submit_connection_form(form),
            Some(Modal::CreatePool(form)) => self.submit_pool_form(form),
            Some(Modal::Confirm(action)) => {
                self.modal = Some(Modal::Confirm(action));
                self.answer_confirm(true);
            }
            Some(alert @ Modal::Alert { .. }) => {
                self.modal = Some(alert);
                self.dismiss_alert();
            }
            None => {}
        }
    }

    /// Esc inside a modal: forms are discarded, confirms declined.
    pub fn modal_cancel(&mut self) {
        match self.modal {
            Some(Modal::Confirm(_)) => self.answer_confirm(false),
            Some(Modal::Alert { .. }) => self.dismiss_alert(),
            _ => self.modal = None,
        }
    }

    // === Command bar ===

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        self.exit_command();
        if input.is_empty() {
            return;
        }
        let cmd = parse_command(&input);
        if !matches!(cmd, Command::Unknown(_)) {
            self.command.last = Some(input);
        }
        self.execute_command(cmd);
    }

    pub fn execute_command(&mut self, cmd: Command) {
        match cmd {
            Command::View(name) => {
                if !self.controller.switch_view(&name) {
                    self.set_status(format!("Unknown view: {name}"), StatusLevel::Warn);
                }
            }
            Command::AddConnection {
                provider,
                label,
                key,
            } => {
                if let Err(err) = self.controller.add_connection(&provider, &label, &key) {
                    self.report(err);
                }
            }
            Command::Test(id) => {
                if let Err(err) = self.controller.test_connection(&id) {
                    self.report(err);
                }
            }
            Command::Delete(id) => {
                self.modal = Some(Modal::Confirm(ConfirmAction::DeleteConnection(id)));
            }
            Command::CreatePool {
                name,
                token_limit,
                cost_limit,
            } => {
                let result = pool_draft(&name, token_limit.as_deref(), cost_limit.as_deref())
                    .and_then(|draft| self.controller.create_pool(draft));
                if let Err(err) = result {
                    self.report(err);
                }
            }
            Command::Leave(id) => {
                self.modal = Some(Modal::Confirm(ConfirmAction::LeavePool(id)));
            }
            Command::Send(text) => {
                self.controller.send_chat_message(&text);
            }
            Command::Model(target) => {
                self.controller
                    .select_routing_target(RoutingTarget::parse(&target));
            }
            Command::Period(value) => match UsagePeriod::parse(&value) {
                Some(period) => self.controller.set_usage_period(period),
                None => self.set_status(
                    format!("Unknown period: {value} (7d, 30d, 90d)"),
                    StatusLevel::Warn,
                ),
            },
            Command::Theme => self.toggle_theme(),
            Command::Help => self.help_open = true,
            Command::Quit => self.should_quit = true,
            Command::Unknown(input) => {
                self.set_status(format!("Unknown command: {input}"), StatusLevel::Error)
            }
        }
        self.clamp_selections();
    }
}

/// Parse form/command limits into a draft; blanks take the form defaults.
pub fn pool_draft(
    name: &str,
    token_limit: Option<&str>,
    cost_limit: Option<&str>,
) -> Result<PoolDraft, DashboardError> {
    if name.trim().is_empty() {
        return Err(DashboardError::validation("name", "Please enter a pool name"));
    }
    let token_limit = token_limit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_POOL_TOKEN_LIMIT);
    let cost_limit = cost_limit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_POOL_COST_LIMIT);

    let token_limit = token_limit.parse::<u64>().map_err(|_| {
        DashboardError::validation("token_limit", "Token limit must be a whole number")
    })?;
    let cost_limit = cost_limit
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| {
            DashboardError::validation("cost_limit", "Cost limit must be a non-negative number")
        })?;
    Ok(PoolDraft::new(name, token_limit, cost_limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_draft_defaults_and_errors() {
        let draft = pool_draft("Team", None, Some(" ")).unwrap();
        assert_eq!(draft.token_limit, 50_000);
        assert_eq!(draft.cost_limit, 25.0);

        let err = pool_draft("Team", Some("lots"), None).unwrap_err();
        assert!(err.is_user_visible());
        assert!(pool_draft("Team", None, Some("-1")).is_err());
    }

    #[test]
    fn test_pool_draft_reports_missing_name_first() {
        let err = pool_draft("  ", Some("lots"), Some("x")).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a pool name");
    }

    #[test]
    fn test_connection_form_field_cycle() {
        let mut form = ConnectionForm::default();
        assert_eq!(form.field, ConnectionField::Label);
        form.next_field();
        form.next_field();
        assert_eq!(form.field, ConnectionField::Provider);
        assert!(form.text_mut().is_none());
        assert_eq!(form.provider(), "openai");
    }
}
