//! Dashboard controller - owns the state, projections and scheduled work
//!
//! Every user action goes through a method here. A method mutates
//! [`AppState`], then re-projects exactly the surfaces that read the
//! collections it touched. Delayed continuations (connection tests, chat
//! replies, the scripted chat intro, the background activity tick) are
//! queued on a virtual-time [`Scheduler`] and run from [`advance`].
//!
//! [`advance`]: DashboardController::advance

mod confirm;

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

pub use confirm::{Answer, Confirmation};

use crate::domain::{
    ActivityEvent, ActivityKind, ChatMessage, ChatRole, Connection, ConnectionStatus,
    ConnectionUsage, Pool, PoolRole, PoolUsage, Provider, RouterSettings, RoutingTarget, Theme,
    UsagePeriod, MAX_RETRY_ATTEMPTS,
};
use crate::error::{DashboardError, EntityKind, Result};
use crate::infrastructure::{Clock, RandomSource, Scheduler, TaskHandle};
use crate::projection::{Displays, Surface};
use crate::state::{AppState, ViewId};

/// Draws above this value make a connection test fail (20%)
const TEST_FAILURE_THRESHOLD: f64 = 0.8;
/// Draws above this value make a background tick emit an event (30%)
const BACKGROUND_EVENT_THRESHOLD: f64 = 0.7;

const CHAT_REPLIES: [&str; 5] = [
    "I understand your question. Let me help you with that.",
    "That's an interesting point. Here's what I think...",
    "Based on the information you provided, I can suggest...",
    "I can help you with that. Let me break it down:",
    "Great question! Here's my analysis...",
];

const BACKGROUND_EVENTS: [(ActivityKind, &str); 3] = [
    (ActivityKind::Chat, "Background chat completion processed"),
    (ActivityKind::Usage, "Usage threshold warning triggered"),
    (
        ActivityKind::Connection,
        "Automatic connection health check completed",
    ),
];

const INTRO_QUESTION: &str = "Can you help me understand how the smart routing works?";
const INTRO_ANSWER: &str = "Absolutely! Our smart routing system automatically selects the best \
available AI provider based on factors like cost, performance, availability, and your usage \
limits. It can failover between providers seamlessly and ensures you get the most efficient \
routing for each request.";
const INTRO_MODEL: &str = "gpt-4";

pub const DELETE_CONNECTION_PROMPT: &str = "Are you sure you want to delete this connection?";
pub const LEAVE_POOL_PROMPT: &str = "Are you sure you want to leave this pool?";

/// Simulated latencies, in virtual time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub connection_test: Duration,
    pub chat_reply: Duration,
    /// Delay before the scripted question appears
    pub intro_question: Duration,
    /// Delay between the scripted question and its answer
    pub intro_answer: Duration,
    pub activity_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            connection_test: Duration::from_millis(1000),
            chat_reply: Duration::from_millis(1500),
            intro_question: Duration::from_millis(500),
            intro_answer: Duration::from_millis(1000),
            activity_interval: Duration::from_secs(10),
        }
    }
}

/// Work queued on the scheduler
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    CompleteConnectionTest {
        id: String,
        tested_at: DateTime<Utc>,
    },
    ChatReply {
        target: RoutingTarget,
    },
    ScriptedMessage {
        role: ChatRole,
        content: &'static str,
        model: Option<RoutingTarget>,
    },
    ActivityTick,
}

impl Deferred {
    /// Simulated requests show the loading indicator until they complete.
    fn is_request(&self) -> bool {
        matches!(
            self,
            Deferred::CompleteConnectionTest { .. } | Deferred::ChatReply { .. }
        )
    }
}

/// Which part of the state a mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Connections,
    Pools,
    Activity,
    Chat,
    Settings,
    UsagePeriod,
}

impl Change {
    fn surfaces(self) -> &'static [Surface] {
        match self {
            Change::Connections => &[Surface::Dashboard, Surface::Connections, Surface::Usage],
            Change::Pools => &[Surface::Dashboard, Surface::Pools, Surface::Usage],
            Change::Activity => &[Surface::Activity],
            Change::Chat => &[Surface::Chat],
            Change::Settings => &[Surface::Settings],
            Change::UsagePeriod => &[Surface::Usage],
        }
    }
}

/// Input of [`DashboardController::create_pool`]
#[derive(Debug, Clone, PartialEq)]
pub struct PoolDraft {
    pub name: String,
    pub description: String,
    pub token_limit: u64,
    pub cost_limit: f64,
}

impl PoolDraft {
    pub fn new(name: impl Into<String>, token_limit: u64, cost_limit: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            token_limit,
            cost_limit,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

pub struct DashboardController {
    state: AppState,
    displays: Displays,
    scheduler: Scheduler<Deferred>,
    clock: Box<dyn Clock>,
    random: Box<dyn RandomSource>,
    timings: Timings,
    activity_ticker: Option<TaskHandle>,
    /// Activity changed by the background tick while the dashboard was hidden
    activity_stale: bool,
    next_connection_id: u64,
    next_pool_id: u64,
}

impl DashboardController {
    pub fn new(state: AppState, clock: Box<dyn Clock>, random: Box<dyn RandomSource>) -> Self {
        let displays = Displays::build(&state, clock.now());
        let next_connection_id = next_id(state.connections.iter().map(|c| c.id.as_str()), "conn-");
        let next_pool_id = next_id(state.pools.iter().map(|p| p.id.as_str()), "pool-");
        Self {
            state,
            displays,
            scheduler: Scheduler::new(),
            clock,
            random,
            timings: Timings::default(),
            activity_ticker: None,
            activity_stale: false,
            next_connection_id,
            next_pool_id,
        }
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    // === Accessors ===

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn displays(&self) -> &Displays {
        &self.displays
    }

    pub fn current_view(&self) -> ViewId {
        self.state.current_view
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn render_count(&self, surface: Surface) -> u64 {
        self.displays.render_count(surface)
    }

    /// True while a simulated request is in flight.
    pub fn is_loading(&self) -> bool {
        self.scheduler.tasks().any(Deferred::is_request)
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Virtual time elapsed since the controller was created.
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    // === View switching ===

    /// Switch by identifier. Unknown identifiers are ignored and return false.
    pub fn switch_view(&mut self, name: &str) -> bool {
        match ViewId::parse(name) {
            Some(view) => {
                self.switch_to(view);
                true
            }
            None => {
                debug!(view = name, "ignoring unknown view");
                false
            }
        }
    }

    pub fn switch_to(&mut self, view: ViewId) {
        debug!(from = self.state.current_view.id(), to = view.id(), "switch view");
        self.state.current_view = view;
        match view {
            ViewId::Chat if !self.state.chat_seeded => self.schedule_chat_intro(),
            ViewId::Dashboard if self.activity_stale => {
                self.activity_stale = false;
                self.rerender(&[Change::Activity]);
            }
            _ => {}
        }
    }

    fn schedule_chat_intro(&mut self) {
        self.state.chat_seeded = true;
        let question_at = self.timings.intro_question;
        let answer_at = question_at + self.timings.intro_answer;
        self.scheduler.schedule(
            question_at,
            Deferred::ScriptedMessage {
                role: ChatRole::User,
                content: INTRO_QUESTION,
                model: None,
            },
        );
        self.scheduler.schedule(
            answer_at,
            Deferred::ScriptedMessage {
                role: ChatRole::Assistant,
                content: INTRO_ANSWER,
                model: Some(RoutingTarget::Model(INTRO_MODEL.to_string())),
            },
        );
    }

    // === Connections ===

    /// Add a connection. The key is required but never stored.
    pub fn add_connection(&mut self, provider: &str, label: &str, key: &str) -> Result<String> {
        let label = label.trim();
        if label.is_empty() {
            return Err(DashboardError::validation(
                "label",
                "Please fill in all required fields",
            ));
        }
        if key.trim().is_empty() {
            return Err(DashboardError::validation(
                "key",
                "Please fill in all required fields",
            ));
        }

        let id = format!("conn-{}", self.next_connection_id);
        self.next_connection_id += 1;
        let provider = Provider::parse(provider);
        info!(id = %id, provider = %provider, label, "connection added");

        self.state.connections.push(Connection {
            id: id.clone(),
            provider,
            label: label.to_string(),
            status: ConnectionStatus::Active,
            last_tested_at: self.clock.now(),
            usage: ConnectionUsage::default(),
        });
        self.state.record_activity(ActivityEvent::now(
            ActivityKind::Connection,
            format!("New connection added: {label}"),
        ));
        self.rerender(&[Change::Connections, Change::Activity]);
        Ok(id)
    }

    /// Start a simulated connectivity check. The outcome lands after
    /// [`Timings::connection_test`] of virtual time.
    pub fn test_connection(&mut self, id: &str) -> Result<TaskHandle> {
        if self.state.connection(id).is_none() {
            return Err(DashboardError::not_found(EntityKind::Connection, id));
        }
        debug!(id, "connection test started");
        let handle = self.scheduler.schedule(
            self.timings.connection_test,
            Deferred::CompleteConnectionTest {
                id: id.to_string(),
                tested_at: self.clock.now(),
            },
        );
        Ok(handle)
    }

    fn complete_connection_test(&mut self, id: &str, tested_at: DateTime<Utc>) {
        if self.state.connection(id).is_none() {
            debug!(id, "connection removed before its test completed");
            return;
        }
        let failed = self.random.next_f64() > TEST_FAILURE_THRESHOLD;
        let Some(connection) = self.state.connection_mut(id) else {
            return;
        };
        connection.last_tested_at = tested_at;
        connection.status = if failed {
            ConnectionStatus::Error
        } else {
            ConnectionStatus::Active
        };
        let label = connection.label.clone();
        let outcome = if failed { "failed" } else { "successful" };
        if failed {
            warn!(id, label = %label, "connection test failed");
        } else {
            info!(id, label = %label, "connection test successful");
        }

        self.state.record_activity(ActivityEvent::now(
            ActivityKind::Connection,
            format!("Connection test {outcome} for {label}"),
        ));
        self.rerender(&[Change::Connections, Change::Activity]);
    }

    /// Returns `Ok(false)` when the user declined.
    pub fn delete_connection(
        &mut self,
        id: &str,
        confirm: &mut dyn Confirmation,
    ) -> Result<bool> {
        if !confirm.confirm(DELETE_CONNECTION_PROMPT) {
            return Ok(false);
        }
        let index = self
            .state
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DashboardError::not_found(EntityKind::Connection, id))?;

        let connection = self.state.connections.remove(index);
        info!(id, label = %connection.label, "connection deleted");
        self.state.record_activity(ActivityEvent::now(
            ActivityKind::Connection,
            format!("Connection deleted: {}", connection.label),
        ));
        self.rerender(&[Change::Connections, Change::Activity]);
        Ok(true)
    }

    // === Pools ===

    pub fn create_pool(&mut self, draft: PoolDraft) -> Result<String> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(DashboardError::validation("name", "Please enter a pool name"));
        }

        let id = format!("pool-{}", self.next_pool_id);
        self.next_pool_id += 1;
        info!(
            id = %id,
            name,
            token_limit = draft.token_limit,
            cost_limit = draft.cost_limit,
            "pool created"
        );

        self.state.pools.push(Pool {
            id: id.clone(),
            name: name.to_string(),
            description: draft.description.trim().to_string(),
            member_count: 1,
            role: PoolRole::Admin,
            usage: PoolUsage {
                tokens: 0,
                tokens_limit: draft.token_limit,
                cost: 0.0,
                cost_limit: draft.cost_limit,
            },
        });
        self.state.record_activity(ActivityEvent::now(
            ActivityKind::Pool,
            format!("New pool created: {name}"),
        ));
        self.rerender(&[Change::Pools, Change::Activity]);
        Ok(id)
    }

    /// Returns `Ok(false)` when the user declined.
    pub fn leave_pool(&mut self, id: &str, confirm: &mut dyn Confirmation) -> Result<bool> {
        if !confirm.confirm(LEAVE_POOL_PROMPT) {
            return Ok(false);
        }
        let index = self
            .state
            .pools
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DashboardError::not_found(EntityKind::Pool, id))?;

        let pool = self.state.pools.remove(index);
        info!(id, name = %pool.name, "left pool");
        self.state.record_activity(ActivityEvent::now(
            ActivityKind::Pool,
            format!("Left pool: {}", pool.name),
        ));
        self.rerender(&[Change::Pools, Change::Activity]);
        Ok(true)
    }

    // === Chat ===

    /// Append the user's message and queue a reply. Blank input is ignored.
    pub fn send_chat_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let target = self.state.routing_target.clone();
        debug!(target = %target, "chat message sent");
        self.state.chat.push(ChatMessage {
            role: ChatRole::User,
            content: text.to_string(),
            model: None,
            timestamp: self.clock.now(),
        });
        self.rerender(&[Change::Chat]);
        self.scheduler
            .schedule(self.timings.chat_reply, Deferred::ChatReply { target });
        true
    }

    fn complete_chat_reply(&mut self, target: RoutingTarget) {
        let reply = CHAT_REPLIES[self.random.pick(CHAT_REPLIES.len())];
        self.state.chat.push(ChatMessage {
            role: ChatRole::Assistant,
            content: reply.to_string(),
            model: Some(target.clone()),
            timestamp: self.clock.now(),
        });
        self.state.record_activity(ActivityEvent::now(
            ActivityKind::Chat,
            format!("Chat completion via {}", target.activity_label()),
        ));
        self.rerender(&[Change::Chat, Change::Activity]);
    }

    pub fn select_routing_target(&mut self, target: RoutingTarget) {
        info!(target = %target, "routing target selected");
        self.state.routing_target = target;
        self.rerender(&[Change::Chat, Change::Settings]);
    }

    // === Theme, settings, usage period ===

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.state.theme.toggled();
        self.set_theme(theme);
        theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        debug!(theme = theme.as_str(), "theme set");
        self.state.theme = theme;
        self.rerender(&[Change::Settings]);
    }

    pub fn save_settings(&mut self, settings: RouterSettings) -> Result<()> {
        validate_settings(&settings)?;
        match serde_json::to_string(&settings) {
            Ok(json) => info!(settings = %json, "settings saved"),
            Err(err) => warn!(error = %err, "settings saved but could not be logged"),
        }
        self.state.settings = settings;
        self.rerender(&[Change::Settings]);
        Ok(())
    }

    /// Apply settings loaded from the preference store at startup.
    pub fn restore_settings(&mut self, settings: RouterSettings) -> Result<()> {
        validate_settings(&settings)?;
        debug!("stored settings restored");
        self.state.settings = settings;
        self.rerender(&[Change::Settings]);
        Ok(())
    }

    pub fn set_usage_period(&mut self, period: UsagePeriod) {
        debug!(period = period.label(), "usage period changed");
        self.state.usage_period = period;
        self.rerender(&[Change::UsagePeriod]);
    }

    // === Background activity ===

    /// Start the periodic activity tick; returns the running handle if it
    /// was already started.
    pub fn start_activity_updates(&mut self) -> TaskHandle {
        if let Some(handle) = self.activity_ticker {
            return handle;
        }
        let handle = self
            .scheduler
            .schedule_every(self.timings.activity_interval, Deferred::ActivityTick);
        self.activity_ticker = Some(handle);
        handle
    }

    pub fn stop_activity_updates(&mut self) -> bool {
        match self.activity_ticker.take() {
            Some(handle) => self.scheduler.cancel(handle),
            None => false,
        }
    }

    pub fn activity_updates_running(&self) -> bool {
        self.activity_ticker.is_some()
    }

    fn activity_tick(&mut self) {
        if self.random.next_f64() <= BACKGROUND_EVENT_THRESHOLD {
            return;
        }
        let (kind, message) = BACKGROUND_EVENTS[self.random.pick(BACKGROUND_EVENTS.len())];
        debug!(message, "background activity");
        self.state.record_activity(ActivityEvent::now(kind, message));
        if self.state.current_view == ViewId::Dashboard {
            self.rerender(&[Change::Activity]);
        } else {
            self.activity_stale = true;
        }
    }

    // === Scheduling ===

    /// Move virtual time forward, running every task that falls due.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.now() + by;
        while let Some(task) = self.scheduler.pop_due(until) {
            self.run(task);
        }
        self.scheduler.settle(until);
    }

    /// Drop all queued work, including the activity tick.
    pub fn shutdown(&mut self) {
        let pending = self.scheduler.pending();
        self.scheduler.cancel_all();
        self.activity_ticker = None;
        debug!(pending, "scheduler shut down");
    }

    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if self.activity_ticker == Some(handle) {
            self.activity_ticker = None;
        }
        self.scheduler.cancel(handle)
    }

    fn run(&mut self, task: Deferred) {
        match task {
            Deferred::CompleteConnectionTest { id, tested_at } => {
                self.complete_connection_test(&id, tested_at)
            }
            Deferred::ChatReply { target } => self.complete_chat_reply(target),
            Deferred::ScriptedMessage {
                role,
                content,
                model,
            } => {
                self.state.chat.push(ChatMessage {
                    role,
                    content: content.to_string(),
                    model,
                    timestamp: self.clock.now(),
                });
                self.rerender(&[Change::Chat]);
            }
            Deferred::ActivityTick => self.activity_tick(),
        }
    }

    /// Re-project every surface that reads one of `changes`, once each.
    fn rerender(&mut self, changes: &[Change]) {
        let now = self.clock.now();
        let mut done: Vec<Surface> = Vec::new();
        for surface in changes.iter().flat_map(|change| change.surfaces()) {
            if done.contains(surface) {
                continue;
            }
            self.displays.render(*surface, &self.state, now);
            done.push(*surface);
        }
        if done.contains(&Surface::Activity) && self.state.current_view == ViewId::Dashboard {
            self.activity_stale = false;
        }
    }
}

/// First free numeric suffix after the highest `{prefix}N` id.
fn next_id<'a>(ids: impl Iterator<Item = &'a str>, prefix: &str) -> u64 {
    ids.filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .map_or(1, |max| max + 1)
}

fn validate_settings(settings: &RouterSettings) -> Result<()> {
    if settings.retry_attempts > MAX_RETRY_ATTEMPTS {
        return Err(DashboardError::validation(
            "retry_attempts",
            format!("Retry attempts must be between 0 and {MAX_RETRY_ATTEMPTS}"),
        ));
    }
    if settings.daily_token_limit == 0 {
        return Err(DashboardError::validation(
            "daily_token_limit",
            "Daily token limit must be greater than zero",
        ));
    }
    if !(settings.monthly_cost_limit.is_finite() && settings.monthly_cost_limit > 0.0) {
        return Err(DashboardError::validation(
            "monthly_cost_limit",
            "Monthly cost limit must be greater than zero",
        ));
    }
    Ok(())
}
