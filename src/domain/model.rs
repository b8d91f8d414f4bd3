//! Core records held by the dashboard state

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Upstream provider a connection is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    OpenRouter,
    Anthropic,
    Custom(String),
}

impl Provider {
    /// Parse a provider name as entered in the add-connection form.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.to_lowercase().as_str() {
            "openai" => Provider::OpenAi,
            "openrouter" => Provider::OpenRouter,
            "anthropic" => Provider::Anthropic,
            _ => Provider::Custom(capitalize(trimmed)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::OpenRouter => "OpenRouter",
            Provider::Anthropic => "Anthropic",
            Provider::Custom(name) => name,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Active,
    Error,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Active => "active",
            ConnectionStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConnectionUsage {
    pub tokens: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: String,
    pub provider: Provider,
    pub label: String,
    pub status: ConnectionStatus,
    pub last_tested_at: DateTime<Utc>,
    pub usage: ConnectionUsage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolRole {
    Admin,
    Member,
}

impl PoolRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolRole::Admin => "admin",
            PoolRole::Member => "member",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoolUsage {
    pub tokens: u64,
    pub tokens_limit: u64,
    pub cost: f64,
    pub cost_limit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub member_count: u32,
    pub role: PoolRole,
    pub usage: PoolUsage,
}

/// One historical request row of the usage table
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    pub date: NaiveDate,
    pub provider: Provider,
    pub model: String,
    pub tokens: u64,
    pub cost: f64,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Chat,
    Connection,
    Usage,
    Pool,
    Error,
}

impl ActivityKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ActivityKind::Chat => "💬",
            ActivityKind::Connection => "🔗",
            ActivityKind::Usage => "📊",
            ActivityKind::Pool => "👥",
            ActivityKind::Error => "⚠️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub message: String,
    pub time: String,
}

impl ActivityEvent {
    /// A freshly observed event, labelled "Just now".
    pub fn now(kind: ActivityKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            time: "Just now".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub model: Option<RoutingTarget>,
    pub timestamp: DateTime<Utc>,
}

/// Where chat requests are routed: automatic selection or a pinned model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingTarget {
    Auto,
    Model(String),
}

impl RoutingTarget {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            RoutingTarget::Auto
        } else {
            RoutingTarget::Model(trimmed.to_string())
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, RoutingTarget::Auto)
    }

    /// Label used in activity messages.
    pub fn activity_label(&self) -> &str {
        match self {
            RoutingTarget::Auto => "Auto-routed",
            RoutingTarget::Model(model) => model,
        }
    }
}

impl fmt::Display for RoutingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingTarget::Auto => f.write_str("auto"),
            RoutingTarget::Model(model) => f.write_str(model),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStrategy {
    #[default]
    Smart,
    Cost,
    Performance,
}

impl RoutingStrategy {
    pub const ALL: [RoutingStrategy; 3] = [
        RoutingStrategy::Smart,
        RoutingStrategy::Cost,
        RoutingStrategy::Performance,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            RoutingStrategy::Smart => "Smart",
            RoutingStrategy::Cost => "Cost optimized",
            RoutingStrategy::Performance => "Performance",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Router preferences edited on the settings view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    pub routing_strategy: RoutingStrategy,
    pub retry_attempts: u8,
    pub daily_token_limit: u64,
    pub monthly_cost_limit: f64,
    pub usage_alerts: bool,
    pub error_notifications: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            routing_strategy: RoutingStrategy::Smart,
            retry_attempts: 3,
            daily_token_limit: 100_000,
            monthly_cost_limit: 50.0,
            usage_alerts: true,
            error_notifications: true,
        }
    }
}

pub const MAX_RETRY_ATTEMPTS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsagePeriod {
    #[default]
    Week,
    Month,
    Quarter,
}

impl UsagePeriod {
    pub const ALL: [UsagePeriod; 3] = [UsagePeriod::Week, UsagePeriod::Month, UsagePeriod::Quarter];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "7d" | "7" | "week" => Some(UsagePeriod::Week),
            "30d" | "30" | "month" => Some(UsagePeriod::Month),
            "90d" | "90" | "quarter" => Some(UsagePeriod::Quarter),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UsagePeriod::Week => "Last 7 days",
            UsagePeriod::Month => "Last 30 days",
            UsagePeriod::Quarter => "Last 90 days",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}
