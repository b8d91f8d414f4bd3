//! Mock dataset loaded at startup

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::model::{
    ActivityEvent, ActivityKind, ChatMessage, ChatRole, Connection, ConnectionStatus,
    ConnectionUsage, Pool, PoolRole, PoolUsage, Provider, UsageRecord, User,
};
use crate::state::AppState;

pub const GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";

fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).unwrap_or_default()
}

fn at(year: i32, month: u32, date: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    day(year, month, date)
        .and_hms_opt(hour, minute, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn usage(
    date: NaiveDate,
    provider: Provider,
    model: &str,
    tokens: u64,
    cost: f64,
    latency_ms: u64,
) -> UsageRecord {
    UsageRecord {
        date,
        provider,
        model: model.to_string(),
        tokens,
        cost,
        latency_ms,
    }
}

fn activity(kind: ActivityKind, message: &str, time: &str) -> ActivityEvent {
    ActivityEvent {
        kind,
        message: message.to_string(),
        time: time.to_string(),
    }
}

/// Build the mock state; `now` anchors the chat greeting timestamp.
pub fn mock_state(now: DateTime<Utc>) -> AppState {
    let mut state = AppState::empty(User {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
    });

    state.connections = vec![
        Connection {
            id: "conn-1".to_string(),
            provider: Provider::OpenAi,
            label: "My OpenAI API".to_string(),
            status: ConnectionStatus::Active,
            last_tested_at: at(2025, 8, 24, 6, 30),
            usage: ConnectionUsage {
                tokens: 45_230,
                cost: 12.45,
            },
        },
        Connection {
            id: "conn-2".to_string(),
            provider: Provider::OpenRouter,
            label: "Backup Router".to_string(),
            status: ConnectionStatus::Active,
            last_tested_at: at(2025, 8, 24, 5, 15),
            usage: ConnectionUsage {
                tokens: 23_400,
                cost: 8.90,
            },
        },
        Connection {
            id: "conn-3".to_string(),
            provider: Provider::Anthropic,
            label: "Claude API".to_string(),
            status: ConnectionStatus::Error,
            last_tested_at: at(2025, 8, 23, 14, 22),
            usage: ConnectionUsage::default(),
        },
    ];

    state.pools = vec![
        Pool {
            id: "pool-1".to_string(),
            name: "Study Group".to_string(),
            description: "Shared AI resources for our CS study group".to_string(),
            member_count: 5,
            role: PoolRole::Admin,
            usage: PoolUsage {
                tokens: 125_200,
                tokens_limit: 200_000,
                cost: 32.15,
                cost_limit: 50.00,
            },
        },
        Pool {
            id: "pool-2".to_string(),
            name: "Work Team".to_string(),
            description: "AI tools for project development".to_string(),
            member_count: 8,
            role: PoolRole::Member,
            usage: PoolUsage {
                tokens: 89_500,
                tokens_limit: 150_000,
                cost: 67.80,
                cost_limit: 100.00,
            },
        },
    ];

    state.usage_history = vec![
        usage(day(2025, 8, 18), Provider::OpenAi, "gpt-4", 2500, 0.05, 1200),
        usage(day(2025, 8, 19), Provider::OpenRouter, "claude-3-opus", 3200, 0.08, 890),
        usage(day(2025, 8, 20), Provider::OpenAi, "gpt-3.5-turbo", 1800, 0.002, 650),
        usage(day(2025, 8, 21), Provider::OpenAi, "gpt-4", 4100, 0.082, 1450),
        usage(day(2025, 8, 22), Provider::OpenRouter, "gemini-pro", 2900, 0.035, 980),
        usage(day(2025, 8, 23), Provider::OpenAi, "gpt-4", 3600, 0.072, 1100),
        usage(day(2025, 8, 24), Provider::OpenRouter, "claude-3-opus", 2100, 0.052, 750),
    ];

    state.chat = vec![ChatMessage {
        role: ChatRole::Assistant,
        content: GREETING.to_string(),
        model: None,
        timestamp: now - Duration::hours(1),
    }];

    state.activity = vec![
        activity(ActivityKind::Chat, "Chat completion via OpenAI GPT-4", "5 minutes ago"),
        activity(
            ActivityKind::Connection,
            "Connection test successful for OpenRouter",
            "12 minutes ago",
        ),
        activity(
            ActivityKind::Usage,
            "Daily usage limit reached for Study Group pool",
            "2 hours ago",
        ),
        activity(ActivityKind::Pool, "New member joined Work Team pool", "4 hours ago"),
        activity(ActivityKind::Error, "Connection failed for Anthropic API", "6 hours ago"),
    ];

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_state_shape() {
        let state = mock_state(Utc::now());
        assert_eq!(state.connections.len(), 3);
        assert_eq!(state.pools.len(), 2);
        assert_eq!(state.usage_history.len(), 7);
        assert_eq!(state.activity.len(), 5);
        assert_eq!(state.chat.len(), 1);
        assert_eq!(state.connections[0].last_tested_at.to_rfc3339(), "2025-08-24T06:30:00+00:00");
    }
}
