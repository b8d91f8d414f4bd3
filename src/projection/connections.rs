use chrono::{DateTime, Utc};

use super::format::{dollars, relative_time, tokens_k};
use crate::domain::ConnectionStatus;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionCard {
    pub id: String,
    pub label: String,
    pub provider: String,
    pub status: ConnectionStatus,
    pub tokens: String,
    pub cost: String,
    pub last_tested: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionsDisplay {
    pub cards: Vec<ConnectionCard>,
}

pub fn connections(state: &AppState, now: DateTime<Utc>) -> ConnectionsDisplay {
    ConnectionsDisplay {
        cards: state
            .connections
            .iter()
            .map(|conn| ConnectionCard {
                id: conn.id.clone(),
                label: conn.label.clone(),
                provider: conn.provider.to_string(),
                status: conn.status,
                tokens: tokens_k(conn.usage.tokens),
                cost: dollars(conn.usage.cost),
                last_tested: relative_time(conn.last_tested_at, now),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::mock_state;
    use chrono::Duration;

    #[test]
    fn test_connection_cards() {
        // 2025-08-24T06:30:00Z
        let now = DateTime::<Utc>::from_timestamp(1_756_017_000, 0).unwrap();
        let mut state = mock_state(now);
        state.connections[0].last_tested_at = now - Duration::minutes(5);

        let display = connections(&state, now);
        assert_eq!(display.cards.len(), 3);
        let first = &display.cards[0];
        assert_eq!(first.label, "My OpenAI API");
        assert_eq!(first.provider, "OpenAI");
        assert_eq!(first.tokens, "45.2K");
        assert_eq!(first.cost, "$12.45");
        assert_eq!(first.last_tested, "5m ago");
        assert_eq!(display.cards[2].status, ConnectionStatus::Error);
    }
}
