use chrono::{DateTime, Utc};

use super::charts::{usage_by_day, usage_by_provider, DailyTokens, ProviderShare};
use super::format::{dollars, tokens_k};
use crate::domain::ConnectionStatus;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardDisplay {
    pub user_name: String,
    pub active_connections: usize,
    pub pool_memberships: usize,
    /// Connection costs plus pool costs
    pub total_cost: f64,
    /// Connection tokens plus pool tokens
    pub total_tokens: u64,
    pub monthly_cost: String,
    pub tokens_used: String,
    pub usage_trend: Vec<DailyTokens>,
    pub provider_split: Vec<ProviderShare>,
}

pub fn dashboard(state: &AppState, now: DateTime<Utc>) -> DashboardDisplay {
    let active_connections = state
        .connections
        .iter()
        .filter(|c| c.status == ConnectionStatus::Active)
        .count();

    let total_cost = state.connections.iter().map(|c| c.usage.cost).sum::<f64>()
        + state.pools.iter().map(|p| p.usage.cost).sum::<f64>();
    let total_tokens = state.connections.iter().map(|c| c.usage.tokens).sum::<u64>()
        + state.pools.iter().map(|p| p.usage.tokens).sum::<u64>();

    DashboardDisplay {
        user_name: state.user.name.clone(),
        active_connections,
        pool_memberships: state.pools.len(),
        total_cost,
        total_tokens,
        monthly_cost: dollars(total_cost),
        tokens_used: tokens_k(total_tokens),
        usage_trend: usage_by_day(&state.usage_history, now.date_naive()),
        provider_split: usage_by_provider(&state.usage_history),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::mock_state;

    #[test]
    fn test_dashboard_aggregates() {
        let now = Utc::now();
        let display = dashboard(&mock_state(now), now);
        assert_eq!(display.active_connections, 2);
        assert_eq!(display.pool_memberships, 2);
        assert_eq!(display.total_tokens, 45_230 + 23_400 + 125_200 + 89_500);
        assert_eq!(display.tokens_used, "283.3K");
        assert_eq!(display.monthly_cost, "$121.30");
        assert_eq!(display.usage_trend.len(), 7);
    }
}
