use chrono::{DateTime, Utc};

use super::format::{dollars, relative_date, thousands, tokens_k};
use crate::domain::{PoolRole, UsagePeriod};
use crate::state::AppState;

// TODO: derive both figures from per-request records once usage rows carry a
// connection id and a pool member id; until then they are fixed placeholders.
/// Placeholder API call count for the personal usage card
pub const PLACEHOLDER_CALLS: u64 = 234;
/// Placeholder share of each pool attributed to the current user
pub const PLACEHOLDER_CONTRIBUTION_PERCENT: f64 = 25.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalUsage {
    pub calls: u64,
    pub tokens: u64,
    pub cost: f64,
    pub tokens_label: String,
    pub cost_label: String,
    /// `calls` is not derived from real data
    pub calls_placeholder: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolContribution {
    pub name: String,
    pub role: PoolRole,
    pub contribution_percent: f64,
    /// `contribution_percent` is not derived from real data
    pub contribution_placeholder: bool,
    pub tokens: String,
    pub cost: String,
}

impl PoolContribution {
    pub fn contribution_label(&self) -> String {
        format!("{}%", self.contribution_percent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRow {
    pub date: String,
    pub provider: String,
    pub model: String,
    pub tokens: String,
    pub cost: String,
    pub latency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsageDisplay {
    pub period: UsagePeriod,
    pub personal: PersonalUsage,
    pub pools: Vec<PoolContribution>,
    pub rows: Vec<UsageRow>,
}

pub fn usage(state: &AppState, now: DateTime<Utc>) -> UsageDisplay {
    let tokens = state.connections.iter().map(|c| c.usage.tokens).sum::<u64>();
    let cost = state.connections.iter().map(|c| c.usage.cost).sum::<f64>();

    let personal = PersonalUsage {
        calls: PLACEHOLDER_CALLS,
        tokens,
        cost,
        tokens_label: tokens_k(tokens),
        cost_label: dollars(cost),
        calls_placeholder: true,
    };

    let pools = state
        .pools
        .iter()
        .map(|pool| PoolContribution {
            name: pool.name.clone(),
            role: pool.role,
            contribution_percent: PLACEHOLDER_CONTRIBUTION_PERCENT,
            contribution_placeholder: true,
            tokens: tokens_k(pool.usage.tokens),
            cost: dollars(pool.usage.cost),
        })
        .collect();

    let rows = state
        .usage_history
        .iter()
        .map(|record| UsageRow {
            date: relative_date(record.date, now),
            provider: record.provider.to_string(),
            model: record.model.clone(),
            tokens: thousands(record.tokens),
            cost: format!("${:.3}", record.cost),
            latency: format!("{}ms", record.latency_ms),
        })
        .collect();

    UsageDisplay {
        period: state.usage_period,
        personal,
        pools,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::mock_state;

    #[test]
    fn test_personal_usage_sums_connections() {
        let now = Utc::now();
        let display = usage(&mock_state(now), now);
        assert_eq!(display.personal.calls, 234);
        assert!(display.personal.calls_placeholder);
        assert_eq!(display.personal.tokens, 45_230 + 23_400);
        assert_eq!(display.personal.cost_label, "$21.35");
        assert_eq!(display.pools.len(), 2);
        assert_eq!(display.pools[0].contribution_label(), "25%");
    }

    #[test]
    fn test_usage_rows() {
        let now = DateTime::<Utc>::from_timestamp(1_756_017_000, 0).unwrap();
        let display = usage(&mock_state(now), now);
        let last = display.rows.last().unwrap();
        assert_eq!(last.date, "6h ago");
        assert_eq!(last.provider, "OpenRouter");
        assert_eq!(last.tokens, "2,100");
        assert_eq!(last.cost, "$0.052");
        assert_eq!(last.latency, "750ms");
        assert_eq!(display.rows[0].date, "6d ago");
    }
}
