use super::format::{round1, tokens_k};
use crate::domain::PoolRole;
use crate::state::AppState;

/// Utilization above this percentage is flagged
pub const WARNING_PERCENT: f64 = 80.0;

/// `usage / limit * 100`, unclamped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utilization {
    pub raw: f64,
    /// `raw` rounded to one decimal
    pub percent: f64,
    pub warning: bool,
}

impl Utilization {
    pub fn label(&self) -> String {
        if self.raw.is_finite() {
            format!("{:.1}%", self.raw)
        } else {
            "∞%".to_string()
        }
    }

    /// Fill ratio for a progress bar, capped at 1.0.
    pub fn bar_ratio(&self) -> f64 {
        if self.raw.is_finite() {
            (self.raw / 100.0).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// A zero limit reads as 0% when nothing is used and unbounded otherwise.
pub fn utilization(usage: f64, limit: f64) -> Utilization {
    let raw = if limit > 0.0 {
        usage / limit * 100.0
    } else if usage > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };
    Utilization {
        raw,
        percent: round1(raw),
        warning: raw > WARNING_PERCENT,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub role: PoolRole,
    pub members: u32,
    pub tokens: String,
    pub token_usage: Utilization,
    pub cost_usage: Utilization,
    /// Admins get the manage action
    pub can_manage: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoolsDisplay {
    pub cards: Vec<PoolCard>,
}

pub fn pools(state: &AppState) -> PoolsDisplay {
    PoolsDisplay {
        cards: state
            .pools
            .iter()
            .map(|pool| PoolCard {
                id: pool.id.clone(),
                name: pool.name.clone(),
                description: pool.description.clone(),
                role: pool.role,
                members: pool.member_count,
                tokens: tokens_k(pool.usage.tokens),
                token_usage: utilization(pool.usage.tokens as f64, pool.usage.tokens_limit as f64),
                cost_usage: utilization(pool.usage.cost, pool.usage.cost_limit),
                can_manage: pool.role == PoolRole::Admin,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::mock_state;
    use chrono::Utc;

    #[test]
    fn test_utilization_examples() {
        let under = utilization(125_200.0, 200_000.0);
        assert_eq!(under.percent, 62.6);
        assert!(!under.warning);
        assert_eq!(under.label(), "62.6%");

        let over = utilization(180_000.0, 200_000.0);
        assert_eq!(over.percent, 90.0);
        assert!(over.warning);
    }

    #[test]
    fn test_utilization_is_unclamped() {
        let value = utilization(300.0, 200.0);
        assert_eq!(value.percent, 150.0);
        assert!(value.warning);
        assert_eq!(value.bar_ratio(), 1.0);
    }

    #[test]
    fn test_warning_is_strictly_above_threshold() {
        assert!(!utilization(80.0, 100.0).warning);
        assert!(utilization(80.01, 100.0).warning);
    }

    #[test]
    fn test_zero_limit() {
        assert_eq!(utilization(0.0, 0.0).percent, 0.0);
        let unbounded = utilization(5.0, 0.0);
        assert!(unbounded.raw.is_infinite());
        assert!(unbounded.warning);
    }

    #[test]
    fn test_pool_cards() {
        let display = pools(&mock_state(Utc::now()));
        assert_eq!(display.cards.len(), 2);
        let study = &display.cards[0];
        assert_eq!(study.token_usage.percent, 62.6);
        assert!(study.can_manage);
        let work = &display.cards[1];
        assert_eq!(work.cost_usage.percent, 67.8);
        assert!(!work.can_manage);
    }
}
