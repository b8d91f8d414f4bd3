//! Chart series derived from the usage history

use chrono::{Days, NaiveDate};

use crate::domain::UsageRecord;

/// Number of days on the usage trend chart, ending today
pub const TREND_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTokens {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon"
    pub label: String,
    pub tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderShare {
    pub provider: String,
    pub tokens: u64,
}

/// Tokens per day for the [`TREND_DAYS`] days ending on `today`, oldest first.
pub fn usage_by_day(history: &[UsageRecord], today: NaiveDate) -> Vec<DailyTokens> {
    (0..TREND_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| DailyTokens {
            date,
            label: date.format("%a").to_string(),
            tokens: history
                .iter()
                .filter(|record| record.date == date)
                .map(|record| record.tokens)
                .sum(),
        })
        .collect()
}

/// Total tokens per provider, in the order providers first appear.
pub fn usage_by_provider(history: &[UsageRecord]) -> Vec<ProviderShare> {
    let mut shares: Vec<ProviderShare> = Vec::new();
    for record in history {
        let name = record.provider.name();
        match shares.iter_mut().find(|share| share.provider == name) {
            Some(share) => share.tokens += record.tokens,
            None => shares.push(ProviderShare {
                provider: name.to_string(),
                tokens: record.tokens,
            }),
        }
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::mock_state;
    use chrono::Utc;

    #[test]
    fn test_usage_by_day_window() {
        let state = mock_state(Utc::now());
        let today = NaiveDate::from_ymd_opt(2025, 8, 24).unwrap();
        let series = usage_by_day(&state.usage_history, today);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2025, 8, 18).unwrap());
        assert_eq!(series[0].label, "Mon");
        assert_eq!(series[0].tokens, 2500);
        assert_eq!(series[6].tokens, 2100);
    }

    #[test]
    fn test_usage_by_day_without_data_is_flat() {
        let state = mock_state(Utc::now());
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let series = usage_by_day(&state.usage_history, today);
        assert!(series.iter().all(|day| day.tokens == 0));
    }

    #[test]
    fn test_usage_by_provider_first_seen_order() {
        let state = mock_state(Utc::now());
        let shares = usage_by_provider(&state.usage_history);
        assert_eq!(
            shares,
            vec![
                ProviderShare {
                    provider: "OpenAI".to_string(),
                    tokens: 2500 + 1800 + 4100 + 3600,
                },
                ProviderShare {
                    provider: "OpenRouter".to_string(),
                    tokens: 3200 + 2900 + 2100,
                },
            ]
        );
    }
}
