//! Display formatting shared by the projections

use chrono::{DateTime, NaiveDate, Utc};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Relative description of `at` as seen from `now`.
///
/// Under a minute (or in the future) is "Just now", then minutes, then hours.
/// An elapsed time of exactly one day is "Yesterday"; other spans of one to
/// six whole days are "{d}d ago". A week or more falls back to an en-US date.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (now - at).num_milliseconds();
    if diff_ms < 0 {
        return "Just now".to_string();
    }

    let days = diff_ms / DAY_MS;
    if days == 0 {
        let hours = diff_ms / HOUR_MS;
        if hours == 0 {
            let minutes = diff_ms / MINUTE_MS;
            return if minutes <= 0 {
                "Just now".to_string()
            } else {
                format!("{minutes}m ago")
            };
        }
        return format!("{hours}h ago");
    }

    if diff_ms == DAY_MS {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        locale_date(at.date_naive())
    }
}

/// Relative description of a calendar day, taken at midnight UTC.
pub fn relative_date(date: NaiveDate, now: DateTime<Utc>) -> String {
    match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => relative_time(midnight.and_utc(), now),
        None => locale_date(date),
    }
}

/// en-US short date, e.g. `8/24/2025`.
pub fn locale_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Tokens in thousands with one decimal, e.g. `45.2K`.
pub fn tokens_k(tokens: u64) -> String {
    format!("{:.1}K", tokens as f64 / 1000.0)
}

pub fn dollars(cost: f64) -> String {
    format!("${cost:.2}")
}

/// Integer with comma thousands separators, e.g. `12,500`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Percentage rounded to one decimal place.
pub fn round1(value: f64) -> f64 {
    if value.is_finite() {
        (value * 10.0).round() / 10.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_756_000_000, 0).unwrap()
    }

    #[test]
    fn test_relative_time_minutes_and_hours() {
        let now = now();
        assert_eq!(relative_time(now, now), "Just now");
        assert_eq!(relative_time(now - Duration::seconds(59), now), "Just now");
        assert_eq!(relative_time(now - Duration::seconds(90), now), "1m ago");
        assert_eq!(relative_time(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(relative_time(now - Duration::minutes(60), now), "1h ago");
        assert_eq!(relative_time(now - Duration::hours(23), now), "23h ago");
    }

    #[test]
    fn test_relative_time_days() {
        let now = now();
        assert_eq!(relative_time(now - Duration::hours(24), now), "Yesterday");
        assert_eq!(relative_time(now - Duration::hours(25), now), "1d ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2d ago");
        assert_eq!(relative_time(now - Duration::days(6), now), "6d ago");
    }

    #[test]
    fn test_relative_time_falls_back_to_date() {
        let now = now();
        let week_ago = now - Duration::days(7);
        assert_eq!(relative_time(week_ago, now), locale_date(week_ago.date_naive()));
        let date = NaiveDate::from_ymd_opt(2025, 8, 4).unwrap();
        assert_eq!(locale_date(date), "8/4/2025");
    }

    #[test]
    fn test_future_is_just_now() {
        let now = now();
        assert_eq!(relative_time(now + Duration::minutes(5), now), "Just now");
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(tokens_k(45_230), "45.2K");
        assert_eq!(tokens_k(0), "0.0K");
        assert_eq!(dollars(8.9), "$8.90");
        assert_eq!(thousands(2500), "2,500");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(round1(62.599_999_999_999_994), 62.6);
    }
}
