use chrono::{DateTime, Datelike, NaiveDate, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const S_IN_D: i64 = 60 * 60 * 24;
    pub const MS_IN_D: i64 = Self::MS_IN_S * Self::S_IN_D;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
    pub const MONTH_LABELS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
}

// Time Helper functions

/// Parse the API's `time` field, e.g. `2021-01-01T00:00:00.000Z`.
pub fn parse_api_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // Plain dates are accepted for user-supplied start/end values
    NaiveDate::parse_from_str(text, TimeUtils::STANDARD_TIME_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a timestamp the way the API accepts `start` / `end` params.
pub fn format_api_date(dt: &DateTime<Utc>) -> String {
    dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}

/// Charts use fractional days since the epoch on the x axis.
pub fn to_plot_days(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 / TimeUtils::S_IN_D as f64
}

pub fn from_plot_days(days: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp((days * TimeUtils::S_IN_D as f64).round() as i64, 0)
}

pub fn plot_days_to_date_string(days: f64) -> String {
    from_plot_days(days)
        .map(|dt| format_api_date(&dt))
        .unwrap_or_default()
}

pub fn month_label(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| TimeUtils::MONTH_LABELS.get(idx as usize))
        .copied()
        .unwrap_or("?")
}

pub fn year_month(dt: &DateTime<Utc>) -> (i32, u32) {
    (dt.year(), dt.month())
}

pub fn now_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn how_many_seconds_ago(past_timestamp_ms: i64) -> i64 {
    (now_timestamp_ms() - past_timestamp_ms) / TimeUtils::MS_IN_S
}

pub fn format_duration(ms: i64) -> String {
    let secs = ms / 1000;
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m", mins);
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }
    let months = days / 30;
    if months < 12 {
        return format!("{}M", months);
    }
    let years = months / 12;
    let rem_months = months % 12;
    format!("{}Y {}M", years, rem_months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_api_timestamps_with_millis() {
        let dt = parse_api_time("2020-03-01T00:00:00.000Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_plain_dates() {
        let dt = parse_api_time("2019-12-31").unwrap();
        assert_eq!(format_api_date(&dt), "2019-12-31");
        assert!(parse_api_time("yesterday").is_none());
    }

    #[test]
    fn plot_days_round_trip_whole_days() {
        let dt = Utc.with_ymd_and_hms(2021, 6, 15, 0, 0, 0).unwrap();
        assert_eq!(from_plot_days(to_plot_days(&dt)), Some(dt));
        assert_eq!(plot_days_to_date_string(to_plot_days(&dt)), "2021-06-15");
    }

    #[test]
    fn month_labels_are_one_based() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(12), "Dec");
        assert_eq!(month_label(0), "?");
        assert_eq!(month_label(13), "?");
    }

    #[test]
    fn durations_pick_largest_unit() {
        assert_eq!(format_duration(45_000), "45s");
        assert_eq!(format_duration(3 * 60 * 60 * 1000), "3h");
        assert_eq!(format_duration(400 * TimeUtils::MS_IN_D), "1Y 1M");
    }
}
