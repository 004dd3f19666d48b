mod maths_utils;
mod perf;
mod scale;
mod time_utils;

pub use scale::{AxisScale, format_compact};
pub use time_utils::{
    TimeUtils, format_api_date, format_duration, from_plot_days,
    how_many_seconds_ago, month_label, now_timestamp_ms, parse_api_time,
    plot_days_to_date_string, to_plot_days, year_month,
};

pub(crate) use maths_utils::{mean, normalize_between, pearson, value_range};
