use {
    crate::utils::{format_api_date, from_plot_days, to_plot_days},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// Inclusive time window `[start, end]`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Endpoints are swapped if given in the wrong order.
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn contains(&self, t: &DateTime<Utc>) -> bool {
        self.start <= *t && *t <= self.end
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shrink `self` so it lies within `bounds`. A window entirely outside falls back to `bounds`.
    pub fn clamp_to(&self, bounds: &Self) -> Self {
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(bounds.start, bounds.end);
        if start == end && !(bounds.contains(&self.start) || bounds.contains(&self.end)) {
            return *bounds;
        }
        Self::new(start, end)
    }

    pub fn plot_days(&self) -> (f64, f64) {
        (to_plot_days(&self.start), to_plot_days(&self.end))
    }

    /// Build from slider values expressed in plot days.
    pub fn from_plot_days(start: f64, end: f64) -> Option<Self> {
        Some(Self::new(from_plot_days(start)?, from_plot_days(end)?))
    }

    pub fn label(&self) -> String {
        format!(
            "{} → {}",
            format_api_date(&self.start),
            format_api_date(&self.end)
        )
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
