// src/app/state.rs

use {
    crate::{
        config::{COIN_METRICS, ChartKind},
        data::{CatalogIndex, LoadStep, SyncStatus},
        domain::{DateRange, MetricLabel, SeriesKey},
        utils::AxisScale,
    },
    serde::{Deserialize, Serialize},
    std::{
        collections::{BTreeMap, HashMap},
        time::{Duration, Instant},
    },
    strum::IntoEnumIterator,
};

#[derive(Clone)]
pub(crate) struct RunningState;

pub(crate) enum AppState {
    Bootstrapping(BootstrapState),
    Running(RunningState),
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Bootstrapping(BootstrapState::default())
    }
}

#[derive(Clone)]
pub(crate) struct BootstrapState {
    pub(crate) steps: BTreeMap<LoadStep, SyncStatus>,
    pub(crate) completed: usize,
    pub(crate) failed: usize,
}

impl Default for BootstrapState {
    fn default() -> Self {
        Self {
            steps: LoadStep::iter().map(|s| (s, SyncStatus::Pending)).collect(),
            completed: 0,
            failed: 0,
        }
    }
}

impl BootstrapState {
    pub(crate) fn apply(&mut self, step: LoadStep, status: SyncStatus) {
        self.steps.insert(step, status);
        self.completed = self
            .steps
            .values()
            .filter(|s| matches!(s, SyncStatus::Completed(_)))
            .count();
        self.failed = self
            .steps
            .values()
            .filter(|s| matches!(s, SyncStatus::Failed(_)))
            .count();
    }

    pub(crate) fn total(&self) -> usize {
        self.steps.len()
    }
}

/// What the user picked in the sidebar. Persists across sessions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub(crate) struct Selection {
    /// Asset display names, in the order they were picked
    pub(crate) asset_names: Vec<String>,
    pub(crate) metric_id: Option<String>,
    pub(crate) scale: AxisScale,
    pub(crate) chart_kind: ChartKind,
}

impl Selection {
    /// Drop names the catalogue no longer knows. If nothing survives, fall back to the first asset.
    pub(crate) fn restore(&mut self, index: &CatalogIndex) {
        self.asset_names.retain(|n| index.asset_by_name(n).is_some());
        if self.asset_names.is_empty() {
            if let Some(first) = index.asset_names().next() {
                self.asset_names.push(first.to_string());
            }
        }
    }

    pub(crate) fn is_selected(&self, name: &str) -> bool {
        self.asset_names.iter().any(|n| n == name)
    }

    pub(crate) fn toggle_asset(&mut self, name: &str) {
        if let Some(pos) = self.asset_names.iter().position(|n| n == name) {
            self.asset_names.remove(pos);
        } else {
            self.asset_names.push(name.to_string());
        }
    }

    /// Keep the metric if it is still offered, otherwise take the first choice.
    pub(crate) fn reconcile_metric(&mut self, choices: &[MetricLabel]) {
        let still_valid = self
            .metric_id
            .as_ref()
            .is_some_and(|id| choices.iter().any(|c| &c.id == id));
        if !still_valid {
            self.metric_id = choices.first().map(|c| c.id.clone());
        }
    }
}

/// Date slider state. Resets to the full span whenever the data's bounds change.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct DateWindow {
    bounds: Option<DateRange>,
    selected: Option<DateRange>,
}

impl DateWindow {
    /// Feed the current data bounds, get the range to filter by.
    pub(crate) fn sync(&mut self, bounds: DateRange) -> DateRange {
        if self.bounds != Some(bounds) {
            self.bounds = Some(bounds);
            self.selected = Some(bounds);
        }
        let selected = self.selected.unwrap_or(bounds).clamp_to(&bounds);
        self.selected = Some(selected);
        selected
    }

    pub(crate) fn set(&mut self, range: DateRange) {
        self.selected = Some(match self.bounds {
            Some(bounds) => range.clamp_to(&bounds),
            None => range,
        });
    }
}

/// Series whose last fetch failed, and when each may be requested again.
#[derive(Debug, Clone)]
pub(crate) struct RetryBook {
    base: Duration,
    max: Duration,
    /// (time of last failure, consecutive failures)
    failed: HashMap<SeriesKey, (Instant, u32)>,
}

impl Default for RetryBook {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(COIN_METRICS.limits.retry_base_ms),
            Duration::from_millis(COIN_METRICS.limits.retry_max_ms),
        )
    }
}

impl RetryBook {
    pub(crate) fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            failed: HashMap::new(),
        }
    }

    pub(crate) fn record_failure(&mut self, key: SeriesKey, now: Instant) {
        let failures = self.failed.get(&key).map_or(0, |(_, n)| *n) + 1;
        self.failed.insert(key, (now, failures));
    }

    pub(crate) fn record_success(&mut self, key: &SeriesKey) {
        self.failed.remove(key);
    }

    /// Wait after `failures` consecutive failures.
    pub(crate) fn backoff(&self, failures: u32) -> Duration {
        let doublings = failures.saturating_sub(1).min(16);
        self.base.saturating_mul(1 << doublings).min(self.max)
    }

    /// True for keys that never failed, or whose backoff has elapsed.
    pub(crate) fn is_due(&self, key: &SeriesKey, now: Instant) -> bool {
        match self.failed.get(key) {
            Some((at, failures)) => now.saturating_duration_since(*at) >= self.backoff(*failures),
            None => true,
        }
    }
}

/// Bottom bar contents.
#[derive(Debug, Clone, Default)]
pub(crate) struct StatusLine {
    pub(crate) last_source: Option<String>,
    pub(crate) last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AssetInfo;

    fn index() -> CatalogIndex {
        let asset = |id: &str, name: &str| AssetInfo {
            id: id.into(),
            name: name.into(),
            metrics: vec!["PriceUSD".into()],
            exchanges: vec![],
        };
        CatalogIndex::build(&[asset("eth", "Ethereum"), asset("btc", "Bitcoin")], &[], &[])
    }

    fn label(id: &str) -> MetricLabel {
        MetricLabel {
            id: id.into(),
            name: id.into(),
            description: String::new(),
        }
    }

    #[test]
    fn restore_defaults_to_first_asset() {
        let mut selection = Selection {
            asset_names: vec!["Dogecoin".into()],
            ..Default::default()
        };
        selection.restore(&index());
        assert_eq!(selection.asset_names, vec!["Bitcoin"]);
    }

    #[test]
    fn restore_keeps_known_assets() {
        let mut selection = Selection {
            asset_names: vec!["Ethereum".into(), "Dogecoin".into()],
            ..Default::default()
        };
        selection.restore(&index());
        assert_eq!(selection.asset_names, vec!["Ethereum"]);
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut selection = Selection::default();
        selection.toggle_asset("Bitcoin");
        selection.toggle_asset("Ethereum");
        assert!(selection.is_selected("Bitcoin"));
        selection.toggle_asset("Bitcoin");
        assert_eq!(selection.asset_names, vec!["Ethereum"]);
    }

    #[test]
    fn metric_falls_back_to_first_choice() {
        let mut selection = Selection {
            metric_id: Some("HashRate".into()),
            ..Default::default()
        };
        selection.reconcile_metric(&[label("PriceUSD"), label("TxCnt")]);
        assert_eq!(selection.metric_id.as_deref(), Some("PriceUSD"));

        selection.metric_id = Some("TxCnt".into());
        selection.reconcile_metric(&[label("PriceUSD"), label("TxCnt")]);
        assert_eq!(selection.metric_id.as_deref(), Some("TxCnt"));

        selection.reconcile_metric(&[]);
        assert_eq!(selection.metric_id, None);
    }

    #[test]
    fn date_window_resets_when_bounds_change() {
        use chrono::{TimeZone, Utc};
        let day = |d: u32| Utc.with_ymd_and_hms(2020, 1, d, 0, 0, 0).unwrap();
        let mut window = DateWindow::default();

        let full = DateRange::new(day(1), day(20));
        assert_eq!(window.sync(full), full);

        window.set(DateRange::new(day(5), day(10)));
        assert_eq!(window.sync(full), DateRange::new(day(5), day(10)));

        let wider = DateRange::new(day(1), day(31));
        assert_eq!(window.sync(wider), wider);
    }

    #[test]
    fn retry_backoff_doubles_up_to_max() {
        let book = RetryBook::new(Duration::from_secs(5), Duration::from_secs(30));
        assert_eq!(book.backoff(1), Duration::from_secs(5));
        assert_eq!(book.backoff(2), Duration::from_secs(10));
        assert_eq!(book.backoff(3), Duration::from_secs(20));
        assert_eq!(book.backoff(4), Duration::from_secs(30));
        assert_eq!(book.backoff(40), Duration::from_secs(30));
    }

    #[test]
    fn failed_series_becomes_due_after_backoff() {
        let mut book = RetryBook::new(Duration::from_secs(5), Duration::from_secs(60));
        let key = SeriesKey::single("btc", "PriceUSD");
        let t0 = Instant::now();
        assert!(book.is_due(&key, t0));

        book.record_failure(key.clone(), t0);
        assert!(!book.is_due(&key, t0 + Duration::from_secs(4)));
        assert!(book.is_due(&key, t0 + Duration::from_secs(5)));

        book.record_failure(key.clone(), t0 + Duration::from_secs(5));
        assert!(!book.is_due(&key, t0 + Duration::from_secs(14)));
        assert!(book.is_due(&key, t0 + Duration::from_secs(15)));

        book.record_success(&key);
        assert!(book.is_due(&key, t0));
    }

    #[test]
    fn bootstrap_counts_outcomes() {
        let mut state = BootstrapState::default();
        assert_eq!(state.total(), 3);
        state.apply(LoadStep::AssetInfo, SyncStatus::Completed(10));
        state.apply(LoadStep::MetricInfo, SyncStatus::Failed("boom".into()));
        assert_eq!((state.completed, state.failed), (1, 1));
    }
}
