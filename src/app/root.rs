use {
    eframe::{
        Frame, Storage,
        egui::{Context, Visuals},
    },
    serde::{Deserialize, Serialize},
    std::{
        collections::HashMap,
        mem,
        sync::mpsc::Receiver,
        time::Instant,
    },
};

use crate::{
    Cli,
    app::{
        AppState, BootstrapState, DateWindow, PhaseView, RetryBook, RunningState, Selection,
        StatusLine,
    },
    data::{
        AssetSeries, Catalog, DataService, MetricTable, ProgressEvent, SeriesWorker,
        spawn_catalog_loader,
    },
    domain::{AssetEntry, MetricLabel, SeriesKey},
    ui::{UI_CONFIG, render_bootstrap},
};

#[cfg(debug_assertions)]
use crate::config::DF;

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct App {
    pub(crate) selection: Selection, // persists across sessions.
    #[serde(skip)]
    pub(crate) asset_filter: String,
    #[serde(skip)]
    pub(crate) catalog: Option<Catalog>,
    #[serde(skip)]
    pub(crate) series: HashMap<SeriesKey, MetricTable>,
    #[serde(skip)]
    pub(crate) date_window: DateWindow,
    #[serde(skip)]
    pub(crate) status: StatusLine,
    #[serde(skip)]
    retries: RetryBook,
    #[serde(skip)]
    worker: Option<SeriesWorker>,
    #[serde(skip)]
    state: AppState,
    #[serde(skip)]
    progress_rx: Option<Receiver<ProgressEvent>>,
    #[serde(skip)]
    catalog_rx: Option<Receiver<Catalog>>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            asset_filter: String::new(),
            catalog: None,
            series: HashMap::new(),
            date_window: DateWindow::default(),
            status: StatusLine::default(),
            retries: RetryBook::default(),
            worker: None,
            state: AppState::default(),
            progress_rx: None,
            catalog_rx: None,
        }
    }
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> anyhow::Result<Self> {
        let mut app: App = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Self::default()
        };

        let service = DataService::from_cli(&args)?;
        let ctx = cc.egui_ctx.clone();

        let (progress_rx, catalog_rx) = spawn_catalog_loader(service.clone(), Some(ctx.clone()));
        app.progress_rx = Some(progress_rx);
        app.catalog_rx = Some(catalog_rx);
        app.worker = Some(SeriesWorker::spawn(service, Some(ctx)));
        app.state = AppState::Bootstrapping(BootstrapState::default());

        Ok(app)
    }

    pub(crate) fn tick_bootstrap_state(
        &mut self,
        ctx: &Context,
        state: &mut BootstrapState,
    ) -> AppState {
        self.update_loading_progress(state);
        if let Some(next_state) = self.finalize_bootstrap_if_ready() {
            return next_state;
        }
        render_bootstrap(ctx, state);
        AppState::Bootstrapping(state.clone())
    }

    fn update_loading_progress(&mut self, state: &mut BootstrapState) {
        if let Some(rx) = &self.progress_rx {
            while let Ok(event) = rx.try_recv() {
                state.apply(event.step, event.status);
            }
        }
    }

    fn finalize_bootstrap_if_ready(&mut self) -> Option<AppState> {
        let catalog = self.catalog_rx.as_ref()?.try_recv().ok()?;

        if let Some(first_error) = catalog.errors.first() {
            self.status.last_error = Some(first_error.clone());
        }
        self.status.last_source = catalog
            .sources
            .first()
            .map(|(_, source)| source.to_string());

        self.selection.restore(&catalog.index);
        #[cfg(debug_assertions)]
        if DF.log_selection {
            log::info!("Selection restored: {:?}", self.selection);
        }

        self.catalog = Some(catalog);
        self.progress_rx = None;
        self.catalog_rx = None;
        Some(AppState::Running(RunningState))
    }

    /// RUNNING PHASE MAIN LOOP
    pub(crate) fn tick_running_state(&mut self, ctx: &Context) {
        self.collect_series_responses();
        self.render_top_panel(ctx);
        self.render_left_panel(ctx);
        self.render_status_panel(ctx);
        crate::trace_time!("Central panel", 20_000, {
            self.render_central_panel(ctx);
        });
    }

    fn collect_series_responses(&mut self) {
        let Some(worker) = &mut self.worker else {
            return;
        };
        for response in worker.poll() {
            match response.result {
                Ok(fetched) => {
                    self.status.last_source = Some(fetched.source.to_string());
                    self.retries.record_success(&response.key);
                    self.series.insert(response.key, fetched.value);
                }
                Err(e) => {
                    self.status.last_error = Some(format!("{}: {}", response.key, e));
                    self.retries.record_failure(response.key, Instant::now());
                }
            }
        }
    }

    pub(crate) fn selected_assets(&self) -> Vec<AssetEntry> {
        let Some(catalog) = &self.catalog else {
            return Vec::new();
        };
        catalog
            .index
            .resolve_assets(&self.selection.asset_names)
            .into_iter()
            .cloned()
            .collect()
    }

    pub(crate) fn metric_choices(&self, assets: &[AssetEntry]) -> Vec<MetricLabel> {
        let Some(catalog) = &self.catalog else {
            return Vec::new();
        };
        let refs: Vec<&AssetEntry> = assets.iter().collect();
        catalog.index.metric_choices(&refs)
    }

    pub(crate) fn metric_label(&self, id: &str) -> Option<MetricLabel> {
        self.catalog.as_ref().map(|c| c.index.metric_label(id))
    }

    pub(crate) fn exchanges_for(&self, asset_id: &str) -> &[String] {
        match &self.catalog {
            Some(catalog) => catalog.index.exchanges_for(asset_id),
            None => &[],
        }
    }

    /// Loaded series for `assets`, in selection order. Missing ones are requested from the worker.
    /// A series whose fetch failed shows as an empty table until its retry backoff elapses.
    pub(crate) fn series_for(&mut self, assets: &[AssetEntry], metric: &str) -> (Vec<AssetSeries>, usize) {
        let now = Instant::now();
        let mut loaded = Vec::with_capacity(assets.len());
        let mut waiting = 0;
        for asset in assets {
            let key = SeriesKey::single(&asset.id, metric);
            if let Some(table) = self.series.get(&key) {
                loaded.push(AssetSeries::new(&asset.name, &asset.id, metric, table.clone()));
                continue;
            }
            if !self.retries.is_due(&key, now) {
                let empty = MetricTable::with_metrics(&key.metrics);
                loaded.push(AssetSeries::new(&asset.name, &asset.id, metric, empty));
                continue;
            }
            waiting += 1;
            if let Some(worker) = &mut self.worker {
                worker.request(key);
            }
        }
        (loaded, waiting)
    }

    pub(crate) fn pending_requests(&self) -> usize {
        self.worker.as_ref().map_or(0, SeriesWorker::pending)
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);
        let current = mem::take(&mut self.state);
        self.state = match current {
            AppState::Bootstrapping(mut s) => s.tick(self, ctx),
            AppState::Running(mut s) => s.tick(self, ctx),
        };
    }

    fn save(&mut self, storage: &mut dyn Storage) {
        #[cfg(debug_assertions)]
        if DF.log_selection {
            log::info!("💾 SAVE [App]: Selection = {:?}", self.selection);
        }
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}

fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();
    visuals.window_fill = UI_CONFIG.colors.central_panel;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;
    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;
    ctx.set_visuals(visuals);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FetchPolicy, StubProvider, service_with};
    use std::{
        sync::{Arc, atomic::Ordering},
        thread,
        time::Duration,
    };

    #[test]
    fn failed_series_is_fetched_again_after_backoff() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubProvider::flaky(1));
        let service = service_with(stub.clone(), &dir, FetchPolicy::ApiFirst);
        let mut app = App {
            worker: Some(SeriesWorker::spawn(service, None)),
            retries: RetryBook::new(Duration::from_millis(20), Duration::from_millis(100)),
            ..Default::default()
        };
        let assets = vec![AssetEntry {
            name: "Bitcoin".into(),
            id: "btc".into(),
            metrics: vec!["PriceUSD".into()],
        }];

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut rows = 0;
        while rows == 0 && Instant::now() < deadline {
            app.collect_series_responses();
            let (loaded, _) = app.series_for(&assets, "PriceUSD");
            rows = loaded.first().map_or(0, |s| s.table.len());
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(rows, 2);
        assert!(stub.calls.load(Ordering::SeqCst) >= 2);
        assert!(app.status.last_error.is_some());
    }

    #[test]
    fn failed_series_shows_empty_until_due() {
        let mut app = App::default();
        let key = SeriesKey::single("btc", "PriceUSD");
        app.retries.record_failure(key, Instant::now());
        let assets = vec![AssetEntry {
            name: "Bitcoin".into(),
            id: "btc".into(),
            metrics: vec!["PriceUSD".into()],
        }];

        let (loaded, waiting) = app.series_for(&assets, "PriceUSD");
        assert_eq!(waiting, 0);
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].table.is_empty());
    }
}
