// Background fetching: catalogue at startup, time series on demand.

use {
    crate::{
        client::{AssetInfo, ExchangeInfo, MetricInfo},
        config::COIN_METRICS,
        data::{CatalogIndex, DataService, DataSource, Fetched, MetricTable},
        domain::SeriesKey,
    },
    eframe::egui::Context,
    std::{
        collections::HashSet,
        sync::{Arc, mpsc},
        thread,
    },
    strum_macros::{Display, EnumIter},
    tokio::{runtime::Runtime, sync::Semaphore},
};

#[cfg(debug_assertions)]
use crate::config::DF;

#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Pending,
    Syncing,
    /// Number of records received
    Completed(usize),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Display)]
pub enum LoadStep {
    #[strum(to_string = "Asset info")]
    AssetInfo,
    #[strum(to_string = "Metric info")]
    MetricInfo,
    #[strum(to_string = "Exchange info")]
    ExchangeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub step: LoadStep,
    pub status: SyncStatus,
    pub source: Option<DataSource>,
}

/// Everything the dashboard needs before it can show the sidebar.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub asset_info: Vec<AssetInfo>,
    pub metric_info: Vec<MetricInfo>,
    pub exchange_info: Vec<ExchangeInfo>,
    pub index: CatalogIndex,
    pub sources: Vec<(LoadStep, DataSource)>,
    /// One entry per failed step. Failed steps leave their list empty.
    pub errors: Vec<String>,
}

impl Catalog {
    pub fn from_lists(
        asset_info: Vec<AssetInfo>,
        metric_info: Vec<MetricInfo>,
        exchange_info: Vec<ExchangeInfo>,
    ) -> Self {
        let index = CatalogIndex::build(&asset_info, &metric_info, &exchange_info);
        Self {
            asset_info,
            metric_info,
            exchange_info,
            index,
            sources: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            errors: vec![reason.into()],
            ..Default::default()
        }
    }

    pub fn is_usable(&self) -> bool {
        !self.index.assets.is_empty()
    }
}

fn report(progress: Option<&mpsc::Sender<ProgressEvent>>, step: LoadStep, status: SyncStatus, source: Option<DataSource>) {
    if let Some(tx) = progress {
        let _ = tx.send(ProgressEvent { step, status, source });
    }
}

/// Unwrap one step's result, substituting an empty list on failure.
fn settle<T>(
    step: LoadStep,
    result: anyhow::Result<Fetched<Vec<T>>>,
    progress: Option<&mpsc::Sender<ProgressEvent>>,
    sources: &mut Vec<(LoadStep, DataSource)>,
    errors: &mut Vec<String>,
) -> Vec<T> {
    match result {
        Ok(fetched) => {
            report(progress, step, SyncStatus::Completed(fetched.value.len()), Some(fetched.source));
            sources.push((step, fetched.source));
            fetched.value
        }
        Err(e) => {
            log::error!("Loading {} failed: {:#}", step, e);
            report(progress, step, SyncStatus::Failed(format!("{:#}", e)), None);
            errors.push(format!("{}: {:#}", step, e));
            Vec::new()
        }
    }
}

/// Fetch asset, metric and exchange metadata concurrently.
/// Never fails as a whole: a failed step contributes an empty list and an entry in `errors`.
pub async fn fetch_catalog(service: &DataService, progress: Option<&mpsc::Sender<ProgressEvent>>) -> Catalog {
    for step in [LoadStep::AssetInfo, LoadStep::MetricInfo, LoadStep::ExchangeInfo] {
        report(progress, step, SyncStatus::Syncing, None);
    }

    let (assets, metrics, exchanges) = futures::join!(
        service.asset_info(),
        service.metric_info(),
        service.exchange_info()
    );

    let mut sources = Vec::new();
    let mut errors = Vec::new();
    let asset_info = settle(LoadStep::AssetInfo, assets, progress, &mut sources, &mut errors);
    let metric_info = settle(LoadStep::MetricInfo, metrics, progress, &mut sources, &mut errors);
    let exchange_info = settle(LoadStep::ExchangeInfo, exchanges, progress, &mut sources, &mut errors);

    let mut catalog = Catalog::from_lists(asset_info, metric_info, exchange_info);
    catalog.sources = sources;
    catalog.errors = errors;

    log::info!(
        "Catalogue ready: {} assets, {} metrics, {} exchanges",
        catalog.asset_info.len(),
        catalog.metric_info.len(),
        catalog.exchange_info.len()
    );
    catalog
}

/// Load the catalogue on its own thread + runtime. Returns (progress, result) receivers.
pub fn spawn_catalog_loader(
    service: DataService,
    ctx: Option<Context>,
) -> (mpsc::Receiver<ProgressEvent>, mpsc::Receiver<Catalog>) {
    let (prog_tx, prog_rx) = mpsc::channel();
    let (data_tx, data_rx) = mpsc::channel();

    thread::spawn(move || {
        let catalog = match Runtime::new() {
            Ok(rt) => rt.block_on(async { fetch_catalog(&service, Some(&prog_tx)).await }),
            Err(e) => {
                log::error!("Failed to create runtime for catalogue loader: {}", e);
                Catalog::failed(format!("runtime: {}", e))
            }
        };
        let _ = data_tx.send(catalog);
        if let Some(ctx) = ctx {
            ctx.request_repaint();
        }
    });

    (prog_rx, data_rx)
}

#[derive(Debug, Clone)]
pub struct SeriesResponse {
    pub key: SeriesKey,
    pub result: Result<Fetched<MetricTable>, String>,
}

/// Serves time-series requests from the UI on a background runtime.
/// Requests go in over a tokio channel, responses come back over std mpsc so the UI can `try_recv` per frame.
pub struct SeriesWorker {
    req_tx: tokio::sync::mpsc::UnboundedSender<SeriesKey>,
    resp_rx: mpsc::Receiver<SeriesResponse>,
    in_flight: HashSet<SeriesKey>,
}

impl SeriesWorker {
    pub fn spawn(service: DataService, ctx: Option<Context>) -> Self {
        let (req_tx, mut req_rx) = tokio::sync::mpsc::unbounded_channel::<SeriesKey>();
        let (resp_tx, resp_rx) = mpsc::channel();

        thread::spawn(move || {
            let rt = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create runtime for series worker: {}", e);
                    return;
                }
            };
            rt.block_on(async move {
                let permits = Arc::new(Semaphore::new(COIN_METRICS.limits.concurrent_series_requests));
                while let Some(key) = req_rx.recv().await {
                    let service = service.clone();
                    let resp_tx = resp_tx.clone();
                    let ctx = ctx.clone();
                    let permits = Arc::clone(&permits);

                    tokio::spawn(async move {
                        let Ok(_permit) = permits.acquire_owned().await else {
                            return;
                        };
                        let result = service.series(&key).await.map_err(|e| {
                            log::error!("Series fetch for {} failed: {:#}", key, e);
                            format!("{:#}", e)
                        });
                        #[cfg(debug_assertions)]
                        if DF.log_worker {
                            log::info!("Series worker finished {} (ok: {})", key, result.is_ok());
                        }
                        let _ = resp_tx.send(SeriesResponse { key, result });
                        if let Some(ctx) = ctx {
                            ctx.request_repaint();
                        }
                    });
                }
            });
        });

        Self {
            req_tx,
            resp_rx,
            in_flight: HashSet::new(),
        }
    }

    /// Queue `key` unless it is already in flight. Returns whether a new request was sent.
    pub fn request(&mut self, key: SeriesKey) -> bool {
        if self.in_flight.contains(&key) {
            return false;
        }
        #[cfg(debug_assertions)]
        if DF.log_worker {
            log::info!("Series worker queued {}", key);
        }
        match self.req_tx.send(key.clone()) {
            Ok(()) => {
                self.in_flight.insert(key);
                true
            }
            Err(e) => {
                log::error!("Series worker is gone, dropping request {}", e.0);
                false
            }
        }
    }

    /// Drain finished responses without blocking.
    pub fn poll(&mut self) -> Vec<SeriesResponse> {
        let responses: Vec<SeriesResponse> = self.resp_rx.try_iter().collect();
        for r in &responses {
            self.in_flight.remove(&r.key);
        }
        responses
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FetchPolicy, service::tests::{StubProvider, service_with}};
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn catalog_reports_progress_per_step() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(Arc::new(StubProvider::default()), &dir, FetchPolicy::CacheFirst);
        let (tx, rx) = mpsc::channel();

        let catalog = fetch_catalog(&service, Some(&tx)).await;
        assert!(catalog.is_usable());
        assert!(catalog.errors.is_empty());
        assert_eq!(catalog.index.asset_names().collect::<Vec<_>>(), vec!["Bitcoin", "Ethereum"]);
        assert_eq!(catalog.index.exchanges_for("btc"), &["coinbase".to_string()]);

        let events: Vec<ProgressEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 6);
        assert!(events.contains(&ProgressEvent {
            step: LoadStep::AssetInfo,
            status: SyncStatus::Completed(2),
            source: Some(DataSource::Api),
        }));
    }

    #[tokio::test]
    async fn failed_steps_leave_empty_lists() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(Arc::new(StubProvider::failing()), &dir, FetchPolicy::ApiFirst);

        let catalog = fetch_catalog(&service, None).await;
        assert!(!catalog.is_usable());
        assert!(catalog.asset_info.is_empty());
        assert_eq!(catalog.errors.len(), 3);
    }

    #[test]
    fn catalog_loader_thread_delivers() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(Arc::new(StubProvider::default()), &dir, FetchPolicy::CacheFirst);
        let (_progress, data) = spawn_catalog_loader(service, None);

        let catalog = data.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(catalog.asset_info.len(), 2);
    }

    fn wait_for(worker: &mut SeriesWorker, n: usize) -> Vec<SeriesResponse> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut got = Vec::new();
        while got.len() < n && Instant::now() < deadline {
            got.extend(worker.poll());
            thread::sleep(Duration::from_millis(10));
        }
        got
    }

    #[test]
    fn worker_serves_and_dedupes_requests() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubProvider::default());
        let service = service_with(stub.clone(), &dir, FetchPolicy::CacheFirst);
        let mut worker = SeriesWorker::spawn(service, None);

        let key = SeriesKey::single("btc", "PriceUSD");
        assert!(worker.request(key.clone()));
        assert!(!worker.request(key.clone()));
        assert_eq!(worker.pending(), 1);

        let responses = wait_for(&mut worker, 1);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].key, key);
        assert_eq!(responses[0].result.as_ref().unwrap().value.len(), 2);
        assert_eq!(worker.pending(), 0);
    }

    #[test]
    fn worker_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(Arc::new(StubProvider::failing()), &dir, FetchPolicy::ApiFirst);
        let mut worker = SeriesWorker::spawn(service, None);

        worker.request(SeriesKey::single("eth", "TxCnt"));
        let responses = wait_for(&mut worker, 1);
        assert!(responses[0].result.is_err());
        assert_eq!(worker.pending(), 0);
    }
}
