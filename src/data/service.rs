use {
    crate::{
        Cli,
        client::{AssetInfo, CoinMetricsClient, ExchangeInfo, MetricInfo, MetricsProvider},
        config::COIN_METRICS,
        data::{DataSource, DiskCache, MetricTable},
        domain::SeriesKey,
        shared::Memo,
    },
    anyhow::{Context, Result, anyhow},
    serde::{Serialize, de::DeserializeOwned},
    std::{future::Future, sync::Arc},
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Order in which the service consults the disk cache and the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Valid disk cache first, API on a miss.
    #[default]
    CacheFirst,
    /// API first, disk cache if the API fails.
    ApiFirst,
    /// Never call the API.
    CacheOnly,
}

impl FetchPolicy {
    pub fn from_flags(prefer_api: bool, offline: bool) -> Self {
        match (offline, prefer_api) {
            (true, _) => FetchPolicy::CacheOnly,
            (false, true) => FetchPolicy::ApiFirst,
            (false, false) => FetchPolicy::CacheFirst,
        }
    }
}

/// A value plus where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub source: DataSource,
}

/// Every dashboard data call goes through here.
/// Results are memoised by their arguments, so a repeated call never reaches the network.
#[derive(Clone)]
pub struct DataService {
    provider: Arc<dyn MetricsProvider>,
    disk: DiskCache,
    policy: FetchPolicy,
    lists: Memo<&'static str, Vec<String>>,
    asset_info: Memo<(), Vec<AssetInfo>>,
    metric_info: Memo<(), Vec<MetricInfo>>,
    exchange_info: Memo<(), Vec<ExchangeInfo>>,
    series: Memo<SeriesKey, MetricTable>,
}

impl DataService {
    pub fn new(provider: Arc<dyn MetricsProvider>, disk: DiskCache, policy: FetchPolicy) -> Self {
        Self {
            provider,
            disk,
            policy,
            lists: Memo::new(),
            asset_info: Memo::new(),
            metric_info: Memo::new(),
            exchange_info: Memo::new(),
            series: Memo::new(),
        }
    }

    /// Live client against `--base-url` (or the public endpoint) with the default disk cache.
    pub fn from_cli(args: &Cli) -> Result<Self> {
        let base_url = args.base_url.as_deref().unwrap_or(COIN_METRICS.base_url);
        let client = CoinMetricsClient::new(base_url).context("Failed to build HTTP client")?;
        let policy = FetchPolicy::from_flags(args.prefer_api, args.offline);
        log::info!("Data service: {} ({:?})", base_url, policy);
        Ok(Self::new(Arc::new(client), DiskCache::default(), policy))
    }

    pub async fn assets(&self) -> Result<Fetched<Vec<String>>> {
        let provider = Arc::clone(&self.provider);
        self.memoised(&self.lists, "assets", "assets", move || async move {
            provider.assets().await
        })
        .await
    }

    pub async fn metrics(&self) -> Result<Fetched<Vec<String>>> {
        let provider = Arc::clone(&self.provider);
        self.memoised(&self.lists, "metrics", "metrics", move || async move {
            provider.metrics().await
        })
        .await
    }

    pub async fn asset_info(&self) -> Result<Fetched<Vec<AssetInfo>>> {
        let provider = Arc::clone(&self.provider);
        self.memoised(&self.asset_info, (), "asset_info", move || async move {
            provider.asset_info().await
        })
        .await
    }

    pub async fn metric_info(&self) -> Result<Fetched<Vec<MetricInfo>>> {
        let provider = Arc::clone(&self.provider);
        self.memoised(&self.metric_info, (), "metric_info", move || async move {
            provider.metric_info().await
        })
        .await
    }

    pub async fn exchange_info(&self) -> Result<Fetched<Vec<ExchangeInfo>>> {
        let provider = Arc::clone(&self.provider);
        self.memoised(&self.exchange_info, (), "exchange_info", move || async move {
            provider.exchange_info().await
        })
        .await
    }

    pub async fn series(&self, key: &SeriesKey) -> Result<Fetched<MetricTable>> {
        let provider = Arc::clone(&self.provider);
        let request = key.clone();
        let disk_key = format!("series_{}", key.cache_key());
        self.memoised(&self.series, key.clone(), &disk_key, move || async move {
            provider
                .asset_metric_data(
                    &request.asset_id,
                    &request.metrics,
                    request.start.as_deref(),
                    request.end.as_deref(),
                )
                .await
        })
        .await
    }

    /// Memory first, then disk / API in the order `policy` dictates.
    /// Only successful results are remembered.
    async fn memoised<K, T, F, Fut>(
        &self,
        memo: &Memo<K, T>,
        memo_key: K,
        disk_key: &str,
        fetch: F,
    ) -> Result<Fetched<T>>
    where
        K: Eq + std::hash::Hash,
        T: Clone + Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = crate::client::Result<T>>,
    {
        if let Some(value) = memo.get(&memo_key) {
            return Ok(Fetched {
                value,
                source: DataSource::Memory,
            });
        }

        let fetched = match self.policy {
            FetchPolicy::CacheOnly => self.load_disk(disk_key).with_context(|| {
                format!("Offline and no valid cache for {}", disk_key)
            })?,
            FetchPolicy::CacheFirst => match self.load_disk(disk_key) {
                Ok(fetched) => fetched,
                Err(_miss) => {
                    #[cfg(debug_assertions)]
                    if DF.log_cache {
                        log::info!("Cache miss for {}: {:#}", disk_key, _miss);
                    }
                    self.fetch_api(disk_key, fetch).await?
                }
            },
            FetchPolicy::ApiFirst => match self.fetch_api(disk_key, fetch).await {
                Ok(fetched) => fetched,
                Err(api_err) => {
                    log::warn!("API failed for {}, trying disk cache: {:#}", disk_key, api_err);
                    self.load_disk(disk_key).map_err(|disk_err| {
                        anyhow!("{:#} (cache fallback: {:#})", api_err, disk_err)
                    })?
                }
            },
        };

        memo.insert(memo_key, fetched.value.clone());
        Ok(fetched)
    }

    fn load_disk<T: DeserializeOwned>(&self, disk_key: &str) -> Result<Fetched<T>> {
        Ok(Fetched {
            value: self.disk.load(disk_key)?,
            source: DataSource::DiskCache,
        })
    }

    async fn fetch_api<T, F, Fut>(&self, disk_key: &str, fetch: F) -> Result<Fetched<T>>
    where
        T: Clone + Serialize + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = crate::client::Result<T>>,
    {
        let value = fetch()
            .await
            .with_context(|| format!("Coin Metrics request for {} failed", disk_key))?;

        if let Err(e) = self
            .disk
            .store_async(disk_key.to_string(), value.clone(), DataSource::Api)
            .await
        {
            log::warn!("Failed to write cache for {}: {:#}", disk_key, e);
        }

        Ok(Fetched {
            value,
            source: DataSource::Api,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::client::{ClientError, MarketInfo};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory provider that counts how often it is asked.
    #[derive(Default)]
    pub(crate) struct StubProvider {
        pub calls: AtomicUsize,
        pub fail: bool,
        /// Number of leading calls that fail before the stub starts answering
        pub fail_first: usize,
    }

    impl StubProvider {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub(crate) fn flaky(fail_first: usize) -> Self {
            Self {
                fail_first,
                ..Default::default()
            }
        }

        fn hit<T>(&self, value: T) -> crate::client::Result<T> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail || n < self.fail_first {
                return Err(ClientError::MissingField("stub"));
            }
            Ok(value)
        }
    }

    #[async_trait]
    impl MetricsProvider for StubProvider {
        async fn assets(&self) -> crate::client::Result<Vec<String>> {
            self.hit(vec!["btc".into(), "eth".into()])
        }

        async fn metrics(&self) -> crate::client::Result<Vec<String>> {
            self.hit(vec!["PriceUSD".into(), "TxCnt".into()])
        }

        async fn metric_info(&self) -> crate::client::Result<Vec<MetricInfo>> {
            self.hit(vec![MetricInfo {
                id: "PriceUSD".into(),
                name: "Price, USD".into(),
                description: "Closing price".into(),
                category: None,
                subcategory: None,
                unit: Some("USD".into()),
                data_type: None,
            }])
        }

        async fn asset_info(&self) -> crate::client::Result<Vec<AssetInfo>> {
            self.hit(vec![
                AssetInfo {
                    id: "btc".into(),
                    name: "Bitcoin".into(),
                    metrics: vec!["PriceUSD".into(), "TxCnt".into()],
                    exchanges: vec!["coinbase".into()],
                },
                AssetInfo {
                    id: "eth".into(),
                    name: "Ethereum".into(),
                    metrics: vec!["PriceUSD".into()],
                    exchanges: vec![],
                },
            ])
        }

        async fn exchange_info(&self) -> crate::client::Result<Vec<ExchangeInfo>> {
            self.hit(vec![ExchangeInfo {
                id: "coinbase".into(),
                name: "Coinbase".into(),
                markets_info: vec![MarketInfo {
                    market_id: "coinbase-btc-usd-spot".into(),
                    asset_id_base: "btc".into(),
                    asset_id_quote: "usd".into(),
                }],
            }])
        }

        async fn asset_metric_data(
            &self,
            asset: &str,
            metrics: &[String],
            _start: Option<&str>,
            _end: Option<&str>,
        ) -> crate::client::Result<MetricTable> {
            let last = if asset == "btc" { "2.5" } else { "0.5" };
            let data = serde_json::from_value(serde_json::json!({
                "metrics": metrics,
                "series": [
                    {"time": "2020-01-01T00:00:00.000Z", "values": ["1.5"]},
                    {"time": "2020-02-01T00:00:00.000Z", "values": [last]}
                ]
            }))
            .map_err(ClientError::from)?;
            self.hit(MetricTable::from_metric_data(data))
        }
    }

    pub(crate) fn service_with(
        provider: Arc<StubProvider>,
        dir: &tempfile::TempDir,
        policy: FetchPolicy,
    ) -> DataService {
        DataService::new(provider, DiskCache::new(dir.path(), 1.0, 3600), policy)
    }

    #[test]
    fn policy_from_flags() {
        assert_eq!(FetchPolicy::from_flags(false, false), FetchPolicy::CacheFirst);
        assert_eq!(FetchPolicy::from_flags(true, false), FetchPolicy::ApiFirst);
        assert_eq!(FetchPolicy::from_flags(true, true), FetchPolicy::CacheOnly);
    }

    #[tokio::test]
    async fn repeated_calls_hit_memory() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubProvider::default());
        let service = service_with(stub.clone(), &dir, FetchPolicy::CacheFirst);

        let first = service.assets().await.unwrap();
        assert_eq!(first.source, DataSource::Api);
        let second = service.assets().await.unwrap();
        assert_eq!(second.source, DataSource::Memory);
        assert_eq!(second.value, first.value);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);

        // assets and metrics share a memo table but not a key
        service.metrics().await.unwrap();
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn series_memo_is_keyed_by_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubProvider::default());
        let service = service_with(stub.clone(), &dir, FetchPolicy::ApiFirst);

        let btc = SeriesKey::single("btc", "PriceUSD");
        let eth = SeriesKey::single("eth", "PriceUSD");
        let table = service.series(&btc).await.unwrap().value;
        assert_eq!(table.column("PriceUSD").unwrap(), &[Some(1.5), Some(2.5)]);

        service.series(&btc).await.unwrap();
        service.series(&eth).await.unwrap();
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fresh_service_reads_disk_written_by_earlier_one() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubProvider::default());
        service_with(stub.clone(), &dir, FetchPolicy::CacheFirst)
            .asset_info()
            .await
            .unwrap();

        let offline = service_with(Arc::new(StubProvider::failing()), &dir, FetchPolicy::CacheOnly);
        let info = offline.asset_info().await.unwrap();
        assert_eq!(info.source, DataSource::DiskCache);
        assert_eq!(info.value.len(), 2);
    }

    #[tokio::test]
    async fn offline_without_cache_fails_without_calling_api() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubProvider::default());
        let service = service_with(stub.clone(), &dir, FetchPolicy::CacheOnly);

        assert!(service.exchange_info().await.is_err());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn api_failure_falls_back_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        service_with(Arc::new(StubProvider::default()), &dir, FetchPolicy::ApiFirst)
            .metric_info()
            .await
            .unwrap();

        let failing = Arc::new(StubProvider::failing());
        let service = service_with(failing.clone(), &dir, FetchPolicy::ApiFirst);
        let info = service.metric_info().await.unwrap();
        assert_eq!(info.source, DataSource::DiskCache);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_memoised() {
        let dir = tempfile::tempdir().unwrap();
        let failing = Arc::new(StubProvider::failing());
        let service = service_with(failing.clone(), &dir, FetchPolicy::CacheFirst);

        assert!(service.assets().await.is_err());
        assert!(service.assets().await.is_err());
        assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
    }
}
