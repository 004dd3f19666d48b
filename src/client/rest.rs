// API docs: https://docs.coinmetrics.io/api/v2/

use {
    crate::{
        client::{
            ClientError, GlobalRateLimiter, Result,
            types::{AssetInfo, ExchangeInfo, MetricData, MetricInfo},
        },
        config::{COIN_METRICS, metric_data_path},
        data::MetricTable,
    },
    reqwest::{Client, StatusCode},
    serde::de::DeserializeOwned,
    serde_json::Value,
    std::time::Duration,
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Thin client over the Coin Metrics community REST API.
/// Every call is one GET, paced by a shared [`GlobalRateLimiter`].
pub struct CoinMetricsClient {
    base_url: String,
    http: Client,
    limiter: GlobalRateLimiter,
}

impl CoinMetricsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(COIN_METRICS.client.timeout_ms))
            .user_agent(COIN_METRICS.client.user_agent)
            .build()?;
        Ok(Self::with_http(base_url, http))
    }

    pub fn production() -> Result<Self> {
        Self::new(COIN_METRICS.base_url)
    }

    /// Client over an already configured `reqwest::Client`.
    pub(crate) fn with_http(base_url: impl Into<String>, http: Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            limiter: GlobalRateLimiter::new(
                COIN_METRICS.limits.requests_per_window,
                COIN_METRICS.limits.window_ms,
            ),
        }
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Performs a GET request to `path` with the supplied params.
    /// Anything but a 200 is logged and returned as [`ClientError::Status`].
    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = self.endpoint_url(path);
        self.limiter.acquire(1, path).await;

        #[cfg(debug_assertions)]
        if DF.log_requests {
            log::info!("GET {} {:?}", url, params);
        }

        let response = self.http.get(&url).query(params).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!(
                "Unable to perform REST call. Status {}. Message: {}",
                status,
                body
            );
            return Err(ClientError::Status { status, body });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn get_field<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        field: &'static str,
    ) -> Result<T> {
        let body = self.get(path, params).await?;
        extract_field(body, field)
    }

    /// Ids of every asset the API serves.
    pub async fn get_assets(&self) -> Result<Vec<String>> {
        self.get_field(COIN_METRICS.endpoints.assets, &[], "assets")
            .await
    }

    /// Ids of every metric the API serves.
    pub async fn get_metrics(&self) -> Result<Vec<String>> {
        self.get_field(COIN_METRICS.endpoints.metrics, &[], "metrics")
            .await
    }

    /// One metric (default `PriceUSD`) for one asset between `start` and `end`,
    /// reshaped into a column-oriented table.
    pub async fn get_reference_rates(
        &self,
        asset: &str,
        metric: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<MetricTable> {
        let metric = metric.unwrap_or(COIN_METRICS.default_metric);
        self.get_asset_metric_data(asset, &[metric.to_string()], start, end)
            .await
    }

    /// Several metrics for one asset. Table columns follow the order the API returns.
    pub async fn get_asset_metric_data(
        &self,
        asset: &str,
        metrics: &[String],
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<MetricTable> {
        let params = metric_data_params(metrics, start, end);
        let data: MetricData = self
            .get_field(&metric_data_path(asset), &params, "metricData")
            .await?;
        Ok(MetricTable::from_metric_data(data))
    }

    pub async fn get_metric_info(&self) -> Result<Vec<MetricInfo>> {
        self.get_field(COIN_METRICS.endpoints.metric_info, &[], "metricsInfo")
            .await
    }

    pub async fn get_asset_info(&self) -> Result<Vec<AssetInfo>> {
        self.get_field(COIN_METRICS.endpoints.asset_info, &[], "assetsInfo")
            .await
    }

    pub async fn get_exchange_info(&self) -> Result<Vec<ExchangeInfo>> {
        self.get_field(COIN_METRICS.endpoints.exchange_info, &[], "exchangesInfo")
            .await
    }
}

/// Query params for the metric-data endpoint. Several metrics are comma-joined.
pub(crate) fn metric_data_params(
    metrics: &[String],
    start: Option<&str>,
    end: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![("metrics", metrics.join(","))];
    if let Some(start) = start.filter(|s| !s.is_empty()) {
        params.push(("start", start.to_string()));
    }
    if let Some(end) = end.filter(|s| !s.is_empty()) {
        params.push(("end", end.to_string()));
    }
    params
}

/// Pulls `field` out of a decoded response body.
pub(crate) fn extract_field<T: DeserializeOwned>(mut body: Value, field: &'static str) -> Result<T> {
    let value = body
        .get_mut(field)
        .map(Value::take)
        .ok_or(ClientError::MissingField(field))?;
    Ok(serde_json::from_value(value)?)
}
