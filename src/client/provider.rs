use async_trait::async_trait;

use crate::{
    client::{
        CoinMetricsClient, Result,
        types::{AssetInfo, ExchangeInfo, MetricInfo},
    },
    data::MetricTable,
};

/// Abstract interface for fetching metrics and their metadata.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn assets(&self) -> Result<Vec<String>>;
    async fn metrics(&self) -> Result<Vec<String>>;
    async fn metric_info(&self) -> Result<Vec<MetricInfo>>;
    async fn asset_info(&self) -> Result<Vec<AssetInfo>>;
    async fn exchange_info(&self) -> Result<Vec<ExchangeInfo>>;

    /// Time series of `metrics` for `asset`, optionally bounded by `start` / `end` (inclusive).
    async fn asset_metric_data(
        &self,
        asset: &str,
        metrics: &[String],
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<MetricTable>;
}

#[async_trait]
impl MetricsProvider for CoinMetricsClient {
    async fn assets(&self) -> Result<Vec<String>> {
        self.get_assets().await
    }

    async fn metrics(&self) -> Result<Vec<String>> {
        self.get_metrics().await
    }

    async fn metric_info(&self) -> Result<Vec<MetricInfo>> {
        self.get_metric_info().await
    }

    async fn asset_info(&self) -> Result<Vec<AssetInfo>> {
        self.get_asset_info().await
    }

    async fn exchange_info(&self) -> Result<Vec<ExchangeInfo>> {
        self.get_exchange_info().await
    }

    async fn asset_metric_data(
        &self,
        asset: &str,
        metrics: &[String],
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<MetricTable> {
        self.get_asset_metric_data(asset, metrics, start, end).await
    }
}
