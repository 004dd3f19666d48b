//! Coin Metrics community API settings.

/// Endpoint paths, relative to `base_url`.
pub struct Endpoints {
    pub assets: &'static str,
    pub metrics: &'static str,
    pub asset_info: &'static str,
    pub metric_info: &'static str,
    pub exchange_info: &'static str,
    /// Per-asset time series. `{asset}` is replaced by the asset id.
    pub metric_data: &'static str,
}

/// Request pacing for the community tier (10 requests per 6 second window, per IP).
pub struct RestLimits {
    pub requests_per_window: u32,
    pub window_ms: u64,
    pub concurrent_series_requests: usize,
    /// First wait before a failed series is requested again; doubles per failure up to the max
    pub retry_base_ms: u64,
    pub retry_max_ms: u64,
}

pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub user_agent: &'static str,
}

pub struct CoinMetricsConfig {
    pub base_url: &'static str,
    pub endpoints: Endpoints,
    pub limits: RestLimits,
    pub client: ClientDefaults,
    pub default_metric: &'static str,
}

pub const COIN_METRICS: CoinMetricsConfig = CoinMetricsConfig {
    base_url: "https://community-api.coinmetrics.io/v2",
    endpoints: Endpoints {
        assets: "/assets",
        metrics: "/metrics",
        asset_info: "/asset_info",
        metric_info: "/metric_info",
        exchange_info: "/exchange_info",
        metric_data: "/assets/{asset}/metricdata",
    },
    limits: RestLimits {
        requests_per_window: 10,
        window_ms: 6_000,
        concurrent_series_requests: 4,
        retry_base_ms: 5_000,
        retry_max_ms: 5 * 60 * 1_000,
    },
    client: ClientDefaults {
        timeout_ms: 30_000,
        user_agent: concat!("coin-scope/", env!("CARGO_PKG_VERSION")),
    },
    default_metric: "PriceUSD",
};

/// Path of the time-series endpoint for one asset.
pub fn metric_data_path(asset: &str) -> String {
    COIN_METRICS.endpoints.metric_data.replace("{asset}", asset)
}
