//! REST client for the Coin Metrics community API.

mod error;
mod provider;
mod rate_limiter;
mod rest;
pub mod types;

pub use error::{ClientError, Result};
pub use provider::MetricsProvider;
pub use rest::CoinMetricsClient;
pub use types::{AssetInfo, ExchangeInfo, MarketInfo, MetricData, MetricInfo, SeriesRow};

pub(crate) use rate_limiter::GlobalRateLimiter;
