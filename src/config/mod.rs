//! Configuration module for the dashboard.

// Can all be private now because we have a public re-export.
mod api;
mod debug;
mod persistence;
mod types;

// Can't be private because we don't re-export it
pub mod plot;

// Re-export commonly used items
pub use api::{COIN_METRICS, CoinMetricsConfig, metric_data_path};
pub use debug::DF;
pub use persistence::{PERSISTENCE, response_cache_filename};
pub use plot::{PLOT_CONFIG, asset_color};
pub use types::ChartKind;
