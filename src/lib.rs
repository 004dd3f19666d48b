#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod app;
pub mod client;
pub mod config;
pub mod data;
pub mod domain;
mod shared;
pub mod ui;
pub mod utils;

// Re-export commonly used types outside of crate (for the binaries)
pub use app::App;
pub use client::{CoinMetricsClient, MetricsProvider};
pub use config::PERSISTENCE;
pub use data::{DataService, MetricTable};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use API as primary source instead of the local cache
    #[arg(long, default_value_t = false)]
    pub prefer_api: bool,

    /// Never call the API; only read the local cache
    #[arg(long, default_value_t = false, conflicts_with = "prefer_api")]
    pub offline: bool,

    /// Override the Coin Metrics API base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> anyhow::Result<App> {
    App::new(cc, args)
}
