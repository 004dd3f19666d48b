//! Command line front end for the Coin Metrics REST client.
//!
//! ```
//! cargo run --bin coin-metrics -- assets
//! cargo run --bin coin-metrics -- rates btc --metric PriceUSD --start 2024-01-01
//! ```
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tabled::{Table, Tabled};

use coin_scope::CoinMetricsClient;
use coin_scope::MetricTable;
use coin_scope::data::exchanges_for_asset;
use coin_scope::utils::format_api_date;

#[derive(Parser, Debug)]
#[command(author, version, about = "Query the Coin Metrics community API")]
struct Args {
    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every asset id
    Assets,
    /// List every metric id
    Metrics,
    /// Metric names and descriptions
    MetricInfo,
    /// Asset names with their metric and exchange counts
    AssetInfo,
    /// Exchanges, optionally only those listing a base asset
    Exchanges {
        #[arg(long)]
        asset: Option<String>,
    },
    /// Daily values of one metric for one asset
    Rates {
        asset: String,
        #[arg(long)]
        metric: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
}

#[derive(Tabled)]
struct MetricInfoRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct AssetInfoRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Metrics")]
    metrics: usize,
    #[tabled(rename = "Exchanges")]
    exchanges: usize,
}

#[derive(Tabled)]
struct ExchangeRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Markets")]
    markets: usize,
}

#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn rate_rows(table: &MetricTable) -> Vec<RateRow> {
    table
        .columns
        .iter()
        .flat_map(|col| {
            table.time.iter().zip(&col.values).map(move |(t, v)| RateRow {
                date: format_api_date(t),
                metric: col.metric.clone(),
                value: v.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "-".to_string()),
            })
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let client = match args.base_url {
        Some(url) => CoinMetricsClient::new(url),
        None => CoinMetricsClient::production(),
    }
    .context("Failed to build HTTP client")?;

    match args.command {
        Command::Assets => {
            let assets = client.get_assets().await.context("Failed to fetch assets")?;
            println!("{} assets", assets.len());
            println!("{}", assets.join(", "));
        }
        Command::Metrics => {
            let metrics = client.get_metrics().await.context("Failed to fetch metrics")?;
            println!("{} metrics", metrics.len());
            println!("{}", metrics.join(", "));
        }
        Command::MetricInfo => {
            let info = client
                .get_metric_info()
                .await
                .context("Failed to fetch metric info")?;
            let rows: Vec<MetricInfoRow> = info
                .into_iter()
                .map(|m| MetricInfoRow {
                    id: m.id,
                    name: m.name,
                    category: m.category.unwrap_or_default(),
                    description: truncate(&m.description, 60),
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        Command::AssetInfo => {
            let info = client
                .get_asset_info()
                .await
                .context("Failed to fetch asset info")?;
            let rows: Vec<AssetInfoRow> = info
                .into_iter()
                .map(|a| AssetInfoRow {
                    metrics: a.metrics.len(),
                    exchanges: a.exchanges.len(),
                    id: a.id,
                    name: a.name,
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        Command::Exchanges { asset } => {
            let exchanges = client
                .get_exchange_info()
                .await
                .context("Failed to fetch exchange info")?;
            let listed = match &asset {
                Some(asset_id) => exchanges_for_asset(&exchanges, asset_id),
                None => exchanges.iter().collect(),
            };
            let rows: Vec<ExchangeRow> = listed
                .into_iter()
                .map(|e| ExchangeRow {
                    id: e.id.clone(),
                    name: e.name.clone(),
                    markets: e.markets_info.len(),
                })
                .collect();
            if let Some(asset_id) = &asset {
                println!("Available exchanges for {}", asset_id);
            }
            println!("{}", Table::new(rows));
        }
        Command::Rates {
            asset,
            metric,
            start,
            end,
        } => {
            let table = client
                .get_reference_rates(&asset, metric.as_deref(), start.as_deref(), end.as_deref())
                .await
                .with_context(|| format!("Failed to fetch metric data for {}", asset))?;
            if table.is_empty() {
                println!("No rows returned for {}", asset);
                return Ok(());
            }
            println!("{}", Table::new(rate_rows(&table)));
        }
    }

    Ok(())
}
