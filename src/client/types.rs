//! Wire types of the Coin Metrics v2 API.
//!
//! The metadata types also go into the bincode disk cache, so no `flatten`,
//! `untagged` or `skip_serializing_if` on them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `metricData` object returned by `/assets/{asset}/metricdata`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MetricData {
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub series: Vec<SeriesRow>,
}

/// One timestamp of a metric response. `values` follows the order of
/// [`MetricData::metrics`]; entries are decimal strings or null.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SeriesRow {
    pub time: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl SeriesRow {
    /// Numeric value at `idx`. Missing, null, non-numeric and non-finite entries are `None`.
    pub fn value_at(&self, idx: usize) -> Option<f64> {
        let parsed = match self.values.get(idx)? {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
        parsed.filter(|v| v.is_finite())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AssetInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub exchanges: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketInfo {
    #[serde(default)]
    pub market_id: String,
    pub asset_id_base: String,
    #[serde(default)]
    pub asset_id_quote: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub markets_info: Vec<MarketInfo>,
}
