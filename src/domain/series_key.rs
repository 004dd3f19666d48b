use serde::{Deserialize, Serialize};

/// Arguments of one time-series request. Used as the memo key and to name cache files.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct SeriesKey {
    pub asset_id: String,
    pub metrics: Vec<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl SeriesKey {
    pub fn new(asset_id: impl Into<String>, metrics: &[String]) -> Self {
        Self {
            asset_id: asset_id.into(),
            metrics: metrics.to_vec(),
            start: None,
            end: None,
        }
    }

    pub fn single(asset_id: impl Into<String>, metric: impl Into<String>) -> Self {
        Self::new(asset_id, &[metric.into()])
    }


    /// Stable string used for cache file names.
    pub fn cache_key(&self) -> String {
        let mut key = format!("{}_{}", self.asset_id, self.metrics.join("-"));
        if let Some(start) = &self.start {
            key.push_str(&format!("_from{}", start));
        }
        if let Some(end) = &self.end {
            key.push_str(&format!("_to{}", end));
        }
        key
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} [{}]", self.asset_id, self.metrics.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_includes_bounds() {
        let key = SeriesKey::single("btc", "PriceUSD");
        assert_eq!(key.cache_key(), "btc_PriceUSD");

        let bounded = SeriesKey {
            start: Some("2020-01-01".into()),
            ..key
        };
        assert_eq!(bounded.cache_key(), "btc_PriceUSD_from2020-01-01");
    }

    #[test]
    fn keys_with_different_metrics_differ() {
        let a = SeriesKey::new("eth", &["PriceUSD".to_string()]);
        let b = SeriesKey::new("eth", &["PriceUSD".to_string(), "AdrActCnt".to_string()]);
        assert_ne!(a, b);
        assert_eq!(b.to_string(), "eth [PriceUSD, AdrActCnt]");
    }
}
