use serde::{Deserialize, Serialize};

/// An asset as the dashboard knows it: display name plus API id and the metrics it offers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub name: String,
    pub id: String,
    pub metrics: Vec<String>,
}

/// Display name and description of a metric.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MetricLabel {
    pub id: String,
    pub name: String,
    pub description: String,
}
