use {
    crate::{
        client::{AssetInfo, ExchangeInfo, MetricInfo},
        domain::{AssetEntry, MetricLabel},
    },
    serde::{Deserialize, Serialize},
    std::collections::{BTreeMap, BTreeSet, HashMap},
};

/// Asset display name -> (asset id, metrics offered for that asset).
pub fn asset_info_map(asset_info: &[AssetInfo]) -> BTreeMap<String, (String, Vec<String>)> {
    asset_info
        .iter()
        .map(|a| (a.name.clone(), (a.id.clone(), a.metrics.clone())))
        .collect()
}

/// (metric id -> (name, description), metric name -> metric id)
pub fn metric_info_maps(
    metric_info: &[MetricInfo],
) -> (
    HashMap<String, (String, String)>,
    HashMap<String, String>,
) {
    let mut id_to_info = HashMap::with_capacity(metric_info.len());
    let mut name_to_id = HashMap::with_capacity(metric_info.len());
    for m in metric_info {
        id_to_info.insert(m.id.clone(), (m.name.clone(), m.description.clone()));
        name_to_id.insert(m.name.clone(), m.id.clone());
    }
    (id_to_info, name_to_id)
}

/// Metrics present in every one of `metric_sets`. Empty input yields an empty set.
pub fn common_metrics<'a, I, S>(metric_sets: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a [S]>,
    S: AsRef<str> + 'a,
{
    let mut sets = metric_sets
        .into_iter()
        .map(|set| set.iter().map(|m| m.as_ref().to_string()).collect::<BTreeSet<_>>());

    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };
    sets.fold(first, |acc, set| acc.intersection(&set).cloned().collect())
}

pub fn does_exchange_have_asset(exchange: &ExchangeInfo, asset_id: &str) -> bool {
    exchange
        .markets_info
        .iter()
        .any(|market| market.asset_id_base == asset_id)
}

pub fn exchanges_for_asset<'a>(exchanges: &'a [ExchangeInfo], asset_id: &str) -> Vec<&'a ExchangeInfo> {
    exchanges
        .iter()
        .filter(|ex| does_exchange_have_asset(ex, asset_id))
        .collect()
}

/// Pre-built lookups over the metadata catalogue, so the UI never rescans the raw lists per frame.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CatalogIndex {
    /// Sorted by display name
    pub assets: Vec<AssetEntry>,
    id_to_info: HashMap<String, (String, String)>,
    exchanges_by_asset: HashMap<String, Vec<String>>,
}

impl CatalogIndex {
    pub fn build(asset_info: &[AssetInfo], metric_info: &[MetricInfo], exchanges: &[ExchangeInfo]) -> Self {
        let assets = asset_info_map(asset_info)
            .into_iter()
            .map(|(name, (id, metrics))| AssetEntry { name, id, metrics })
            .collect::<Vec<_>>();
        let (id_to_info, _) = metric_info_maps(metric_info);

        let exchanges_by_asset = assets
            .iter()
            .map(|a| {
                let ids = exchanges_for_asset(exchanges, &a.id)
                    .into_iter()
                    .map(|ex| ex.id.clone())
                    .collect();
                (a.id.clone(), ids)
            })
            .collect();

        Self {
            assets,
            id_to_info,
            exchanges_by_asset,
        }
    }

    pub fn asset_names(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|a| a.name.as_str())
    }

    pub fn asset_by_name(&self, name: &str) -> Option<&AssetEntry> {
        self.assets.iter().find(|a| a.name == name)
    }

    /// Selected names in input order, skipping names the catalogue does not know.
    pub fn resolve_assets(&self, names: &[String]) -> Vec<&AssetEntry> {
        names.iter().filter_map(|n| self.asset_by_name(n)).collect()
    }

    /// Metrics shared by all `assets`, labelled and sorted by display name.
    /// Ids without metadata are labelled with the id itself.
    pub fn metric_choices(&self, assets: &[&AssetEntry]) -> Vec<MetricLabel> {
        let mut choices: Vec<MetricLabel> = common_metrics(assets.iter().map(|a| a.metrics.as_slice()))
            .into_iter()
            .map(|id| self.metric_label(&id))
            .collect();
        choices.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        choices
    }

    pub fn metric_label(&self, id: &str) -> MetricLabel {
        match self.id_to_info.get(id) {
            Some((name, description)) => MetricLabel {
                id: id.to_string(),
                name: name.clone(),
                description: description.clone(),
            },
            None => MetricLabel {
                id: id.to_string(),
                name: id.to_string(),
                description: String::new(),
            },
        }
    }

    pub fn exchanges_for(&self, asset_id: &str) -> &[String] {
        self.exchanges_by_asset
            .get(asset_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
