// Data layer: columnar tables, metadata lookups, caching and background loading.
mod aggregate;
mod cache;
mod loader;
mod lookup;
mod service;
mod table;

pub use aggregate::{AlignedAssets, HeatmapCell, MonthlyHeatmap, align_assets, monthly_heatmap};
pub use cache::{DataSource, DiskCache};
pub use loader::{
    Catalog, LoadStep, ProgressEvent, SeriesResponse, SeriesWorker, SyncStatus, fetch_catalog,
    spawn_catalog_loader,
};
pub use lookup::{
    CatalogIndex, asset_info_map, common_metrics, does_exchange_have_asset, exchanges_for_asset,
    metric_info_maps,
};
pub use service::{DataService, FetchPolicy, Fetched};
pub use table::{AssetSeries, MetricColumn, MetricTable, combined_time_bounds};

#[cfg(test)]
pub(crate) use service::tests::{StubProvider, service_with};
