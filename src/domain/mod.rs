// Domain types and value objects
mod asset;
mod date_range;
mod series_key;

pub use asset::{AssetEntry, MetricLabel};
pub use date_range::DateRange;
pub use series_key::SeriesKey;
