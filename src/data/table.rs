use {
    crate::{
        client::MetricData,
        domain::DateRange,
        utils::{parse_api_time, year_month},
    },
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// One metric column. `values[i]` belongs to `MetricTable::time[i]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MetricColumn {
    pub metric: String,
    pub values: Vec<Option<f64>>,
}

/// Column-oriented metric data: a `time` column plus one column per metric.
/// Every column is as long as `time`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MetricTable {
    pub time: Vec<DateTime<Utc>>,
    pub columns: Vec<MetricColumn>,
}

impl MetricTable {
    /// Empty table that already carries the named columns.
    pub fn with_metrics(metrics: &[String]) -> Self {
        Self {
            time: Vec::new(),
            columns: metrics
                .iter()
                .map(|m| MetricColumn {
                    metric: m.clone(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    /// Reshape the API's row-oriented `metricData` into columns.
    /// Rows with an unparsable time are dropped; short rows leave trailing cells empty.
    pub fn from_metric_data(data: MetricData) -> Self {
        let mut table = Self::with_metrics(&data.metrics);
        table.time.reserve(data.series.len());

        for row in &data.series {
            let Some(time) = parse_api_time(&row.time) else {
                log::warn!("Skipping metric row with unparsable time {:?}", row.time);
                continue;
            };
            table.time.push(time);
            for (idx, column) in table.columns.iter_mut().enumerate() {
                column.values.push(row.value_at(idx));
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.metric.as_str())
    }

    pub fn column(&self, metric: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.metric == metric)
            .map(|c| c.values.as_slice())
    }

    /// Calendar year of every row.
    pub fn years(&self) -> Vec<i32> {
        self.time.iter().map(|t| year_month(t).0).collect()
    }

    /// Calendar month (1..=12) of every row.
    pub fn months(&self) -> Vec<u32> {
        self.time.iter().map(|t| year_month(t).1).collect()
    }

    pub fn time_bounds(&self) -> Option<DateRange> {
        let min = self.time.iter().min()?;
        let max = self.time.iter().max()?;
        Some(DateRange::new(*min, *max))
    }

    /// Rows with `range.start <= time <= range.end`.
    pub fn filter_range(&self, range: &DateRange) -> Self {
        let keep: Vec<usize> = self
            .time
            .iter()
            .enumerate()
            .filter(|(_, t)| range.contains(t))
            .map(|(i, _)| i)
            .collect();

        Self {
            time: keep.iter().map(|&i| self.time[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| MetricColumn {
                    metric: c.metric.clone(),
                    values: keep
                        .iter()
                        .map(|&i| c.values.get(i).copied().flatten())
                        .collect(),
                })
                .collect(),
        }
    }

    /// (time, value) pairs of `metric`, skipping empty cells.
    pub fn points(&self, metric: &str) -> Vec<(DateTime<Utc>, f64)> {
        let Some(values) = self.column(metric) else {
            return Vec::new();
        };
        self.time
            .iter()
            .zip(values)
            .filter_map(|(t, v)| v.map(|v| (*t, v)))
            .collect()
    }
}

/// A table tagged with the asset it belongs to, so several assets can be charted together.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AssetSeries {
    /// Display name, e.g. "Bitcoin"
    pub name: String,
    pub asset_id: String,
    pub metric: String,
    pub table: MetricTable,
}

impl AssetSeries {
    pub fn new(name: impl Into<String>, asset_id: impl Into<String>, metric: impl Into<String>, table: MetricTable) -> Self {
        Self {
            name: name.into(),
            asset_id: asset_id.into(),
            metric: metric.into(),
            table,
        }
    }

    pub fn points(&self) -> Vec<(DateTime<Utc>, f64)> {
        self.table.points(&self.metric)
    }

    pub fn filter_range(&self, range: &DateRange) -> Self {
        Self {
            name: self.name.clone(),
            asset_id: self.asset_id.clone(),
            metric: self.metric.clone(),
            table: self.table.filter_range(range),
        }
    }
}

/// Earliest and latest time across several series.
pub fn combined_time_bounds(series: &[AssetSeries]) -> Option<DateRange> {
    series
        .iter()
        .filter_map(|s| s.table.time_bounds())
        .reduce(|a, b| a.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MetricData;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> MetricTable {
        let data: MetricData = serde_json::from_value(json!({
            "metrics": ["PriceUSD", "AdrActCnt"],
            "series": [
                {"time": "2020-01-30T00:00:00.000Z", "values": ["9500.5", "700000"]},
                {"time": "2020-01-31T00:00:00.000Z", "values": ["9350.0", null]},
                {"time": "2020-02-01T00:00:00.000Z", "values": ["9390.1"]},
                {"time": "garbage", "values": ["1", "2"]}
            ]
        }))
        .unwrap();
        MetricTable::from_metric_data(data)
    }

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn reshapes_rows_into_columns() {
        let table = sample();
        assert_eq!(table.len(), 3);
        assert_eq!(table.metrics().collect::<Vec<_>>(), vec!["PriceUSD", "AdrActCnt"]);
        assert_eq!(
            table.column("PriceUSD").unwrap(),
            &[Some(9500.5), Some(9350.0), Some(9390.1)]
        );
        assert_eq!(table.column("AdrActCnt").unwrap(), &[Some(700000.0), None, None]);
        for column in &table.columns {
            assert_eq!(column.values.len(), table.time.len());
        }
    }

    #[test]
    fn empty_series_keeps_columns() {
        let data = MetricData {
            metrics: vec!["PriceUSD".into()],
            series: vec![],
        };
        let table = MetricTable::from_metric_data(data);
        assert!(table.is_empty());
        assert_eq!(table.column("PriceUSD"), Some(&[][..]));
        assert!(table.time_bounds().is_none());
    }

    #[test]
    fn derives_year_and_month() {
        let table = sample();
        assert_eq!(table.years(), vec![2020, 2020, 2020]);
        assert_eq!(table.months(), vec![1, 1, 2]);
    }

    #[test]
    fn filter_range_is_inclusive() {
        let table = sample();
        let filtered = table.filter_range(&DateRange::new(day(2020, 1, 31), day(2020, 2, 1)));
        assert_eq!(filtered.time, vec![day(2020, 1, 31), day(2020, 2, 1)]);
        assert_eq!(filtered.column("PriceUSD").unwrap(), &[Some(9350.0), Some(9390.1)]);
    }

    #[test]
    fn points_skip_missing_values() {
        let table = sample();
        assert_eq!(table.points("AdrActCnt"), vec![(day(2020, 1, 30), 700000.0)]);
        assert!(table.points("Unknown").is_empty());
    }

    #[test]
    fn combined_bounds_span_all_assets() {
        let a = AssetSeries::new("Bitcoin", "btc", "PriceUSD", sample());
        let mut later = sample().filter_range(&DateRange::new(day(2020, 2, 1), day(2020, 2, 1)));
        later.time = vec![day(2021, 5, 5)];
        let b = AssetSeries::new("Ethereum", "eth", "PriceUSD", later);

        let bounds = combined_time_bounds(&[a, b]).unwrap();
        assert_eq!(bounds, DateRange::new(day(2020, 1, 30), day(2021, 5, 5)));
        assert!(combined_time_bounds(&[]).is_none());
    }
}
