use {
    crate::{
        data::AssetSeries,
        utils::{mean, pearson, value_range, year_month},
    },
    chrono::{DateTime, Utc},
    itertools::Itertools,
    std::collections::{BTreeMap, HashMap},
};

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub mean: f64,
    pub count: usize,
}

/// Monthly means of one metric, laid out as a year × month grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyHeatmap {
    pub cells: Vec<HeatmapCell>,
    /// Ascending, one entry per year that has at least one value
    pub years: Vec<i32>,
    pub min: f64,
    pub max: f64,
}

impl MonthlyHeatmap {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, year: i32, month: u32) -> Option<&HeatmapCell> {
        self.cells
            .iter()
            .find(|c| c.year == year && c.month == month)
    }

    /// Months between the first and last cell that have no value, in time order.
    pub fn empty_months(&self) -> Vec<(i32, u32)> {
        let (Some(first), Some(last)) = (self.cells.first(), self.cells.last()) else {
            return Vec::new();
        };
        let mut months = Vec::new();
        let (mut year, mut month) = (first.year, first.month);
        while (year, month) < (last.year, last.month) {
            if self.cell(year, month).is_none() {
                months.push((year, month));
            }
            (year, month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        }
        months
    }
}

/// Group the series' values by (year, month) and average each group.
pub fn monthly_heatmap(series: &AssetSeries) -> MonthlyHeatmap {
    let mut groups: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for (time, value) in series.points() {
        groups.entry(year_month(&time)).or_default().push(value);
    }

    let cells: Vec<HeatmapCell> = groups
        .into_iter()
        .filter_map(|((year, month), values)| {
            Some(HeatmapCell {
                year,
                month,
                mean: mean(&values)?,
                count: values.len(),
            })
        })
        .collect();

    let means: Vec<f64> = cells.iter().map(|c| c.mean).collect();
    let Some((min, max)) = value_range(&means) else {
        return MonthlyHeatmap::default();
    };
    let years = cells.iter().map(|c| c.year).dedup().collect();

    MonthlyHeatmap {
        cells,
        years,
        min,
        max,
    }
}

/// Values of several assets joined on timestamp. Only timestamps where every asset has a value survive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedAssets {
    pub names: Vec<String>,
    pub time: Vec<DateTime<Utc>>,
    /// `columns[i]` belongs to `names[i]`; all columns are as long as `time`
    pub columns: Vec<Vec<f64>>,
}

impl AlignedAssets {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn pairs(&self, x: usize, y: usize) -> Vec<[f64; 2]> {
        match (self.columns.get(x), self.columns.get(y)) {
            (Some(xs), Some(ys)) => xs.iter().zip(ys).map(|(a, b)| [*a, *b]).collect(),
            _ => Vec::new(),
        }
    }

    pub fn correlation(&self, x: usize, y: usize) -> Option<f64> {
        pearson(self.columns.get(x)?, self.columns.get(y)?)
    }
}

pub fn align_assets(series: &[AssetSeries]) -> AlignedAssets {
    if series.is_empty() {
        return AlignedAssets::default();
    }

    let lookups: Vec<HashMap<DateTime<Utc>, f64>> = series
        .iter()
        .map(|s| s.points().into_iter().collect())
        .collect();

    // Walk the first asset's timestamps so output stays in time order
    let time: Vec<DateTime<Utc>> = series[0]
        .points()
        .into_iter()
        .map(|(t, _)| t)
        .filter(|t| lookups.iter().all(|m| m.contains_key(t)))
        .sorted()
        .dedup()
        .collect();

    let columns = lookups
        .iter()
        .map(|m| time.iter().map(|t| m[t]).collect())
        .collect();

    AlignedAssets {
        names: series.iter().map(|s| s.name.clone()).collect(),
        time,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MetricColumn, MetricTable};
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn series(name: &str, rows: &[(DateTime<Utc>, Option<f64>)]) -> AssetSeries {
        let table = MetricTable {
            time: rows.iter().map(|(t, _)| *t).collect(),
            columns: vec![MetricColumn {
                metric: "PriceUSD".into(),
                values: rows.iter().map(|(_, v)| *v).collect(),
            }],
        };
        AssetSeries::new(name, name.to_lowercase(), "PriceUSD", table)
    }

    #[test]
    fn heatmap_averages_each_month() {
        let s = series(
            "Bitcoin",
            &[
                (day(2020, 1, 1), Some(10.0)),
                (day(2020, 1, 2), Some(20.0)),
                (day(2020, 2, 1), None),
                (day(2021, 3, 1), Some(40.0)),
            ],
        );
        let heatmap = monthly_heatmap(&s);

        assert_eq!(heatmap.years, vec![2020, 2021]);
        assert_eq!(heatmap.cells.len(), 2);
        let jan = heatmap.cell(2020, 1).unwrap();
        assert_eq!(jan.mean, 15.0);
        assert_eq!(jan.count, 2);
        assert!(heatmap.cell(2020, 2).is_none());
        assert_eq!((heatmap.min, heatmap.max), (15.0, 40.0));
    }

    #[test]
    fn heatmap_lists_gaps_between_first_and_last_month() {
        let s = series(
            "Bitcoin",
            &[
                (day(2020, 1, 1), Some(10.0)),
                (day(2020, 3, 1), Some(30.0)),
                (day(2021, 2, 1), Some(40.0)),
            ],
        );
        let gaps = monthly_heatmap(&s).empty_months();

        assert_eq!(gaps.len(), 11);
        assert_eq!(gaps.first(), Some(&(2020, 2)));
        assert_eq!(gaps.last(), Some(&(2021, 1)));
        assert!(!gaps.contains(&(2020, 3)));
        assert!(MonthlyHeatmap::default().empty_months().is_empty());
    }

    #[test]
    fn heatmap_of_empty_series_is_empty() {
        let s = series("Bitcoin", &[(day(2020, 1, 1), None)]);
        assert!(monthly_heatmap(&s).is_empty());
    }

    #[test]
    fn align_keeps_only_shared_timestamps() {
        let btc = series(
            "Bitcoin",
            &[
                (day(2020, 1, 1), Some(1.0)),
                (day(2020, 1, 2), Some(2.0)),
                (day(2020, 1, 3), Some(3.0)),
            ],
        );
        let eth = series(
            "Ethereum",
            &[
                (day(2020, 1, 2), Some(20.0)),
                (day(2020, 1, 3), None),
                (day(2020, 1, 4), Some(40.0)),
            ],
        );
        let aligned = align_assets(&[btc, eth]);

        assert_eq!(aligned.names, vec!["Bitcoin", "Ethereum"]);
        assert_eq!(aligned.time, vec![day(2020, 1, 2)]);
        assert_eq!(aligned.columns, vec![vec![2.0], vec![20.0]]);
        assert_eq!(aligned.pairs(0, 1), vec![[2.0, 20.0]]);
    }

    #[test]
    fn aligned_correlation() {
        let rows: Vec<_> = (1..=5).map(|d| (day(2020, 1, d), Some(d as f64))).collect();
        let inverse: Vec<_> = (1..=5).map(|d| (day(2020, 1, d), Some(-(d as f64)))).collect();
        let aligned = align_assets(&[series("A", &rows), series("B", &inverse)]);

        let r = aligned.correlation(0, 1).unwrap();
        assert!((r + 1.0).abs() < 1e-9);
        assert!((aligned.correlation(0, 0).unwrap() - 1.0).abs() < 1e-9);
        assert!(aligned.correlation(0, 5).is_none());
    }
}
