//! Small enums shared by the UI and its persisted state.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Which chart the central panel draws for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display, Default)]
pub enum ChartKind {
    #[default]
    #[strum(to_string = "Time series")]
    TimeSeries,
    #[strum(to_string = "Scatter matrix")]
    ScatterMatrix,
    #[strum(to_string = "Heat map")]
    HeatMap,
}

impl ChartKind {
    /// Minimum number of selected assets the chart needs to say anything.
    pub fn min_assets(&self) -> usize {
        match self {
            Self::ScatterMatrix => 2,
            Self::TimeSeries | Self::HeatMap => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn chart_kinds_have_labels() {
        let labels: Vec<String> = ChartKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["Time series", "Scatter matrix", "Heat map"]);
    }

    #[test]
    fn scatter_matrix_needs_two_assets() {
        assert_eq!(ChartKind::ScatterMatrix.min_assets(), 2);
        assert_eq!(ChartKind::TimeSeries.min_assets(), 1);
    }
}
