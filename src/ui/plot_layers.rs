use eframe::egui::Color32;
use egui_plot::{HLine, Line, LineStyle, PlotPoints, PlotUi};

use crate::config::{PLOT_CONFIG, asset_color};
use crate::data::AssetSeries;
use crate::utils::{AxisScale, to_plot_days};

pub struct LayerContext<'a> {
    /// Already filtered to the selected date range
    pub series: &'a [AssetSeries],
    pub scale: AxisScale,
    /// Selected asset names in pick order; colours are keyed on it
    pub selection: &'a [String],
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

/// One line per asset, named after the asset so the legend and tooltip can show it.
pub struct SeriesLinesLayer;

impl PlotLayer for SeriesLinesLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for series in ctx.series {
            let points: Vec<[f64; 2]> = series
                .points()
                .into_iter()
                .map(|(t, v)| [to_plot_days(&t), ctx.scale.forward(v)])
                .collect();
            if points.is_empty() {
                continue;
            }
            plot_ui.line(
                Line::new(series.name.clone(), PlotPoints::new(points))
                    .color(asset_color(&series.name, ctx.selection))
                    .width(PLOT_CONFIG.series_line_width),
            );
        }
    }
}

/// Dashed zero line. Only worth drawing when the data actually crosses zero.
pub struct ZeroLineLayer;

impl PlotLayer for ZeroLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let crosses_zero = ctx.series.iter().any(|s| {
            let pts = s.points();
            pts.iter().any(|(_, v)| *v < 0.0) && pts.iter().any(|(_, v)| *v > 0.0)
        });
        if !crosses_zero {
            return;
        }
        plot_ui.hline(
            HLine::new("", 0.0)
                .color(Color32::from_gray(90))
                .style(LineStyle::Dashed { length: 6.0 })
                .width(1.0),
        );
    }
}
