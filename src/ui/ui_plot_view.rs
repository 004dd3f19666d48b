use eframe::egui::{RichText, Ui};
use egui_plot::{AxisHints, Legend, Plot, VPlacement};

use crate::config::PLOT_CONFIG;
use crate::data::AssetSeries;
use crate::ui::{LayerContext, PlotLayer, SeriesLinesLayer, UI_TEXT, ZeroLineLayer};
use crate::utils::{AxisScale, format_compact, plot_days_to_date_string};

fn create_time_axis() -> AxisHints<'static> {
    AxisHints::new_x()
        .label(UI_TEXT.plot_x_axis.as_str())
        .formatter(|mark, _range| plot_days_to_date_string(mark.value))
        .placement(VPlacement::Bottom)
}

fn create_value_axis(metric_name: &str, scale: AxisScale) -> AxisHints<'static> {
    AxisHints::new_y()
        .label(metric_name.to_string())
        .formatter(move |mark, _range| format_compact(scale.inverse(mark.value)))
}

/// Main chart: one line per asset over time.
pub(crate) fn show_time_series(
    ui: &mut Ui,
    series: &[AssetSeries],
    metric_name: &str,
    scale: AxisScale,
    selection: &[String],
) {
    let title = series
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    ui.label(
        RichText::new(title)
            .strong()
            .size(16.0)
            .color(PLOT_CONFIG.color_text_primary),
    );

    let tooltip_metric = metric_name.to_string();
    Plot::new("time_series_plot")
        .height(PLOT_CONFIG.main_chart_height)
        .legend(Legend::default())
        .custom_x_axes(vec![create_time_axis()])
        .custom_y_axes(vec![create_value_axis(metric_name, scale)])
        .label_formatter(move |name, point| {
            let time = plot_days_to_date_string(point.x);
            let value = format_compact(scale.inverse(point.y));
            if name.is_empty() {
                format!("{}\n{}: {}", time, tooltip_metric, value)
            } else {
                format!("{}\n{}\n{}: {}", name, time, tooltip_metric, value)
            }
        })
        .show(ui, |plot_ui| {
            let ctx = LayerContext {
                series,
                scale,
                selection,
            };
            let layers: [Box<dyn PlotLayer>; 2] = [Box::new(ZeroLineLayer), Box::new(SeriesLinesLayer)];
            for layer in layers {
                layer.render(plot_ui, &ctx);
            }
        });
}
