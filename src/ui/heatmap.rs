use std::sync::LazyLock;

use colorgrad::Gradient;
use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{AxisHints, Plot, PlotPoints, Polygon};

use crate::config::PLOT_CONFIG;
use crate::data::{AssetSeries, MonthlyHeatmap, monthly_heatmap};
use crate::ui::UiStyleExt;
use crate::utils::{AxisScale, format_compact, month_label, normalize_between};

static HEATMAP_GRADIENT: LazyLock<Option<colorgrad::LinearGradient>> = LazyLock::new(|| {
    colorgrad::GradientBuilder::new()
        .html_colors(PLOT_CONFIG.heatmap_gradient_colors)
        .build::<colorgrad::LinearGradient>()
        .map_err(|e| log::error!("Failed to build heat map gradient: {}", e))
        .ok()
});

fn to_egui_color(colorgrad_color: colorgrad::Color) -> Color32 {
    let rgba8 = colorgrad_color.to_rgba8();
    Color32::from_rgba_unmultiplied(rgba8[0], rgba8[1], rgba8[2], 255)
}

/// Colour for `t` in 0..=1 along the configured gradient.
fn heat_color(t: f64) -> Color32 {
    match HEATMAP_GRADIENT.as_ref() {
        Some(grad) => to_egui_color(grad.at(t as f32)),
        None => PLOT_CONFIG.color_heatmap_empty,
    }
}

/// Year × month grid of monthly means for one asset.
pub(crate) fn show_heatmap(ui: &mut Ui, series: &AssetSeries, metric_name: &str, scale: AxisScale) {
    let heatmap = crate::trace_time!("Monthly heat map", 2_000, { monthly_heatmap(series) });

    ui.label(RichText::new(&series.name).strong().size(15.0));
    if heatmap.is_empty() {
        ui.label_subdued("No values in this range");
        return;
    }

    let (lo, hi) = (scale.forward(heatmap.min), scale.forward(heatmap.max));
    ui.label_subdued(format!(
        "Monthly mean of {}: {} to {}",
        metric_name,
        format_compact(heatmap.min),
        format_compact(heatmap.max)
    ));

    let tooltip_cells = heatmap.clone();
    Plot::new(format!("heatmap_{}", series.asset_id))
        .height(PLOT_CONFIG.heatmap_height)
        .allow_drag(false)
        .allow_scroll(false)
        .show_grid(false)
        .custom_x_axes(vec![
            AxisHints::new_x().formatter(|mark, _range| month_axis_label(mark.value)),
        ])
        .custom_y_axes(vec![
            AxisHints::new_y().formatter(|mark, _range| format!("{:.0}", mark.value)),
        ])
        .label_formatter(move |_, point| cell_tooltip(&tooltip_cells, point.x, point.y))
        .show(ui, |plot_ui| {
            for (year, month) in heatmap.empty_months() {
                plot_ui.polygon(cell_polygon(month, year, PLOT_CONFIG.color_heatmap_empty));
            }
            for cell in &heatmap.cells {
                let t = normalize_between(scale.forward(cell.mean), lo, hi);
                plot_ui.polygon(cell_polygon(cell.month, cell.year, heat_color(t)));
            }
        });
}

/// Unit square centred on (month, year).
fn cell_polygon<'a>(month: u32, year: i32, fill: Color32) -> Polygon<'a> {
    let (x, y) = (month as f64, year as f64);
    let corners = vec![
        [x - 0.5, y - 0.5],
        [x + 0.5, y - 0.5],
        [x + 0.5, y + 0.5],
        [x - 0.5, y + 0.5],
    ];
    Polygon::new("", PlotPoints::new(corners))
        .fill_color(fill)
        .stroke(Stroke::NONE)
}

fn month_axis_label(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || !(1.0..=12.0).contains(&rounded) {
        return String::new();
    }
    month_label(rounded as u32).to_string()
}

fn cell_tooltip(heatmap: &MonthlyHeatmap, x: f64, y: f64) -> String {
    let (month, year) = (x.round(), y.round());
    if !(1.0..=12.0).contains(&month) {
        return String::new();
    }
    match heatmap.cell(year as i32, month as u32) {
        Some(cell) => format!(
            "{} {}\nmean {} ({} days)",
            month_label(cell.month),
            cell.year,
            format_compact(cell.mean),
            cell.count
        ),
        None => format!("{} {:.0}\n-", month_label(month as u32), year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_axis_only_labels_whole_months() {
        assert_eq!(month_axis_label(1.0), "Jan");
        assert_eq!(month_axis_label(12.0), "Dec");
        assert_eq!(month_axis_label(6.5), "");
        assert_eq!(month_axis_label(13.0), "");
    }

    #[test]
    fn gradient_endpoints_differ() {
        assert_ne!(heat_color(0.0), heat_color(1.0));
    }
}
