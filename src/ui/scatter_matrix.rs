use eframe::egui::{Align, Color32, Direction, Grid, Layout, RichText, Ui, vec2};
use egui_plot::{Plot, PlotPoints, Points};

use crate::config::{PLOT_CONFIG, asset_color};
use crate::data::AlignedAssets;
use crate::ui::{UI_TEXT, UiStyleExt};
use crate::utils::{AxisScale, format_compact};

/// N×N grid of pairwise scatter plots. Cell (row, col) plots asset `col` on x against asset `row` on y.
pub(crate) fn show_scatter_matrix(
    ui: &mut Ui,
    aligned: &AlignedAssets,
    metric_name: &str,
    scale: AxisScale,
    selection: &[String],
) {
    let n = aligned.names.len();
    let cell = PLOT_CONFIG.scatter_cell_size;

    ui.label_subheader(format!("{} ({} common dates)", metric_name, aligned.len()));
    ui.add_space(6.0);

    Grid::new("scatter_matrix")
        .num_columns(n)
        .spacing([6.0, 6.0])
        .show(ui, |ui| {
            for row in 0..n {
                for col in 0..n {
                    if row == col {
                        diagonal_cell(ui, &aligned.names[row], asset_color(&aligned.names[row], selection), cell);
                    } else {
                        scatter_cell(ui, aligned, row, col, cell, scale, asset_color(&aligned.names[col], selection));
                    }
                }
                ui.end_row();
            }
        });
}

fn diagonal_cell(ui: &mut Ui, name: &str, color: Color32, size: f32) {
    ui.allocate_ui_with_layout(vec2(size, size), Layout::centered_and_justified(Direction::TopDown), |ui| {
        ui.label(RichText::new(name).strong().size(15.0).color(color));
    });
}

fn scatter_cell(
    ui: &mut Ui,
    aligned: &AlignedAssets,
    row: usize,
    col: usize,
    size: f32,
    scale: AxisScale,
    color: Color32,
) {
    ui.allocate_ui_with_layout(vec2(size, size), Layout::top_down(Align::Center), |ui| {
        let r_text = match aligned.correlation(col, row) {
            Some(r) => format!("{} = {:.2}", UI_TEXT.plot_correlation, r),
            None => format!("{} = n/a", UI_TEXT.plot_correlation),
        };
        ui.label_subdued(r_text);

        let points: Vec<[f64; 2]> = aligned
            .pairs(col, row)
            .into_iter()
            .map(|[x, y]| [scale.forward(x), scale.forward(y)])
            .collect();
        let x_name = aligned.names[col].clone();
        let y_name = aligned.names[row].clone();

        Plot::new(format!("scatter_{}_{}", row, col))
            .width(size)
            .height(size - 20.0)
            .show_axes(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .label_formatter(move |_, point| {
                format!(
                    "{}: {}\n{}: {}",
                    x_name,
                    format_compact(scale.inverse(point.x)),
                    y_name,
                    format_compact(scale.inverse(point.y))
                )
            })
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new("", PlotPoints::new(points))
                        .radius(PLOT_CONFIG.scatter_point_radius)
                        .color(color),
                );
            });
    });
}
