mod heatmap;
mod plot_layers;
mod scatter_matrix;
mod screens;
mod styles;
mod ui_config;
mod ui_panels;
mod ui_plot_view;
mod ui_text;

pub(crate) use heatmap::show_heatmap;
pub(crate) use plot_layers::{LayerContext, PlotLayer, SeriesLinesLayer, ZeroLineLayer};
pub(crate) use scatter_matrix::show_scatter_matrix;
pub(crate) use screens::render_bootstrap;
pub(crate) use styles::UiStyleExt;
pub(crate) use ui_config::{UI_CONFIG, UI_TEXT};
pub(crate) use ui_plot_view::show_time_series;
