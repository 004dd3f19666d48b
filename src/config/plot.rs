//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    /// Line colours assigned to assets in selection order (wraps around).
    pub series_palette: &'static [Color32],
    pub series_line_width: f32,

    /// Main time-series chart height in points
    pub main_chart_height: f32,
    /// Side length of one scatter matrix cell
    pub scatter_cell_size: f32,
    pub scatter_point_radius: f32,
    /// Height of one asset's heat map
    pub heatmap_height: f32,

    // HEATMAP GRADIENT (low -> high)
    pub heatmap_gradient_colors: &'static [&'static str],
    pub color_heatmap_empty: Color32,

    // --- SEMANTIC COLORS ---
    pub color_positive: Color32,
    pub color_negative: Color32,
    pub color_info: Color32,
    pub color_warning: Color32,
    pub color_error: Color32,

    pub color_text_primary: Color32,
    pub color_text_neutral: Color32,
    pub color_text_subdued: Color32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    series_palette: &[
        Color32::from_rgb(247, 147, 26),  // Bitcoin orange
        Color32::from_rgb(98, 126, 234),  // Ethereum blue
        Color32::from_rgb(38, 166, 154),  // Teal
        Color32::from_rgb(239, 83, 80),   // Red
        Color32::from_rgb(171, 71, 188),  // Purple
        Color32::from_rgb(255, 215, 0),   // Gold
        Color32::from_rgb(0, 191, 255),   // Sky
        Color32::from_rgb(139, 195, 74),  // Lime
    ],
    series_line_width: 1.5,

    main_chart_height: 520.0,
    scatter_cell_size: 180.0,
    scatter_point_radius: 1.5,
    heatmap_height: 260.0,

    // Deep Purple -> Orange -> Pale Yellow
    heatmap_gradient_colors: &[
        "#2d0b59", "#781c6d", "#bc3754", "#ed6925", "#fbb41a", "#fcffa4",
    ],
    color_heatmap_empty: Color32::from_gray(40),

    color_positive: Color32::from_rgb(100, 255, 100),
    color_negative: Color32::from_rgb(255, 80, 80),
    color_info: Color32::from_rgb(173, 216, 230), // Light Blue
    color_warning: Color32::from_rgb(255, 215, 0), // Gold/Yellow
    color_error: Color32::from_rgb(255, 80, 80),

    color_text_primary: Color32::WHITE,
    color_text_neutral: Color32::LIGHT_GRAY,
    color_text_subdued: Color32::GRAY,
};

/// Stable colour for the asset at `index` in the current selection.
pub fn series_color(index: usize) -> Color32 {
    let palette = PLOT_CONFIG.series_palette;
    palette[index % palette.len()]
}

/// Colour for the asset `name`, keyed by its place in `selection` rather than by load order.
pub fn asset_color(name: &str, selection: &[String]) -> Color32 {
    let index = selection
        .iter()
        .position(|n| n == name)
        .unwrap_or(selection.len());
    series_color(index)
}
