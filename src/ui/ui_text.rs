use std::sync::LazyLock;

pub const ICON_CHART: &str = "📈";
pub const ICON_WARNING: &str = "⚠";
pub const ICON_SEARCH: &str = "🔍";
pub const ICON_DATABASE: &str = "💾";

pub struct UiText {
    // --- Header ---
    pub app_title: String,
    pub app_subtitle: String,

    // --- Loading screen ---
    pub ls_title: String,
    pub ls_subtitle: String,
    pub ls_syncing: String,
    pub ls_failed: String,
    pub label_warning: String,
    pub label_failures: String,

    // --- Sidebar ---
    pub sb_choose_assets: String,
    pub sb_filter_hint: String,
    pub sb_choose_metric: String,
    pub sb_no_common_metric: String,
    pub sb_metric_explainer: String,
    pub sb_no_description: String,
    pub sb_symlog: String,
    pub sb_chart_kind: String,
    pub sb_clear_selection: String,

    // --- Central panel ---
    pub cp_select_asset: String,
    pub cp_date_range: String,
    pub cp_date_from: String,
    pub cp_date_to: String,
    pub cp_loading_series: String,
    pub cp_loading_detail: String,
    pub cp_no_data: String,
    pub cp_no_metric: String,
    pub cp_scatter_needs_two: String,
    pub cp_no_overlap: String,
    pub cp_exchanges_prefix: String,
    pub cp_no_exchanges: String,

    // --- Plot labels ---
    pub plot_x_axis: String,
    pub plot_correlation: String,

    // --- Status bar ---
    pub st_source: String,
    pub st_no_source: String,
    pub st_pending: String,
    pub st_last_error: String,
}

pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    app_title: "Let's analyze some crypto data ₿📊.".to_string(),
    app_subtitle: "Can you get rich on crypto?!".to_string(),

    ls_title: "Loading Coin Metrics catalogue".to_string(),
    ls_subtitle: "Assets, metrics and exchanges from the community API".to_string(),
    ls_syncing: "Syncing".to_string(),
    ls_failed: "Failed".to_string(),
    label_warning: ICON_WARNING.to_string(),
    label_failures: "step(s) failed. The dashboard will start with partial data.".to_string(),

    sb_choose_assets: "Choose some assets".to_string(),
    sb_filter_hint: format!("{} Filter assets", ICON_SEARCH),
    sb_choose_metric: "Choose a metric".to_string(),
    sb_no_common_metric: "No metric is shared by all selected assets".to_string(),
    sb_metric_explainer: "See explanations for metric".to_string(),
    sb_no_description: "No description available.".to_string(),
    sb_symlog: "Convert chart to symlog scale".to_string(),
    sb_chart_kind: "Chart".to_string(),
    sb_clear_selection: "Clear".to_string(),

    cp_select_asset: "Select an asset in the sidebar".to_string(),
    cp_date_range: "Select Date Range".to_string(),
    cp_date_from: "From".to_string(),
    cp_date_to: "To".to_string(),
    cp_loading_series: "Fetching time series...".to_string(),
    cp_loading_detail: "Waiting for the Coin Metrics API".to_string(),
    cp_no_data: "No data for this selection".to_string(),
    cp_no_metric: "Pick a metric in the sidebar".to_string(),
    cp_scatter_needs_two: "Select at least two assets to see a scatter matrix".to_string(),
    cp_no_overlap: "The selected assets share no dates in this range".to_string(),
    cp_exchanges_prefix: "Available exchanges for".to_string(),
    cp_no_exchanges: "None listed".to_string(),

    plot_x_axis: "Time".to_string(),
    plot_correlation: "r".to_string(),

    st_source: format!("{} Source:", ICON_DATABASE),
    st_no_source: "-".to_string(),
    st_pending: format!("{} requests in flight", ICON_CHART),
    st_last_error: format!("{} Last error:", ICON_WARNING),
});
