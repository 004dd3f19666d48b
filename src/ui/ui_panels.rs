use eframe::egui::{
    CentralPanel, CollapsingHeader, ComboBox, Context, RichText, ScrollArea, SidePanel, Slider,
    TextEdit, TopBottomPanel, Ui,
};
use strum::IntoEnumIterator;

use crate::app::App;
use crate::config::{ChartKind, PLOT_CONFIG};
use crate::data::{AssetSeries, align_assets, combined_time_bounds};
use crate::domain::{AssetEntry, DateRange, MetricLabel};
use crate::ui::styles::render_fullscreen_message;
use crate::ui::{
    UI_CONFIG, UI_TEXT, UiStyleExt, show_heatmap, show_scatter_matrix, show_time_series,
};
use crate::utils::{AxisScale, plot_days_to_date_string};

#[cfg(debug_assertions)]
use crate::config::DF;

impl App {
    pub(crate) fn render_top_panel(&mut self, ctx: &Context) {
        TopBottomPanel::top("title_bar")
            .frame(UI_CONFIG.top_panel_frame())
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading(
                    RichText::new(&UI_TEXT.app_title)
                        .size(22.0)
                        .strong()
                        .color(UI_CONFIG.colors.heading),
                );
                ui.label(RichText::new(&UI_TEXT.app_subtitle).italics());
            });
    }

    pub(crate) fn render_left_panel(&mut self, ctx: &Context) {
        SidePanel::left("sidebar")
            .exact_width(UI_CONFIG.sizes.side_panel_width)
            .resizable(false)
            .frame(UI_CONFIG.side_panel_frame())
            .show(ctx, |ui| {
                self.render_asset_picker(ui);
                ui.separator();

                let assets = self.selected_assets();
                if assets.is_empty() {
                    return;
                }

                let choices = self.metric_choices(&assets);
                self.selection.reconcile_metric(&choices);
                self.render_metric_picker(ui, &choices);
                ui.separator();

                let mut symlog = self.selection.scale.is_symlog();
                if ui.checkbox(&mut symlog, UI_TEXT.sb_symlog.as_str()).changed() {
                    self.selection.scale = AxisScale::from_symlog_flag(symlog);
                }
                ui.separator();

                ui.label_subheader(&UI_TEXT.sb_chart_kind);
                for kind in ChartKind::iter() {
                    ui.radio_value(&mut self.selection.chart_kind, kind, kind.to_string());
                }
            });
    }

    fn render_asset_picker(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label_subheader(&UI_TEXT.sb_choose_assets);
            if !self.selection.asset_names.is_empty()
                && ui.small_button(UI_TEXT.sb_clear_selection.as_str()).clicked()
            {
                self.selection.asset_names.clear();
            }
        });

        if !self.selection.asset_names.is_empty() {
            ui.label_subdued(self.selection.asset_names.join(", "));
        }

        ui.add(TextEdit::singleline(&mut self.asset_filter).hint_text(UI_TEXT.sb_filter_hint.as_str()));

        let filter = self.asset_filter.to_lowercase();
        let names: Vec<String> = match &self.catalog {
            Some(catalog) => catalog
                .index
                .asset_names()
                .filter(|n| filter.is_empty() || n.to_lowercase().contains(&filter))
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        ScrollArea::vertical()
            .id_salt("asset_list")
            .max_height(UI_CONFIG.sizes.asset_list_height)
            .show(ui, |ui| {
                for name in &names {
                    let mut checked = self.selection.is_selected(name);
                    if ui.checkbox(&mut checked, name.as_str()).changed() {
                        self.selection.toggle_asset(name);
                        #[cfg(debug_assertions)]
                        if DF.log_selection {
                            log::info!("Assets now {:?}", self.selection.asset_names);
                        }
                    }
                }
            });
    }

    fn render_metric_picker(&mut self, ui: &mut Ui, choices: &[MetricLabel]) {
        ui.label_subheader(&UI_TEXT.sb_choose_metric);
        if choices.is_empty() {
            ui.label_subdued(&UI_TEXT.sb_no_common_metric);
            return;
        }

        let current = self
            .selection
            .metric_id
            .as_ref()
            .and_then(|id| choices.iter().find(|c| &c.id == id));
        let selected_text = current.map(|c| c.name.clone()).unwrap_or_default();

        ComboBox::from_id_salt("metric_select")
            .width(ui.available_width())
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for choice in choices {
                    ui.selectable_value(
                        &mut self.selection.metric_id,
                        Some(choice.id.clone()),
                        choice.name.as_str(),
                    );
                }
            });

        if let Some(metric) = current {
            CollapsingHeader::new(UI_TEXT.sb_metric_explainer.as_str())
                .id_salt("metric_explainer")
                .show(ui, |ui| {
                    ui.label(RichText::new(&metric.name).strong());
                    if metric.description.is_empty() {
                        ui.label_subdued(&UI_TEXT.sb_no_description);
                    } else {
                        ui.label(&metric.description);
                    }
                });
        }
    }

    pub(crate) fn render_status_panel(&mut self, ctx: &Context) {
        TopBottomPanel::bottom("status_panel")
            .frame(UI_CONFIG.bottom_panel_frame())
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let source = self
                        .status
                        .last_source
                        .as_deref()
                        .unwrap_or(UI_TEXT.st_no_source.as_str());
                    ui.metric(&UI_TEXT.st_source, source, PLOT_CONFIG.color_info);

                    let pending = self.pending_requests();
                    if pending > 0 {
                        ui.separator();
                        ui.spinner();
                        ui.label_subdued(format!("{} {}", pending, UI_TEXT.st_pending));
                    }

                    if let Some(err) = &self.status.last_error {
                        ui.separator();
                        ui.metric(&UI_TEXT.st_last_error, err, PLOT_CONFIG.color_error);
                    }
                });
            });
    }

    pub(crate) fn render_central_panel(&mut self, ctx: &Context) {
        CentralPanel::default()
            .frame(UI_CONFIG.central_panel_frame())
            .show(ctx, |ui| {
                let assets = self.selected_assets();
                if assets.is_empty() {
                    ui.heading(&UI_TEXT.cp_select_asset);
                    return;
                }

                let Some(metric_id) = self.selection.metric_id.clone() else {
                    render_fullscreen_message(ui, &UI_TEXT.cp_no_metric, &UI_TEXT.sb_no_common_metric, false);
                    return;
                };
                let metric_name = self
                    .metric_label(&metric_id)
                    .map(|m| m.name)
                    .unwrap_or_else(|| metric_id.clone());

                let (loaded, waiting) = self.series_for(&assets, &metric_id);
                if loaded.is_empty() {
                    render_fullscreen_message(ui, &UI_TEXT.cp_loading_series, &UI_TEXT.cp_loading_detail, true);
                    return;
                }

                ScrollArea::vertical()
                    .id_salt("central_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if waiting > 0 {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label_subdued(format!("{} ({})", UI_TEXT.cp_loading_series, waiting));
                            });
                        }

                        match combined_time_bounds(&loaded) {
                            Some(bounds) => {
                                let range = self.date_window.sync(bounds);
                                if let Some(picked) = date_range_slider(ui, &bounds, &range) {
                                    self.date_window.set(picked);
                                }
                                let filtered: Vec<AssetSeries> =
                                    loaded.iter().map(|s| s.filter_range(&range)).collect();
                                ui.add_space(8.0);
                                self.render_chart(ui, &filtered, &metric_name);
                            }
                            None => {
                                ui.heading(&UI_TEXT.cp_no_data);
                            }
                        }

                        ui.add_space(12.0);
                        ui.separator();
                        self.render_exchanges(ui, &assets);
                    });
            });
    }

    fn render_chart(&self, ui: &mut Ui, series: &[AssetSeries], metric_name: &str) {
        let scale = self.selection.scale;
        let kind = self.selection.chart_kind;
        let order = &self.selection.asset_names;
        match kind {
            ChartKind::TimeSeries => show_time_series(ui, series, metric_name, scale, order),
            ChartKind::ScatterMatrix => {
                if series.len() < kind.min_assets() {
                    ui.label_subheader(&UI_TEXT.cp_scatter_needs_two);
                    return;
                }
                let aligned = crate::trace_time!("Align assets", 5_000, { align_assets(series) });
                if aligned.is_empty() {
                    ui.label_subheader(&UI_TEXT.cp_no_overlap);
                } else {
                    show_scatter_matrix(ui, &aligned, metric_name, scale, order);
                }
            }
            ChartKind::HeatMap => {
                for s in series {
                    show_heatmap(ui, s, metric_name, scale);
                    ui.add_space(10.0);
                }
            }
        }
    }

    fn render_exchanges(&self, ui: &mut Ui, assets: &[AssetEntry]) {
        ui.columns(assets.len(), |cols| {
            for (col, asset) in cols.iter_mut().zip(assets) {
                col.heading(format!("{} {}", UI_TEXT.cp_exchanges_prefix, asset.name));
                let exchanges = self.exchanges_for(&asset.id);
                if exchanges.is_empty() {
                    col.label_subdued(&UI_TEXT.cp_no_exchanges);
                    continue;
                }
                ScrollArea::vertical()
                    .id_salt(format!("exchanges_{}", asset.id))
                    .max_height(UI_CONFIG.sizes.exchange_list_height)
                    .show(col, |ui| {
                        for exchange in exchanges {
                            ui.label(exchange);
                        }
                    });
            }
        });
    }
}

/// Two sliders (from / to) over the data's span. Returns the new range when the user moved one.
fn date_range_slider(ui: &mut Ui, bounds: &DateRange, current: &DateRange) -> Option<DateRange> {
    let (lo, hi) = bounds.plot_days();
    let (mut start, mut end) = current.plot_days();

    ui.label_subheader(&UI_TEXT.cp_date_range);
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui
            .add(
                Slider::new(&mut start, lo..=hi)
                    .step_by(1.0)
                    .text(UI_TEXT.cp_date_from.as_str())
                    .custom_formatter(|v, _| plot_days_to_date_string(v)),
            )
            .changed();
        changed |= ui
            .add(
                Slider::new(&mut end, lo..=hi)
                    .step_by(1.0)
                    .text(UI_TEXT.cp_date_to.as_str())
                    .custom_formatter(|v, _| plot_days_to_date_string(v)),
            )
            .changed();
    });

    if !changed {
        return None;
    }
    DateRange::from_plot_days(start, end)
}
