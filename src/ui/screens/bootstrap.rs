use {
    crate::{
        app::BootstrapState,
        config::PLOT_CONFIG,
        data::SyncStatus,
        ui::UI_TEXT,
    },
    eframe::egui::{Align, CentralPanel, Context, Grid, Layout, ProgressBar, RichText, Ui},
};

pub(crate) fn render_bootstrap(ctx: &Context, state: &BootstrapState) {
    CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                RichText::new(&UI_TEXT.ls_title)
                    .size(24.0)
                    .strong()
                    .color(PLOT_CONFIG.color_warning),
            );
            ui.label(
                RichText::new(&UI_TEXT.ls_subtitle)
                    .italics()
                    .color(PLOT_CONFIG.color_text_neutral),
            );
            ui.add_space(20.0);

            let total = state.total();
            let done = state.completed + state.failed;
            let progress = if total > 0 {
                done as f32 / total as f32
            } else {
                0.0
            };
            ui.add(
                ProgressBar::new(progress)
                    .show_percentage()
                    .animate(true)
                    .text(format!("Processed {}/{}", done, total)),
            );
            if state.failed > 0 {
                ui.add_space(5.0);
                ui.label(
                    RichText::new(format!(
                        "{} {} {}",
                        UI_TEXT.label_warning, state.failed, UI_TEXT.label_failures
                    ))
                    .color(PLOT_CONFIG.color_negative),
                );
            }
            ui.add_space(20.0);
        });

        render_step_grid(ui, state);
    });
}

fn render_step_grid(ui: &mut Ui, state: &BootstrapState) {
    Grid::new("loading_grid")
        .striped(true)
        .spacing([20.0, 10.0])
        .min_col_width(200.0)
        .show(ui, |ui| {
            for (step, status) in &state.steps {
                let (color, status_text, status_color) = match status {
                    SyncStatus::Pending => (
                        PLOT_CONFIG.color_text_subdued,
                        "-".to_string(),
                        PLOT_CONFIG.color_text_subdued,
                    ),
                    SyncStatus::Syncing => (
                        PLOT_CONFIG.color_warning,
                        UI_TEXT.ls_syncing.to_string(),
                        PLOT_CONFIG.color_warning,
                    ),
                    SyncStatus::Completed(n) => (
                        PLOT_CONFIG.color_text_primary,
                        format!("+{}", n),
                        PLOT_CONFIG.color_positive,
                    ),
                    SyncStatus::Failed(_) => (
                        PLOT_CONFIG.color_negative,
                        UI_TEXT.ls_failed.to_string(),
                        PLOT_CONFIG.color_negative,
                    ),
                };

                ui.label(RichText::new(step.to_string()).strong().color(color));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| match status {
                    SyncStatus::Syncing => {
                        ui.spinner();
                    }
                    SyncStatus::Failed(reason) => {
                        ui.label(RichText::new(status_text).color(status_color))
                            .on_hover_text(reason);
                    }
                    _ => {
                        ui.label(RichText::new(status_text).color(status_color));
                    }
                });
                ui.end_row();
            }
        });
}
