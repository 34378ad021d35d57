use eframe::egui::{self, Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::state::AppState;

/// Above this many columns the legend is hidden.
const MAX_LEGEND_ENTRIES: usize = 20;

// ---------------------------------------------------------------------------
// Central panel: spectra, false-colour map, integrals
// ---------------------------------------------------------------------------

/// Render the three stacked views in the central panel.
pub fn spectral_view(ui: &mut Ui, state: &mut AppState) {
    if state.pipeline.dataset().is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Import spectra to begin  (File → Import…)");
        });
        return;
    }

    let total = ui.available_height();
    spectra_plot(ui, state, total * 0.45);
    ui.separator();
    false_color_map(ui, state, total * 0.2);
    ui.separator();
    integral_plot(ui, state);
}

fn spectra_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(context) = state.pipeline.context() else {
        return;
    };
    let view = context.view();
    let rows = view.rows_by_axis();
    let labels = context.labels();
    let window = view.window;

    let mut plot = Plot::new("spectra_plot")
        .height(height)
        .x_axis_label("Wavelength")
        .y_axis_label("Intensity")
        .include_y(window.y_min)
        .include_y(window.y_max)
        .allow_boxed_zoom(true);
    if context.dataset.n_columns() <= MAX_LEGEND_ENTRIES {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for (c, col) in context.dataset.columns.iter().enumerate() {
            let points: PlotPoints = rows
                .iter()
                .filter_map(|&r| col.values[r].map(|y| [context.dataset.axis[r], y]))
                .collect();
            let color = state
                .line_colors
                .get(c)
                .copied()
                .unwrap_or(Color32::LIGHT_BLUE);

            plot_ui.line(
                Line::new(points)
                    .name(&labels[c])
                    .color(color)
                    .width(1.5),
            );
        }
    });
}

fn false_color_map(ui: &mut Ui, state: &mut AppState, height: f32) {
    let width = ui.available_width();
    match state.false_color_texture(ui.ctx()) {
        Some(texture) => {
            ui.add(
                egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                    .fit_to_exact_size(egui::vec2(width, height)),
            );
        }
        None => {
            ui.allocate_ui(egui::vec2(width, height), |ui: &mut Ui| {
                ui.label("Nothing inside the current range.");
            });
        }
    }
}

fn integral_plot(ui: &mut Ui, state: &AppState) {
    let Some(integrals) = &state.integrals else {
        return;
    };
    let coords: Vec<[f64; 2]> = integrals
        .points
        .iter()
        .map(|p| [p.position, p.value])
        .collect();

    Plot::new("integral_plot")
        .x_axis_label("Tag")
        .y_axis_label("Integrated intensity")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(coords))
                    .radius(3.0)
                    .color(Color32::WHITE),
            );
        });
}
